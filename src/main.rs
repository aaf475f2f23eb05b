use cdn_image_loader::codec::{
    AspectRatio, CdnLocation, ImageDescriptor, UrlEncoder, decode, is_cdn_image,
};
use cdn_image_loader::config;
use cdn_image_loader::markup::{ImgOptions, render_img};
use cdn_image_loader::output::{self, Selection};
use cdn_image_loader::selector::{select_width, target_width};
use cdn_image_loader::size_adjust::SizeAdjustRules;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cdn-image-loader")]
#[command(about = "Inspect, build and size v2 CDN image URLs")]
#[command(long_about = "\
Inspect, build and size v2 CDN image URLs

A v2 path describes the image it points to:

  v2/<id>/<aspect>_<widths>/<filename>.<ext1>[_<ext2>...]

  aspect   a=1/1 b=4/3 c=3/2 d=16/9 e=21/9, uppercase for portrait,
           or a literal W-H
  widths   a=260 b=414 c=896 d=1280 e=1440 f=1920 g=2560, or literal
           numbers separated by '-', largest first

Example:

  v2/abc123/d_gfedcba/hero.jpg_webp

Run 'cdn-image-loader gen-config' to generate a documented loader.toml.")]
#[command(version)]
struct Cli {
    /// Loader configuration file (defaults apply when it does not exist)
    #[arg(long, default_value = "loader.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a URL is a well-formed CDN v2 image
    Check { url: String },
    /// Show what a CDN v2 image URL encodes
    Decode {
        url: String,
        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a v2 path from its parts
    Encode {
        #[arg(long)]
        id: String,
        /// Aspect ratio as W/H
        #[arg(long)]
        aspect: AspectRatio,
        /// Available widths, largest first
        #[arg(long, value_delimiter = ',', required = true)]
        widths: Vec<u32>,
        #[arg(long)]
        filename: String,
        /// Formats in negotiation order
        #[arg(long, value_delimiter = ',', required = true)]
        ext: Vec<String>,
    },
    /// Pick the resolution a rendered box would load
    Select {
        url: String,
        /// Rendered element width in CSS pixels
        #[arg(long)]
        box_width: f64,
        /// Viewport width, used for size-adjust breakpoints
        #[arg(long, default_value_t = 1920.0)]
        viewport: f64,
        /// Size-adjust rules, e.g. ":2;1200:1" (config default when omitted)
        #[arg(long)]
        size_adjust: Option<String>,
    },
    /// Render an <img> tag for a CDN image
    Img {
        url: String,
        #[arg(long)]
        alt: Option<String>,
        /// Load eagerly instead of lazily
        #[arg(long)]
        eager: bool,
        #[arg(long)]
        size_adjust: Option<String>,
        #[arg(long)]
        class: Option<String>,
    },
    /// Print a stock loader.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { url } => {
            let (location, descriptor) = locate(&url)?;
            println!("==> {} is a valid CDN v2 image", location.path);
            output::print_descriptor(&descriptor);
        }
        Command::Decode { url, json } => {
            let (_, descriptor) = locate(&url)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
            } else {
                output::print_descriptor(&descriptor);
            }
        }
        Command::Encode {
            id,
            aspect,
            widths,
            filename,
            ext,
        } => {
            let path = UrlEncoder::new(&id, &filename)
                .aspect_ratio(aspect)
                .widths(widths)
                .extensions(ext)
                .to_string();
            // Reject anything the decoder would not accept back.
            decode(&path)?;
            println!("{path}");
        }
        Command::Select {
            url,
            box_width,
            viewport,
            size_adjust,
        } => {
            let (location, descriptor) = locate(&url)?;
            let rules = match size_adjust {
                Some(rules) => SizeAdjustRules::parse(Some(rules.as_str()))?,
                None => config::load_config(&cli.config)?.default_size_adjust(),
            };
            let scale = rules.resolve(viewport);
            let target = target_width(box_width, viewport, scale);
            let chosen =
                select_width(&descriptor.widths, target).ok_or("image has no widths")?;
            let selection = Selection {
                box_width,
                scale,
                target,
                chosen,
                url: location.url_for(&descriptor.encode_single(chosen)),
            };
            output::print_selection(&descriptor, &selection);
        }
        Command::Img {
            url,
            alt,
            eager,
            size_adjust,
            class,
        } => {
            let options = ImgOptions {
                alt,
                eager,
                size_adjust,
                class,
            };
            println!("{}", render_img(&url, &options)?.into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Split and decode a CDN image URL or bare v2 path.
fn locate(url: &str) -> Result<(CdnLocation, ImageDescriptor), Box<dyn std::error::Error>> {
    if !is_cdn_image(url) {
        return Err(format!("not a CDN v2 image: {url}").into());
    }
    let location = CdnLocation::parse(url).ok_or_else(|| format!("no v2 path in {url}"))?;
    let descriptor = decode(&location.path)?;
    Ok((location, descriptor))
}
