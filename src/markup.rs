//! Server-side `<img>` markup for CDN images.
//!
//! Pages that already know their image URLs at render time can emit the
//! tag with the full attribute contract up front: the browser reserves the
//! right box from the first paint and the loader only has to swap `src`.
//!
//! Uses [Maud](https://maud.lambda.xyz/), so every attribute is escaped.

use crate::codec::{CdnLocation, CodecError, decode, is_cdn_image};
use crate::size_adjust::{ParseError, SizeAdjustRules};
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("not a CDN v2 image: {0}")]
    NotCdnImage(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("invalid data-size-adjust: {0}")]
    SizeAdjust(#[from] ParseError),
}

/// Optional attributes for [`render_img`].
#[derive(Debug, Clone, Default)]
pub struct ImgOptions {
    /// Alt text; defaults to the encoded filename.
    pub alt: Option<String>,
    /// Emit `loading="eager"` instead of `lazy`.
    pub eager: bool,
    /// Rule set for `data-size-adjust`, validated before emitting.
    pub size_adjust: Option<String>,
    /// Extra CSS class.
    pub class: Option<String>,
}

/// Render an `<img>` for a CDN image URL.
///
/// `width`/`height` come from the largest rung; CSS scales the element
/// down while the aspect ratio stays reserved.
pub fn render_img(src: &str, options: &ImgOptions) -> Result<Markup, MarkupError> {
    let location = CdnLocation::parse(src)
        .filter(|_| is_cdn_image(src))
        .ok_or_else(|| MarkupError::NotCdnImage(src.to_string()))?;
    let descriptor = decode(&location.path)?;
    if options.size_adjust.is_some() {
        SizeAdjustRules::parse(options.size_adjust.as_deref())?;
    }

    let width = descriptor.largest_width().unwrap_or_default();
    let height = descriptor.aspect_ratio.height_for(width);
    let alt = options.alt.as_deref().unwrap_or(&descriptor.filename);
    let loading = if options.eager { "eager" } else { "lazy" };

    Ok(html! {
        img src=(src)
            data-src=(src)
            width=(width)
            height=(height)
            alt=(alt)
            loading=(loading)
            data-size-adjust=[options.size_adjust.as_deref()]
            class=[options.class.as_deref()];
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERO: &str = "https://cdn.example.com/v2/abc123/d_gfedcba/hero.jpg_webp";

    #[test]
    fn renders_contract_attributes() {
        let html = render_img(HERO, &ImgOptions::default()).unwrap().into_string();
        assert!(html.starts_with("<img"));
        assert!(html.contains(&format!(r#"src="{HERO}""#)));
        assert!(html.contains(&format!(r#"data-src="{HERO}""#)));
        assert!(html.contains(r#"width="2560""#));
        assert!(html.contains(r#"height="1440""#));
        assert!(html.contains(r#"alt="hero""#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(!html.contains("data-size-adjust"));
        assert!(!html.contains("class="));
    }

    #[test]
    fn renders_options() {
        let options = ImgOptions {
            alt: Some("Harbour".into()),
            eager: true,
            size_adjust: Some(":2;1200:1".into()),
            class: Some("hero-banner".into()),
        };
        let html = render_img(HERO, &options).unwrap().into_string();
        assert!(html.contains(r#"alt="Harbour""#));
        assert!(html.contains(r#"loading="eager""#));
        assert!(html.contains(r#"data-size-adjust=":2;1200:1""#));
        assert!(html.contains(r#"class="hero-banner""#));
    }

    #[test]
    fn escapes_alt_text() {
        let options = ImgOptions {
            alt: Some(r#"a "quoted" <b>"#.into()),
            ..Default::default()
        };
        let html = render_img(HERO, &options).unwrap().into_string();
        assert!(html.contains("&quot;quoted&quot; &lt;b&gt;"));
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            render_img("https://example.com/a.jpg", &ImgOptions::default()),
            Err(MarkupError::NotCdnImage(_))
        ));
        assert!(matches!(
            render_img("/v2/abc/d_zz/hero.jpg", &ImgOptions::default()),
            Err(MarkupError::Codec(_))
        ));
        let options = ImgOptions {
            size_adjust: Some("600=2".into()),
            ..Default::default()
        };
        assert!(matches!(
            render_img(HERO, &options),
            Err(MarkupError::SizeAdjust(_))
        ));
    }
}
