//! Splitting a full image `src` around its encoded path.

/// A CDN image URL split into `base` + `path` + `suffix`.
///
/// ```text
/// https://cdn.example.com/media/v2/abc/d_gfe/hero.jpg_webp?rev=3
/// └────────── base ─────────┘└──────── path ────────┘└ suffix ┘
/// ```
///
/// Rebuilding a URL for another resolution only swaps the path, so the
/// host, any mount prefix and cache-busting query survive the swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnLocation {
    pub base: String,
    pub path: String,
    pub suffix: String,
}

impl CdnLocation {
    /// Split `src` so that `path` is its last four segments, starting at
    /// `v2/`. Earlier `v2` segments belong to the mount prefix. Returns
    /// `None` when the fourth-last segment is not `v2`; no other validation
    /// happens here.
    pub fn parse(src: &str) -> Option<Self> {
        let (without_suffix, suffix) = match src.find(['?', '#']) {
            Some(pos) => src.split_at(pos),
            None => (src, ""),
        };

        let start = match without_suffix.rsplitn(5, '/').nth(4) {
            Some(prefix) => prefix.len() + 1,
            None => 0,
        };
        if !without_suffix[start..].starts_with("v2/") {
            return None;
        }

        Some(Self {
            base: without_suffix[..start].to_string(),
            path: without_suffix[start..].to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Full URL for another encoded path at the same location.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}{}", self.base, path, self.suffix)
    }

    pub fn is_svg(&self) -> bool {
        self.path.to_ascii_lowercase().ends_with(".svg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_absolute_url() {
        let loc =
            CdnLocation::parse("https://cdn.example.com/media/v2/abc/d_gfe/hero.jpg_webp?rev=3")
                .unwrap();
        assert_eq!(loc.base, "https://cdn.example.com/media/");
        assert_eq!(loc.path, "v2/abc/d_gfe/hero.jpg_webp");
        assert_eq!(loc.suffix, "?rev=3");
    }

    #[test]
    fn relative_path_has_empty_base() {
        let loc = CdnLocation::parse("v2/abc/d_gfe/hero.jpg").unwrap();
        assert_eq!(loc.base, "");
        assert_eq!(loc.path, "v2/abc/d_gfe/hero.jpg");
        assert_eq!(loc.suffix, "");
    }

    #[test]
    fn root_relative_path_keeps_slash_in_base() {
        let loc = CdnLocation::parse("/v2/abc/d_gfe/hero.jpg#x").unwrap();
        assert_eq!(loc.base, "/");
        assert_eq!(loc.suffix, "#x");
    }

    #[test]
    fn url_for_swaps_only_the_path() {
        let loc = CdnLocation::parse("https://cdn.example.com/v2/abc/d_gfe/hero.jpg?rev=3").unwrap();
        assert_eq!(
            loc.url_for("v2/abc/d_d/hero.jpg"),
            "https://cdn.example.com/v2/abc/d_d/hero.jpg?rev=3"
        );
    }

    #[test]
    fn mount_prefix_containing_v2() {
        let loc = CdnLocation::parse("https://api.example.com/v2/media/v2/abc/d_a/hero.jpg?x=1")
            .unwrap();
        assert_eq!(loc.base, "https://api.example.com/v2/media/");
        assert_eq!(loc.path, "v2/abc/d_a/hero.jpg");
        assert_eq!(loc.suffix, "?x=1");
    }

    #[test]
    fn no_v2_segment() {
        assert_eq!(CdnLocation::parse("https://example.com/img/hero.jpg"), None);
        assert_eq!(CdnLocation::parse("https://example.com/v2.jpg"), None);
        assert_eq!(CdnLocation::parse("https://example.com/v2/abc/hero.jpg"), None);
    }

    #[test]
    fn svg_detection_ignores_suffix() {
        assert!(CdnLocation::parse("/v2/abc/a_a/logo.svg?x=1").unwrap().is_svg());
        assert!(!CdnLocation::parse("/v2/abc/a_a/logo.png").unwrap().is_svg());
    }
}
