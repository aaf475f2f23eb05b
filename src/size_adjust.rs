//! Size-adjustment rule sets for the `data-size-adjust` attribute.
//!
//! A rule set maps viewport breakpoints to a scale factor that is applied to
//! the measured element width before a rung is picked from the ladder. This
//! lets authors request sharper (or softer) images than the rendered box
//! would suggest, per breakpoint.
//!
//! ## Syntax
//!
//! ```text
//! 2                    → default only (every width scales by 2)
//! :2;480:1.5;1200:1    → default 2, 1.5 from 480px, 1 from 1200px
//! 480:1.5;1200:1       → breakpoints only, no explicit default
//! ```
//!
//! - breakpoints are non-negative integers (`min_screen`)
//! - scales are positive decimals (`1.5`, `0.4`)
//! - blank `;` entries are ignored, surrounding whitespace is trimmed
//! - a repeated breakpoint overrides the earlier one
//!
//! Anything else is rejected. Malformed attributes point at a template bug,
//! so they are never silently corrected.

use regex::Regex;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static BARE_SCALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("valid regex"));
static DEFAULT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([0-9]+(?:\.[0-9]+)?)$").expect("valid regex"));
static RANGE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+):([0-9]+(?:\.[0-9]+)?)$").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid size-adjust entry: \"{0}\"")]
    InvalidEntry(String),
    #[error("scale must be a positive number in entry \"{0}\"")]
    NonPositiveScale(String),
    #[error("size-adjust input contains no entries")]
    NoEntries,
}

/// One breakpoint: from `min_screen` pixels upward, multiply by `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRule {
    pub min_screen: u32,
    pub scale: f64,
}

/// Parsed rule set, sorted ascending by `min_screen` with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeAdjustRules {
    rules: Vec<SizeRule>,
}

impl SizeAdjustRules {
    /// Parse an attribute value. `None` and blank input yield an empty set.
    pub fn parse(input: Option<&str>) -> Result<Self, ParseError> {
        let text = input.unwrap_or("").trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        if BARE_SCALE.is_match(text) {
            let scale = positive_scale(text, text)?;
            return Ok(Self {
                rules: vec![SizeRule {
                    min_screen: 0,
                    scale,
                }],
            });
        }

        let entries: Vec<&str> = text
            .split(';')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect();
        if entries.is_empty() {
            return Err(ParseError::NoEntries);
        }

        // BTreeMap gives both last-write-wins and ascending order
        let mut by_min: BTreeMap<u32, f64> = BTreeMap::new();
        for entry in entries {
            if let Some(caps) = DEFAULT_ENTRY.captures(entry) {
                by_min.insert(0, positive_scale(&caps[1], entry)?);
                continue;
            }
            if let Some(caps) = RANGE_ENTRY.captures(entry) {
                let min = caps[1]
                    .parse::<u32>()
                    .map_err(|_| ParseError::InvalidEntry(entry.to_string()))?;
                by_min.insert(min, positive_scale(&caps[2], entry)?);
                continue;
            }
            return Err(ParseError::InvalidEntry(entry.to_string()));
        }

        Ok(Self {
            rules: by_min
                .into_iter()
                .map(|(min_screen, scale)| SizeRule { min_screen, scale })
                .collect(),
        })
    }

    pub fn rules(&self) -> &[SizeRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Scale factor for a viewport `width`.
    ///
    /// Picks the rule with the largest `min_screen <= width`. An empty set
    /// yields 1. When no rule qualifies (every breakpoint is above `width`),
    /// the highest breakpoint's scale is used.
    // NOTE: the no-qualifying fallback is kept for compatibility with
    // existing markup; a breakpoint-only set probably wants 1 there instead.
    pub fn resolve(&self, width: f64) -> f64 {
        let Some(last) = self.rules.last() else {
            return 1.0;
        };
        let mut scale = last.scale;
        for rule in &self.rules {
            if width >= f64::from(rule.min_screen) {
                scale = rule.scale;
            } else {
                break;
            }
        }
        scale
    }
}

impl FromStr for SizeAdjustRules {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

fn positive_scale(raw: &str, entry: &str) -> Result<f64, ParseError> {
    let scale: f64 = raw
        .parse()
        .map_err(|_| ParseError::InvalidEntry(entry.to_string()))?;
    if scale > 0.0 {
        Ok(scale)
    } else {
        Err(ParseError::NonPositiveScale(entry.to_string()))
    }
}
