#![forbid(unsafe_code)]

//! Symbolic size tokens and their classification.
//!
//! Region declarations arrive loosely typed: a bare number, or a string such
//! as `"120px"`, `"33%"`, `"2*"`, `"fr"` or `"auto"`. [`SizeToken::classify`]
//! turns any of these into one of four kinds. Classification is total:
//! anything it does not recognize becomes `Flex(1)`, so a malformed size
//! degrades to a fair share of the leftover space instead of collapsing.
//!
//! | Input                     | Token           |
//! |---------------------------|-----------------|
//! | `120`, `"120"`, `"120px"` | `Fixed(120)`    |
//! | `"33%"`                   | `Percent(33)`   |
//! | `""`, `"*"`, `"fr"`       | `Flex(1)`       |
//! | `"3*"`, `"3fr"`           | `Flex(3)`       |
//! | `"auto"`, `"AUTO"`        | `Auto`          |
//! | anything else             | `Flex(1)`       |

use std::fmt;

use serde::{Deserialize, Serialize};

/// A loosely typed size as written in a region declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSize {
    /// A bare number of pixels.
    Pixels(f64),
    /// A textual size (`"120px"`, `"33%"`, `"2*"`, `"auto"`, ...).
    Text(String),
}

impl From<f64> for LayoutSize {
    fn from(value: f64) -> Self {
        Self::Pixels(value)
    }
}

impl From<&str> for LayoutSize {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// The kind of a classified size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeKind {
    Fixed,
    Percent,
    Flex,
    Auto,
}

/// Classification result: kind plus numeric magnitude.
///
/// `Auto` carries magnitude `0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeInfo {
    pub kind: SizeKind,
    pub magnitude: f64,
}

/// A typed track size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "LayoutSize", into = "LayoutSize")]
pub enum SizeToken {
    /// Sized by content.
    #[default]
    Auto,
    /// Exact pixel length.
    Fixed(f64),
    /// Fraction of the container's axis length, in percent.
    Percent(f64),
    /// Proportional share of the space left after fixed, percent and auto
    /// tracks. A weight of `0` means `1`.
    Flex(f64),
}

impl SizeToken {
    /// The "fill remaining space" token.
    pub const FILL: SizeToken = SizeToken::Flex(1.0);

    /// Flex token with `weight`, mapping zero or invalid weights to `1`.
    #[must_use]
    pub fn flex(weight: f64) -> Self {
        Self::Flex(effective_weight(weight))
    }

    /// Classify a loosely typed size.
    #[must_use]
    pub fn classify(size: &LayoutSize) -> Self {
        match size {
            LayoutSize::Pixels(px) => {
                if px.is_finite() && *px >= 0.0 {
                    Self::Fixed(*px)
                } else {
                    Self::FILL
                }
            }
            LayoutSize::Text(text) => Self::parse(text),
        }
    }

    /// Classify a textual size.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text == "*" || text.eq_ignore_ascii_case("fr") {
            return Self::FILL;
        }
        if text.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }
        if let Some(value) = text.strip_suffix('%') {
            return parse_magnitude(value).map_or(Self::FILL, Self::Percent);
        }
        if let Some(value) = text
            .strip_suffix('*')
            .or_else(|| strip_suffix_ignore_case(text, "fr"))
        {
            return parse_magnitude(value).map_or(Self::FILL, Self::flex);
        }
        if let Some(value) = strip_suffix_ignore_case(text, "px") {
            return parse_magnitude(value).map_or(Self::FILL, Self::Fixed);
        }
        parse_magnitude(text).map_or(Self::FILL, Self::Fixed)
    }

    /// Re-classify an already typed token.
    ///
    /// Tokens built through the variants directly may carry values the
    /// classifier would never produce (negative pixels, zero weights); those
    /// are normalized the same way their textual form would be.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Auto => Self::Auto,
            Self::Fixed(px) => valid_magnitude(px).map_or(Self::FILL, Self::Fixed),
            Self::Percent(pct) => valid_magnitude(pct).map_or(Self::FILL, Self::Percent),
            Self::Flex(weight) => Self::flex(weight),
        }
    }

    /// Kind and magnitude of this token.
    #[must_use]
    pub fn info(&self) -> SizeInfo {
        let (kind, magnitude) = match *self {
            Self::Auto => (SizeKind::Auto, 0.0),
            Self::Fixed(px) => (SizeKind::Fixed, px),
            Self::Percent(pct) => (SizeKind::Percent, pct),
            Self::Flex(weight) => (SizeKind::Flex, effective_weight(weight)),
        };
        SizeInfo { kind, magnitude }
    }

    #[must_use]
    pub fn kind(&self) -> SizeKind {
        self.info().kind
    }

    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    #[must_use]
    pub const fn is_flex(&self) -> bool {
        matches!(self, Self::Flex(_))
    }

    /// Whether a divider drag may change this track.
    #[must_use]
    pub const fn is_resizable(&self) -> bool {
        !self.is_auto()
    }

    /// Flex weight as used by the solver, `None` for other kinds.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        match *self {
            Self::Flex(weight) => Some(effective_weight(weight)),
            _ => None,
        }
    }
}

impl From<LayoutSize> for SizeToken {
    fn from(size: LayoutSize) -> Self {
        Self::classify(&size)
    }
}

impl From<SizeToken> for LayoutSize {
    fn from(token: SizeToken) -> Self {
        match token.normalized() {
            SizeToken::Fixed(px) => LayoutSize::Pixels(px),
            other => LayoutSize::Text(other.to_string()),
        }
    }
}

impl From<f64> for SizeToken {
    fn from(px: f64) -> Self {
        Self::classify(&LayoutSize::Pixels(px))
    }
}

impl From<u32> for SizeToken {
    fn from(px: u32) -> Self {
        Self::Fixed(f64::from(px))
    }
}

impl From<&str> for SizeToken {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for SizeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.normalized() {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(px) => write!(f, "{}px", format_number(px)),
            Self::Percent(pct) => write!(f, "{}%", format_number(pct)),
            Self::Flex(weight) => write!(f, "{}*", format_number(weight)),
        }
    }
}

/// Format a magnitude without a trailing `.0` for whole numbers.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn effective_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

fn valid_magnitude(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn parse_magnitude(text: &str) -> Option<f64> {
    let text = text.trim();
    // `f64::from_str` accepts "inf" and "NaN"; require a leading digit or dot.
    if !text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok().and_then(valid_magnitude)
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}
