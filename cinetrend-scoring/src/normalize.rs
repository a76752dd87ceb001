//! Rating normalization onto a common 0 - 100 scale

use cinetrend_core::RatingSource;
use tracing::debug;

/// Native bounds of a rating source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeScale {
    pub min: f64,
    pub max: f64,
}

impl NativeScale {
    /// 0 - 10 star-style ratings
    pub const TEN_POINT: NativeScale = NativeScale::new(0.0, 10.0);
    /// 0 - 100 percentages and scores
    pub const PERCENT: NativeScale = NativeScale::new(0.0, 100.0);
    /// Vote counts, saturating at one million
    pub const VOTE_COUNT: NativeScale = NativeScale::new(0.0, 1_000_000.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn width(&self) -> Option<f64> {
        let width = self.max - self.min;
        (width.is_finite() && width > 0.0).then_some(width)
    }
}

/// Native scale of each rating source
pub fn scale_for(source: RatingSource) -> NativeScale {
    match source {
        RatingSource::Imdb => NativeScale::TEN_POINT,
        RatingSource::RottenTomatoes => NativeScale::PERCENT,
        RatingSource::Metacritic => NativeScale::PERCENT,
        RatingSource::Metascore => NativeScale::PERCENT,
        RatingSource::ImdbVotes => NativeScale::VOTE_COUNT,
    }
}

/// A rating on the common scale, always within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct NormalizedRating(f64);

impl NormalizedRating {
    /// Clamp a finite value into [0, 100]; NaN and infinities are rejected
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then(|| Self(value.clamp(0.0, 100.0)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Raw rating input as it arrives from a source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        RawValue::Text(value)
    }
}

impl<'a> From<&'a String> for RawValue<'a> {
    fn from(value: &'a String) -> Self {
        RawValue::Text(value.as_str())
    }
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u64> for RawValue<'_> {
    fn from(value: u64) -> Self {
        RawValue::Number(value as f64)
    }
}

/// Normalize a raw rating from its native scale onto 0 - 100
///
/// Returns `None` for unparseable input, non-finite values, and zero-width
/// or inverted scales. Values outside the native scale are clamped.
pub fn normalize<'a>(raw: impl Into<RawValue<'a>>, scale: NativeScale) -> Option<NormalizedRating> {
    let raw = raw.into();
    let width = scale.width()?;

    let value = match raw {
        RawValue::Number(n) => n,
        RawValue::Text(text) => parse_text(text, scale, width)?,
    };

    if !value.is_finite() {
        return None;
    }

    let scaled = if scale == NativeScale::PERCENT {
        value
    } else {
        (value - scale.min) * 100.0 / width
    };

    NormalizedRating::new(scaled)
}

/// Parse "93%", "8.1/10", "1,234,567" or "7.5" into a native-scale value
fn parse_text(text: &str, scale: NativeScale, width: f64) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim_end_matches('%').trim();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("n/a") {
        return None;
    }

    if let Some((numerator, denominator)) = cleaned.split_once('/') {
        let numerator: f64 = numerator.trim().parse().ok()?;
        let denominator: f64 = denominator.trim().parse().ok()?;
        if !(denominator.is_finite() && denominator > 0.0) {
            debug!("Rejecting rating fraction with denominator {}", denominator);
            return None;
        }
        return Some(scale.min + numerator * width / denominator);
    }

    cleaned.parse().ok()
}
