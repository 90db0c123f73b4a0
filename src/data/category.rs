use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::UnknownCategory;

// ---------------------------------------------------------------------------
// Bucket – fixed-boundary classification of a continuous value
// ---------------------------------------------------------------------------

/// A categorical axis carved out of a continuous attribute.
///
/// Buckets are closed on the left and open on the right; the final bucket is
/// unbounded. `ALL` and `LOWER_EDGES` are aligned and in ascending order, which
/// is also the variant declaration order so the derived `Ord` matches.
pub trait Bucket: Copy + Ord + fmt::Debug + 'static {
    /// Human-readable axis name, used in error messages.
    const AXIS: &'static str;
    const ALL: &'static [Self];
    /// Inclusive lower edge of each bucket.
    const LOWER_EDGES: &'static [f64];

    fn label(self) -> &'static str;

    /// Place `value` in its bucket. NaN and values below the first edge have
    /// no bucket.
    fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        Self::LOWER_EDGES
            .iter()
            .rposition(|&edge| value >= edge)
            .map(|i| Self::ALL[i])
    }

    /// Position of this bucket in `ALL`.
    fn ordinal(self) -> usize {
        Self::ALL.iter().position(|&b| b == self).unwrap_or(0)
    }

    /// Parse a bucket label, tolerating case, whitespace, dash style and a
    /// trailing range annotation such as `"Teen (13–19)"`.
    fn from_label(label: &str) -> Result<Self, UnknownCategory> {
        let wanted = normalize_label(label);
        Self::ALL
            .iter()
            .copied()
            .find(|b| normalize_label(b.label()) == wanted)
            .ok_or_else(|| UnknownCategory {
                axis: Self::AXIS,
                label: label.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|b| b.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

fn normalize_label(label: &str) -> String {
    let head = label.split('(').next().unwrap_or(label);
    head.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '–' | '—' => '-',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Display, FromStr and Serialize all go through the bucket label.
macro_rules! bucket_text {
    ($($ty:ty),+ $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Bucket>::from_label(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    )+};
}

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeCategory {
    Teen,
    YoungAdult,
    MiddleAged,
    Senior,
}

impl Bucket for AgeCategory {
    const AXIS: &'static str = "age category";
    const ALL: &'static [Self] = &[
        AgeCategory::Teen,
        AgeCategory::YoungAdult,
        AgeCategory::MiddleAged,
        AgeCategory::Senior,
    ];
    const LOWER_EDGES: &'static [f64] = &[0.0, 19.0, 35.0, 55.0];

    fn label(self) -> &'static str {
        match self {
            AgeCategory::Teen => "Teen",
            AgeCategory::YoungAdult => "Young Adult",
            AgeCategory::MiddleAged => "Middle-Aged",
            AgeCategory::Senior => "Senior",
        }
    }
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DistanceCategory {
    UnderFive,
    FiveToTen,
    OverTen,
}

impl Bucket for DistanceCategory {
    const AXIS: &'static str = "distance category";
    const ALL: &'static [Self] = &[
        DistanceCategory::UnderFive,
        DistanceCategory::FiveToTen,
        DistanceCategory::OverTen,
    ];
    const LOWER_EDGES: &'static [f64] = &[0.0, 5.0, 10.0];

    fn label(self) -> &'static str {
        match self {
            DistanceCategory::UnderFive => "<5 km",
            DistanceCategory::FiveToTen => "5–10 km",
            DistanceCategory::OverTen => ">10 km",
        }
    }
}

// ---------------------------------------------------------------------------
// BMI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Bucket for BmiCategory {
    const AXIS: &'static str = "BMI category";
    const ALL: &'static [Self] = &[
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];
    const LOWER_EDGES: &'static [f64] = &[0.0, 18.5, 24.9, 29.9];

    fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

// ---------------------------------------------------------------------------
// Burn zone – computed per projection, never stored on the record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BurnZone {
    VeryLow,
    Low,
    Moderate,
    High,
    Extreme,
}

impl Bucket for BurnZone {
    const AXIS: &'static str = "burn zone";
    const ALL: &'static [Self] = &[
        BurnZone::VeryLow,
        BurnZone::Low,
        BurnZone::Moderate,
        BurnZone::High,
        BurnZone::Extreme,
    ];
    const LOWER_EDGES: &'static [f64] = &[0.0, 150.0, 300.0, 450.0, 600.0];

    fn label(self) -> &'static str {
        match self {
            BurnZone::VeryLow => "Very Low",
            BurnZone::Low => "Low",
            BurnZone::Moderate => "Moderate",
            BurnZone::High => "High",
            BurnZone::Extreme => "Extreme",
        }
    }
}

bucket_text!(AgeCategory, DistanceCategory, BmiCategory, BurnZone);
