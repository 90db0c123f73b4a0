use std::collections::BTreeSet;
use std::fmt;

use super::category::{AgeCategory, BmiCategory, Bucket, DistanceCategory};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, before any column is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a textual cell (CSV). Empty text is null.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            // "NaN" / "nan" mark a missing value, as pandas reads them.
            return if f.is_nan() { CellValue::Null } else { CellValue::Float(f) };
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Interpret the cell as a number. Numeric text is accepted so that
    /// quoted numbers in JSON still load. NaN counts as no number.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        v.filter(|v| !v.is_nan())
    }

    /// Interpret the cell as text; null and blank cells have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – rows as read, column names untouched
// ---------------------------------------------------------------------------

/// The untyped table a loader produces. Column names may still carry
/// surrounding whitespace or unusual casing; `prepare` resolves them.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    /// Row-major cells; every row is as long as `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// WorkoutRecord – one prepared row
// ---------------------------------------------------------------------------

/// A single running workout with its derived categories.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    /// Age in years.
    pub age: Option<f64>,
    pub distance_km: Option<f64>,
    pub bmi: Option<f64>,
    pub gender: Option<String>,
    pub calories_burned: Option<f64>,
    pub avg_heart_rate: Option<f64>,

    pub age_category: Option<AgeCategory>,
    pub distance_category: Option<DistanceCategory>,
    pub bmi_category: Option<BmiCategory>,
}

impl WorkoutRecord {
    /// Build a record from its base attributes, deriving the three categories.
    pub fn new(
        age: Option<f64>,
        distance_km: Option<f64>,
        bmi: Option<f64>,
        gender: Option<String>,
        calories_burned: Option<f64>,
        avg_heart_rate: Option<f64>,
    ) -> Self {
        WorkoutRecord {
            age_category: age.and_then(AgeCategory::classify),
            distance_category: distance_km.and_then(DistanceCategory::classify),
            bmi_category: bmi.and_then(BmiCategory::classify),
            age,
            distance_km,
            bmi,
            gender,
            calories_burned,
            avg_heart_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// PreparedTable – the read-only dataset every projection works from
// ---------------------------------------------------------------------------

/// The full prepared dataset with pre-computed value indices.
///
/// Built once at startup and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PreparedTable {
    records: Vec<WorkoutRecord>,
    /// Distinct non-null category values present, per axis.
    pub age_categories: BTreeSet<AgeCategory>,
    pub distance_categories: BTreeSet<DistanceCategory>,
    pub bmi_categories: BTreeSet<BmiCategory>,
    /// Distinct non-null genders present.
    pub genders: BTreeSet<String>,
}

impl PreparedTable {
    /// Build value indices from the prepared records.
    pub fn from_records(records: Vec<WorkoutRecord>) -> Self {
        let mut table = PreparedTable::default();
        for rec in &records {
            table.age_categories.extend(rec.age_category);
            table.distance_categories.extend(rec.distance_category);
            table.bmi_categories.extend(rec.bmi_category);
            table.genders.extend(rec.gender.clone());
        }
        table.records = records;
        table
    }

    pub fn records(&self) -> &[WorkoutRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
