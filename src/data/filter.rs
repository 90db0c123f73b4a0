use std::fmt;

use serde::Serialize;

use super::category::{AgeCategory, BmiCategory, DistanceCategory};
use super::model::{PreparedTable, WorkoutRecord};

// ---------------------------------------------------------------------------
// Selection – one category per axis
// ---------------------------------------------------------------------------

/// The viewer's current filter: exactly one value on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub age: AgeCategory,
    pub distance: DistanceCategory,
    pub bmi: BmiCategory,
}

impl Selection {
    /// The selection a freshly opened dashboard starts with.
    pub const DEFAULT: Selection = Selection {
        age: AgeCategory::MiddleAged,
        distance: DistanceCategory::FiveToTen,
        bmi: BmiCategory::Normal,
    };

    pub fn new(age: AgeCategory, distance: DistanceCategory, bmi: BmiCategory) -> Self {
        Selection { age, distance, bmi }
    }

    /// Initial selection for `table`: on each axis the fixed default when the
    /// table has it, otherwise the first category present.
    pub fn default_for(table: &PreparedTable) -> Self {
        SelectionOptions::from_table(table).default_selection()
    }

    /// Whether a record matches all three axes.
    pub fn matches(&self, rec: &WorkoutRecord) -> bool {
        rec.age_category == Some(self.age)
            && rec.distance_category == Some(self.distance)
            && rec.bmi_category == Some(self.bmi)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::DEFAULT
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.age, self.distance, self.bmi)
    }
}

// ---------------------------------------------------------------------------
// SelectionOptions – what the dropdowns may offer
// ---------------------------------------------------------------------------

/// Distinct non-null categories present in the table, per axis, in bucket order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionOptions {
    pub age: Vec<AgeCategory>,
    pub distance: Vec<DistanceCategory>,
    pub bmi: Vec<BmiCategory>,
}

impl SelectionOptions {
    pub fn from_table(table: &PreparedTable) -> Self {
        SelectionOptions {
            age: table.age_categories.iter().copied().collect(),
            distance: table.distance_categories.iter().copied().collect(),
            bmi: table.bmi_categories.iter().copied().collect(),
        }
    }

    /// Whether every axis of `selection` is among the options.
    pub fn contains(&self, selection: &Selection) -> bool {
        self.age.contains(&selection.age)
            && self.distance.contains(&selection.distance)
            && self.bmi.contains(&selection.bmi)
    }

    pub fn default_selection(&self) -> Selection {
        let d = Selection::DEFAULT;
        Selection {
            age: pick(&self.age, d.age),
            distance: pick(&self.distance, d.distance),
            bmi: pick(&self.bmi, d.bmi),
        }
    }
}

fn pick<T: Copy + PartialEq>(options: &[T], preferred: T) -> T {
    if options.contains(&preferred) {
        preferred
    } else {
        options.first().copied().unwrap_or(preferred)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records matching all three axes of `selection`, in table order.
/// Borrowed views only; the table itself is never touched.
pub fn filter_records<'a>(table: &'a PreparedTable, selection: &Selection) -> Vec<&'a WorkoutRecord> {
    table
        .records()
        .iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: f64, dist: f64, bmi: f64) -> WorkoutRecord {
        WorkoutRecord::new(Some(age), Some(dist), Some(bmi), Some("Male".into()), Some(300.0), Some(140.0))
    }

    #[test]
    fn filter_is_logical_and() {
        let table = PreparedTable::from_records(vec![
            record(40.0, 7.0, 22.0), // all three match
            record(40.0, 7.0, 27.0), // BMI differs
            record(40.0, 3.0, 22.0), // distance differs
            record(20.0, 7.0, 22.0), // age differs
            record(50.0, 9.9, 18.5), // all three match
        ]);
        let hits = filter_records(&table, &Selection::DEFAULT);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].age, Some(40.0));
        assert_eq!(hits[1].age, Some(50.0));
    }

    #[test]
    fn uncategorised_records_never_match() {
        let table = PreparedTable::from_records(vec![WorkoutRecord::new(
            None,
            Some(7.0),
            Some(22.0),
            None,
            None,
            None,
        )]);
        assert!(filter_records(&table, &Selection::DEFAULT).is_empty());
    }

    #[test]
    fn options_come_in_bucket_order() {
        let table = PreparedTable::from_records(vec![
            record(60.0, 12.0, 35.0),
            record(15.0, 2.0, 17.0),
            record(40.0, 7.0, 22.0),
        ]);
        let opts = SelectionOptions::from_table(&table);
        assert_eq!(
            opts.age,
            vec![AgeCategory::Teen, AgeCategory::MiddleAged, AgeCategory::Senior]
        );
        assert_eq!(opts.distance.first(), Some(&DistanceCategory::UnderFive));
        assert!(opts.contains(&Selection::DEFAULT));
    }

    #[test]
    fn default_prefers_fixed_values() {
        let table = PreparedTable::from_records(vec![record(15.0, 2.0, 17.0), record(40.0, 7.0, 22.0)]);
        assert_eq!(Selection::default_for(&table), Selection::DEFAULT);
    }

    #[test]
    fn default_falls_back_to_first_available() {
        let table = PreparedTable::from_records(vec![record(60.0, 12.0, 35.0), record(15.0, 12.0, 31.0)]);
        let sel = Selection::default_for(&table);
        assert_eq!(sel.age, AgeCategory::Teen);
        assert_eq!(sel.distance, DistanceCategory::OverTen);
        assert_eq!(sel.bmi, BmiCategory::Obese);
    }

    #[test]
    fn empty_table_keeps_fixed_default() {
        assert_eq!(Selection::default_for(&PreparedTable::default()), Selection::DEFAULT);
    }
}
