//! Selection → five aggregate charts.
//!
//! Every call filters the prepared table afresh and rebuilds all five views;
//! nothing is cached between calls and the table is only ever borrowed.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::chart::{ChartKind, ChartPoint, ChartSpec};
use crate::color::{sequential_palette, ColorMap};
use crate::data::category::{Bucket, BurnZone};
use crate::data::filter::{filter_records, Selection};
use crate::data::model::{PreparedTable, WorkoutRecord};

pub const DASHBOARD_TITLE: &str = "Calories Burned by Running Analysis";

pub const BURN_ZONE_NOTE: &str = "Workouts are grouped into calorie burn zones based on the \
calories burned: Very Low (0–150), Low (150–300), Moderate (300–450), High (450–600), \
and Extreme (600+).";

const GENDER: &str = "Gender";
const COUNT: &str = "Count";
const CALORIES: &str = "Calories Burned";
const HEART_RATE: &str = "Average Heart Rate";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The five linked charts for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub gender_distribution: ChartSpec,
    pub calories_by_distance: ChartSpec,
    pub burn_zones: ChartSpec,
    pub calories_by_bmi: ChartSpec,
    pub heart_rate_by_age: ChartSpec,
}

impl ChartSet {
    /// All five charts in dashboard order.
    pub fn all(&self) -> [&ChartSpec; 5] {
        [
            &self.gender_distribution,
            &self.calories_by_distance,
            &self.burn_zones,
            &self.calories_by_bmi,
            &self.heart_rate_by_age,
        ]
    }
}

/// Everything a host needs to redraw the page after a selection change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub selection: Selection,
    /// Number of workouts matching the selection.
    pub matched: usize,
    pub burn_zone_note: &'static str,
    /// Gender → colour, shared by the four gender-coloured charts.
    pub legend: Vec<(String, String)>,
    pub charts: ChartSet,
}

impl DashboardView {
    pub fn build(table: &PreparedTable, selection: &Selection) -> Self {
        let rows = filter_records(table, selection);
        debug!("building view for {selection}: {} of {} workouts", rows.len(), table.len());
        let colors = ColorMap::new(&table.genders);
        DashboardView {
            title: DASHBOARD_TITLE,
            selection: *selection,
            matched: rows.len(),
            burn_zone_note: BURN_ZONE_NOTE,
            legend: colors.legend_entries(),
            charts: charts_for(&rows, &colors),
        }
    }
}

// ---------------------------------------------------------------------------
// project
// ---------------------------------------------------------------------------

/// Filter `table` to `selection` and compute the five charts.
///
/// Total over its input: a selection matching nothing yields five well-formed
/// charts with no points.
pub fn project(table: &PreparedTable, selection: &Selection) -> ChartSet {
    let rows = filter_records(table, selection);
    debug!("projecting {selection}: {} of {} workouts", rows.len(), table.len());
    // Colours come from the whole table so they hold steady across selections.
    charts_for(&rows, &ColorMap::new(&table.genders))
}

fn charts_for(rows: &[&WorkoutRecord], colors: &ColorMap) -> ChartSet {
    ChartSet {
        gender_distribution: gender_distribution(rows, colors),
        calories_by_distance: grouped_mean_chart(
            "Avg Calories Burned by Distance (Gender-wise)",
            "Distance Category",
            CALORIES,
            rows,
            |r| r.distance_category,
            |r| r.calories_burned,
            colors,
        ),
        burn_zones: burn_zone_distribution(rows),
        calories_by_bmi: grouped_mean_chart(
            "Calories Burned by BMI (Gender-wise)",
            "BMI Category",
            CALORIES,
            rows,
            |r| r.bmi_category,
            |r| r.calories_burned,
            colors,
        ),
        heart_rate_by_age: grouped_mean_chart(
            "Average Heart Rate by Age Category (Gender-wise)",
            "Age Category",
            HEART_RATE,
            rows,
            |r| r.age_category,
            |r| r.avg_heart_rate,
            colors,
        ),
    }
}

// ---------------------------------------------------------------------------
// The individual views
// ---------------------------------------------------------------------------

/// Workouts per gender, most frequent first.
fn gender_distribution(rows: &[&WorkoutRecord], colors: &ColorMap) -> ChartSpec {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for gender in rows.iter().filter_map(|r| r.gender.as_deref()) {
        *counts.entry(gender).or_default() += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable, so equal counts stay in name order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let points = counts
        .into_iter()
        .map(|(gender, n)| ChartPoint {
            category: gender.to_string(),
            group: Some(gender.to_string()),
            value: n as f64,
            color: Some(colors.color_for(gender).to_string()),
        })
        .collect();

    ChartSpec::new(
        ChartKind::Bar,
        "Gender Distribution in Selected Age Group",
        GENDER,
        COUNT,
    )
    .color_by(GENDER)
    .with_points(points)
}

/// Workouts per burn zone, in zone order, each zone with its fixed colour.
fn burn_zone_distribution(rows: &[&WorkoutRecord]) -> ChartSpec {
    let mut counts: BTreeMap<BurnZone, usize> = BTreeMap::new();
    for zone in rows
        .iter()
        .filter_map(|r| r.calories_burned)
        .filter_map(BurnZone::classify)
    {
        *counts.entry(zone).or_default() += 1;
    }

    let palette = sequential_palette(BurnZone::ALL.len());
    let points = counts
        .into_iter()
        .map(|(zone, n)| ChartPoint {
            category: zone.to_string(),
            group: None,
            value: n as f64,
            color: palette.get(zone.ordinal()).cloned(),
        })
        .collect();

    ChartSpec::new(ChartKind::Donut, "Calories Burned by Zone", "Burn Zone", COUNT)
        .hole(0.5)
        .with_points(points)
}

#[derive(Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn value(&self) -> f64 {
        self.sum / self.n as f64
    }
}

/// Mean of `value` per (category, gender). Rows missing the category, the
/// gender or the value contribute nothing, so a combination with no usable
/// rows has no bar at all.
fn grouped_mean_chart<K: Bucket + std::fmt::Display>(
    title: &str,
    category_axis: &str,
    value_axis: &str,
    rows: &[&WorkoutRecord],
    category: impl Fn(&WorkoutRecord) -> Option<K>,
    value: impl Fn(&WorkoutRecord) -> Option<f64>,
    colors: &ColorMap,
) -> ChartSpec {
    let mut groups: BTreeMap<(K, &str), Mean> = BTreeMap::new();
    for rec in rows {
        let v = value(rec).filter(|v| !v.is_nan());
        let (Some(cat), Some(gender), Some(v)) = (category(rec), rec.gender.as_deref(), v) else {
            continue;
        };
        groups.entry((cat, gender)).or_default().push(v);
    }

    let points = groups
        .into_iter()
        .map(|((cat, gender), mean)| ChartPoint {
            category: cat.to_string(),
            group: Some(gender.to_string()),
            value: mean.value(),
            color: Some(colors.color_for(gender).to_string()),
        })
        .collect();

    ChartSpec::new(ChartKind::GroupedBar, title, category_axis, value_axis)
        .color_by(GENDER)
        .with_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::category::{AgeCategory, BmiCategory, DistanceCategory};

    fn workout(age: f64, dist: f64, bmi: f64, gender: &str, cal: f64, hr: f64) -> WorkoutRecord {
        WorkoutRecord::new(
            Some(age),
            Some(dist),
            Some(bmi),
            Some(gender.to_string()),
            Some(cal),
            Some(hr),
        )
    }

    fn selection() -> Selection {
        Selection::new(AgeCategory::MiddleAged, DistanceCategory::FiveToTen, BmiCategory::Normal)
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn two_record_scenario() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(40.0, 7.0, 22.0, "Female", 200.0, 130.0),
        ]);
        let charts = project(&table, &selection());

        let g = &charts.gender_distribution;
        assert_eq!(g.kind, ChartKind::Bar);
        assert_eq!(g.points.len(), 2);
        assert!(close(g.value_of("Male", Some("Male")), 1.0));
        assert!(close(g.value_of("Female", Some("Female")), 1.0));

        let d = &charts.calories_by_distance;
        assert_eq!(d.points.len(), 2);
        assert!(close(d.value_of("5–10 km", Some("Male")), 500.0));
        assert!(close(d.value_of("5–10 km", Some("Female")), 200.0));

        let z = &charts.burn_zones;
        assert_eq!(z.kind, ChartKind::Donut);
        assert_eq!(z.points.len(), 2);
        assert!(close(z.value_of("High", None), 1.0));
        assert!(close(z.value_of("Low", None), 1.0));

        let b = &charts.calories_by_bmi;
        assert!(close(b.value_of("Normal", Some("Male")), 500.0));
        assert!(close(b.value_of("Normal", Some("Female")), 200.0));

        let h = &charts.heart_rate_by_age;
        assert!(close(h.value_of("Middle-Aged", Some("Male")), 140.0));
        assert!(close(h.value_of("Middle-Aged", Some("Female")), 130.0));
    }

    #[test]
    fn empty_selection_gives_five_empty_charts() {
        let table = PreparedTable::from_records(vec![workout(20.0, 3.0, 30.0, "Male", 500.0, 140.0)]);
        let charts = project(&table, &selection());
        for chart in charts.all() {
            assert!(chart.is_empty(), "{} should be empty", chart.title);
            assert_eq!(chart.theme, crate::chart::Theme::DARK);
        }
    }

    #[test]
    fn absent_groups_are_omitted_not_zeroed() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(45.0, 8.0, 23.0, "Male", 300.0, 150.0),
            // Outside the selection: the only Female row.
            workout(20.0, 7.0, 22.0, "Female", 200.0, 130.0),
        ]);
        let charts = project(&table, &selection());
        assert_eq!(charts.gender_distribution.points.len(), 1);
        assert_eq!(charts.gender_distribution.value_of("Female", Some("Female")), None);
        assert_eq!(charts.calories_by_distance.points.len(), 1);
        assert!(close(charts.calories_by_distance.value_of("5–10 km", Some("Male")), 400.0));
        assert_eq!(charts.heart_rate_by_age.value_of("Middle-Aged", Some("Female")), None);
    }

    #[test]
    fn null_values_are_skipped_by_the_mean() {
        let mut blank = workout(40.0, 7.0, 22.0, "Female", 0.0, 0.0);
        blank.calories_burned = None;
        blank.avg_heart_rate = None;
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(40.0, 7.0, 22.0, "Male", 300.0, 120.0),
            blank,
        ]);
        let charts = project(&table, &selection());
        // Female still counted in the gender bars...
        assert!(close(charts.gender_distribution.value_of("Female", Some("Female")), 1.0));
        // ...but has no usable calories or heart rate, so no bar there.
        assert_eq!(charts.calories_by_bmi.value_of("Normal", Some("Female")), None);
        assert_eq!(charts.heart_rate_by_age.value_of("Middle-Aged", Some("Female")), None);
        assert!(close(charts.calories_by_bmi.value_of("Normal", Some("Male")), 400.0));
        assert!(charts.burn_zones.points.iter().all(|p| p.value.is_finite()));
    }

    #[test]
    fn nan_values_are_treated_as_missing() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(40.0, 7.0, 22.0, "Male", f64::NAN, f64::NAN),
        ]);
        let charts = project(&table, &selection());
        assert!(close(charts.calories_by_distance.value_of("5–10 km", Some("Male")), 500.0));
        assert!(close(charts.heart_rate_by_age.value_of("Middle-Aged", Some("Male")), 140.0));
        assert!(close(charts.burn_zones.value_of("High", None), 1.0));
        assert_eq!(charts.burn_zones.points.len(), 1);
        let json = serde_json::to_string(&charts).unwrap();
        assert!(!json.contains("null"));
    }

    #[test]
    fn records_without_gender_only_reach_the_donut() {
        let mut anon = workout(40.0, 7.0, 22.0, "", 700.0, 160.0);
        anon.gender = None;
        let table = PreparedTable::from_records(vec![anon]);
        let charts = project(&table, &selection());
        assert!(charts.gender_distribution.is_empty());
        assert!(charts.calories_by_distance.is_empty());
        assert!(close(charts.burn_zones.value_of("Extreme", None), 1.0));
    }

    #[test]
    fn burn_zone_boundaries_and_order() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 600.0, 140.0),
            workout(40.0, 7.0, 22.0, "Male", 150.0, 140.0),
            workout(40.0, 7.0, 22.0, "Male", 149.0, 140.0),
            workout(40.0, 7.0, 22.0, "Male", 150.0, 140.0),
        ]);
        let zones = project(&table, &selection()).burn_zones;
        let names: Vec<&str> = zones.points.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(names, vec!["Very Low", "Low", "Extreme"]);
        assert!(close(zones.value_of("Low", None), 2.0));

        let palette = sequential_palette(5);
        assert_eq!(zones.points[0].color.as_deref(), Some(palette[0].as_str()));
        assert_eq!(zones.points[2].color.as_deref(), Some(palette[4].as_str()));
    }

    #[test]
    fn gender_bars_are_ordered_by_count() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(40.0, 7.0, 22.0, "Female", 200.0, 130.0),
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(40.0, 7.0, 22.0, "Other", 500.0, 140.0),
        ]);
        let g = project(&table, &selection()).gender_distribution;
        let order: Vec<&str> = g.points.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(order, vec!["Male", "Female", "Other"]);
    }

    #[test]
    fn gender_colour_ignores_the_selection() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0),
            workout(20.0, 3.0, 30.0, "Female", 200.0, 130.0),
            workout(20.0, 3.0, 30.0, "Male", 200.0, 130.0),
        ]);
        let a = project(&table, &selection());
        let b = project(
            &table,
            &Selection::new(AgeCategory::YoungAdult, DistanceCategory::UnderFive, BmiCategory::Obese),
        );
        let male_a = &a.gender_distribution.points[0];
        let male_b = b
            .gender_distribution
            .points
            .iter()
            .find(|p| p.category == "Male")
            .unwrap();
        assert_eq!(male_a.color, male_b.color);
    }

    #[test]
    fn projection_is_deterministic() {
        let table = PreparedTable::from_records(vec![
            workout(40.0, 7.0, 22.0, "Male", 512.3, 141.0),
            workout(41.0, 6.0, 21.0, "Female", 233.1, 128.5),
            workout(42.0, 9.0, 24.0, "Male", 377.7, 133.3),
        ]);
        let first = serde_json::to_string(&DashboardView::build(&table, &selection())).unwrap();
        for _ in 0..3 {
            let again = serde_json::to_string(&DashboardView::build(&table, &selection())).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn view_carries_page_context() {
        let table = PreparedTable::from_records(vec![workout(40.0, 7.0, 22.0, "Male", 500.0, 140.0)]);
        let view = DashboardView::build(&table, &selection());
        assert_eq!(view.title, DASHBOARD_TITLE);
        assert_eq!(view.matched, 1);
        assert_eq!(view.legend.len(), 1);
        assert_eq!(view.legend[0].0, "Male");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["selection"]["age"], "Middle-Aged");
        assert_eq!(json["selection"]["distance"], "5–10 km");
        assert_eq!(json["charts"]["burn_zones"]["kind"], "donut");
    }
}
