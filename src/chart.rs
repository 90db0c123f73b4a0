use serde::Serialize;

// ---------------------------------------------------------------------------
// Chart specification handed to the rendering collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    GroupedBar,
    Donut,
}

/// Shared visual theme applied to every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font_color: &'static str,
}

impl Theme {
    pub const DARK: Theme = Theme {
        paper_bgcolor: "#111",
        plot_bgcolor: "#111",
        font_color: "white",
    };
}

/// One bar or slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Value on the category axis (or slice name for a donut).
    pub category: String,
    /// Colour-grouping value, when the chart has a `color_by` dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A complete, renderer-agnostic chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub category_axis: String,
    pub value_axis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_by: Option<String>,
    pub points: Vec<ChartPoint>,
    /// Inner radius fraction, donuts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    pub theme: Theme,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: &str, category_axis: &str, value_axis: &str) -> Self {
        ChartSpec {
            kind,
            title: title.to_string(),
            category_axis: category_axis.to_string(),
            value_axis: value_axis.to_string(),
            color_by: None,
            points: Vec::new(),
            hole: None,
            theme: Theme::DARK,
        }
    }

    pub fn color_by(mut self, dimension: &str) -> Self {
        self.color_by = Some(dimension.to_string());
        self
    }

    pub fn hole(mut self, fraction: f64) -> Self {
        self.hole = Some(fraction);
        self
    }

    pub fn with_points(mut self, points: Vec<ChartPoint>) -> Self {
        self.points = points;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up the value of a point by category and group.
    pub fn value_of(&self, category: &str, group: Option<&str>) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.category == category && p.group.as_deref() == group)
            .map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_without_empty_optionals() {
        let spec = ChartSpec::new(ChartKind::Donut, "Zones", "Burn Zone", "Count")
            .hole(0.5)
            .with_points(vec![ChartPoint {
                category: "Low".into(),
                group: None,
                value: 2.0,
                color: Some("#032333".into()),
            }]);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "donut");
        assert_eq!(json["hole"], 0.5);
        assert!(json.get("color_by").is_none());
        assert!(json["points"][0].get("group").is_none());
        assert_eq!(json["theme"]["paper_bgcolor"], "#111");
        assert_eq!(json["theme"]["font_color"], "white");
    }

    #[test]
    fn value_lookup_respects_group() {
        let spec = ChartSpec::new(ChartKind::GroupedBar, "t", "x", "y")
            .color_by("Gender")
            .with_points(vec![
                ChartPoint { category: "A".into(), group: Some("Male".into()), value: 1.0, color: None },
                ChartPoint { category: "A".into(), group: Some("Female".into()), value: 2.0, color: None },
            ]);
        assert_eq!(spec.value_of("A", Some("Female")), Some(2.0));
        assert_eq!(spec.value_of("A", None), None);
        assert!(!spec.is_empty());
    }
}
