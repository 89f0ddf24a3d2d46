use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Plotly `sequential.Blues_r`, darkest first.
pub const BLUES_R: [&str; 9] = [
    "rgb(8,48,107)",
    "rgb(8,81,156)",
    "rgb(33,113,181)",
    "rgb(66,146,198)",
    "rgb(107,174,214)",
    "rgb(158,202,225)",
    "rgb(198,219,239)",
    "rgb(222,235,247)",
    "rgb(247,251,255)",
];

pub const DARK_BACKGROUND: &str = "rgb(6, 6, 41)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub font_color: String,
    pub width: u32,
    pub height: u32,
    pub title_x: f32,
    pub donut_hole: f32,
    pub text_position: String,
    pub text_info: String,
    pub palette: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: DARK_BACKGROUND.to_string(),
            font_color: "white".to_string(),
            width: 400,
            height: 400,
            title_x: 0.5,
            donut_hole: 0.5,
            text_position: "inside".to_string(),
            text_info: "percent+label".to_string(),
            palette: BLUES_R.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Theme {
    pub fn donut_hints(&self) -> StyleHints {
        StyleHints {
            background: self.background.clone(),
            font_color: self.font_color.clone(),
            width: self.width,
            height: self.height,
            title_x: Some(self.title_x),
            text_position: Some(self.text_position.clone()),
            text_info: Some(self.text_info.clone()),
            palette: self.palette.clone(),
        }
    }

    // The bar chart keeps the renderer's default colours and left-aligned title.
    pub fn bar_hints(&self) -> StyleHints {
        StyleHints {
            background: self.background.clone(),
            font_color: self.font_color.clone(),
            width: self.width,
            height: self.height,
            title_x: None,
            text_position: None,
            text_info: None,
            palette: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleHints {
    pub background: String,
    pub font_color: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_info: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    Donut {
        hole: f32,
        slices: Vec<Slice>,
    },
    StackedBar {
        categories: Vec<String>,
        series: Vec<Series>,
        x_title: String,
        y_title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(flatten)]
    pub body: ChartBody,
    pub style: StyleHints,
}

impl ChartSpec {
    pub fn slices(&self) -> &[Slice] {
        match &self.body {
            ChartBody::Donut { slices, .. } => slices,
            ChartBody::StackedBar { .. } => &[],
        }
    }

    pub fn series(&self) -> &[Series] {
        match &self.body {
            ChartBody::StackedBar { series, .. } => series,
            ChartBody::Donut { .. } => &[],
        }
    }

    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.series().iter().find(|s| s.name == name)
    }

    pub fn total(&self) -> i64 {
        match &self.body {
            ChartBody::Donut { slices, .. } => slices.iter().map(|s| s.value).sum(),
            ChartBody::StackedBar { series, .. } => {
                series.iter().flat_map(|s| s.values.iter()).sum()
            }
        }
    }
}

pub fn build_breakdown(
    values: &[i64],
    labels: &[String],
    title: &str,
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    if values.len() != labels.len() || values.len() < 2 {
        return Err(DashboardError::ShapeMismatch {
            values: values.len(),
            labels: labels.len(),
        });
    }

    let slices = labels
        .iter()
        .zip(values)
        .map(|(label, value)| Slice {
            label: label.clone(),
            value: *value,
        })
        .collect();

    Ok(ChartSpec {
        title: title.to_string(),
        body: ChartBody::Donut {
            hole: theme.donut_hole,
            slices,
        },
        style: theme.donut_hints(),
    })
}

pub fn build_stacked_bar(
    title: &str,
    categories: &[String],
    series: Vec<Series>,
    axis_titles: (&str, &str),
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    if let Some(bad) = series.iter().find(|s| s.values.len() != categories.len()) {
        return Err(DashboardError::ShapeMismatch {
            values: bad.values.len(),
            labels: categories.len(),
        });
    }

    Ok(ChartSpec {
        title: title.to_string(),
        body: ChartBody::StackedBar {
            categories: categories.to_vec(),
            series,
            x_title: axis_titles.0.to_string(),
            y_title: axis_titles.1.to_string(),
        },
        style: theme.bar_hints(),
    })
}
