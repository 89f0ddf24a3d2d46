use serde::{Deserialize, Serialize};

use crate::chart::{ChartSpec, Series, Theme, build_breakdown, build_stacked_bar};
use crate::dataset::Dataset;
use crate::error::{DashboardError, DashboardResult};

pub const IN_CONTEST_LABEL: &str = "In Contest";
pub const COMPLETED_PASSES: &str = "Completed Passes";
pub const INCOMPLETE_PASSES: &str = "Incomplete Passes";

/// Behaviours of the first dashboard release that look like authoring
/// mistakes. Both default to on so the rendered page matches what users saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quirks {
    /// Home score rendered as `"{goals1} : "`, away score bare.
    pub score_separator_on_home: bool,
    /// Free-kicks chart shows team1's count on both slices.
    pub free_kicks_mirror_team1: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            score_separator_on_home: true,
            free_kicks_mirror_team1: true,
        }
    }
}

impl Quirks {
    pub fn none() -> Self {
        Self {
            score_separator_on_home: false,
            free_kicks_mirror_team1: false,
        }
    }

    pub fn active(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.score_separator_on_home {
            out.push("score_separator_on_home");
        }
        if self.free_kicks_mirror_team1 {
            out.push("free_kicks_mirror_team1");
        }
        out
    }
}

/// Everything a deriver may read besides the selection index.
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'a> {
    pub dataset: &'a Dataset,
    pub theme: &'a Theme,
    pub quirks: Quirks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Derived {
    Pair(String, String),
    Chart(ChartSpec),
}

impl Derived {
    pub fn arity(&self) -> usize {
        match self {
            Derived::Pair(..) => 2,
            Derived::Chart(_) => 1,
        }
    }
}

pub fn dropdown_options(dataset: &Dataset) -> Vec<DropdownOption> {
    dataset
        .records()
        .iter()
        .enumerate()
        .map(|(value, record)| DropdownOption {
            label: record.label(),
            value,
        })
        .collect()
}

pub fn derive_team_labels(dataset: &Dataset, index: i64) -> DashboardResult<(String, String)> {
    let m = dataset.get(index)?;
    Ok((m.team2.clone(), m.team1.clone()))
}

pub fn derive_score(
    dataset: &Dataset,
    index: i64,
    quirks: Quirks,
) -> DashboardResult<(String, String)> {
    let m = dataset.get(index)?;
    let home = if quirks.score_separator_on_home {
        format!("{} : ", m.goals1)
    } else {
        m.goals1.to_string()
    };
    Ok((m.goals2.to_string(), home))
}

pub fn derive_attempts_chart(
    dataset: &Dataset,
    index: i64,
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    let m = dataset.get(index)?;
    build_breakdown(
        &[i64::from(m.attempts1), i64::from(m.attempts2)],
        &[m.team1.clone(), m.team2.clone()],
        "Goal Attempts",
        theme,
    )
}

pub fn derive_passes_chart(
    dataset: &Dataset,
    index: i64,
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    let m = dataset.get(index)?;
    let completed = [i64::from(m.passes_completed1), i64::from(m.passes_completed2)];
    let incomplete = [
        i64::from(m.passes1) - completed[0],
        i64::from(m.passes2) - completed[1],
    ];
    if incomplete.iter().any(|v| *v < 0) {
        tracing::warn!(
            index,
            team1 = %m.team1,
            team2 = %m.team2,
            "completed passes exceed total passes; chart will show negative bars"
        );
    }

    build_stacked_bar(
        "Passes",
        &[m.team1.clone(), m.team2.clone()],
        vec![
            Series {
                name: COMPLETED_PASSES.to_string(),
                values: completed.to_vec(),
            },
            Series {
                name: INCOMPLETE_PASSES.to_string(),
                values: incomplete.to_vec(),
            },
        ],
        ("Teams", "Passes"),
        theme,
    )
}

pub fn parse_percentage(field: &'static str, raw: &str) -> DashboardResult<i64> {
    let malformed = || DashboardError::MalformedPercentage {
        field,
        value: raw.to_string(),
    };
    let digits = raw.trim().strip_suffix('%').ok_or_else(malformed)?;
    let value = digits.trim().parse::<i64>().map_err(|_| malformed())?;
    if !(0..=100).contains(&value) {
        return Err(malformed());
    }
    Ok(value)
}

pub fn derive_possession_chart(
    dataset: &Dataset,
    index: i64,
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    let m = dataset.get(index)?;
    let values = [
        parse_percentage("possession team1", &m.possession1)?,
        parse_percentage("possession team2", &m.possession2)?,
        parse_percentage("possession in contest", &m.possession_contested)?,
    ];
    build_breakdown(
        &values,
        &[m.team1.clone(), m.team2.clone(), IN_CONTEST_LABEL.to_string()],
        "Possession",
        theme,
    )
}

pub fn derive_fouls_chart(
    dataset: &Dataset,
    index: i64,
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    let m = dataset.get(index)?;
    build_breakdown(
        &[i64::from(m.fouls_against1), i64::from(m.fouls_against2)],
        &[m.team1.clone(), m.team2.clone()],
        "Fouls",
        theme,
    )
}

pub fn derive_free_kicks_chart(
    dataset: &Dataset,
    index: i64,
    theme: &Theme,
    quirks: Quirks,
) -> DashboardResult<ChartSpec> {
    let m = dataset.get(index)?;
    let away = if quirks.free_kicks_mirror_team1 {
        m.free_kicks1
    } else {
        m.free_kicks2
    };
    build_breakdown(
        &[i64::from(m.free_kicks1), i64::from(away)],
        &[m.team1.clone(), m.team2.clone()],
        "Free kicks",
        theme,
    )
}

pub fn derive_goal_preventions_chart(
    dataset: &Dataset,
    index: i64,
    theme: &Theme,
) -> DashboardResult<ChartSpec> {
    let m = dataset.get(index)?;
    build_breakdown(
        &[i64::from(m.goal_preventions1), i64::from(m.goal_preventions2)],
        &[m.team1.clone(), m.team2.clone()],
        "Goal Preventions",
        theme,
    )
}
