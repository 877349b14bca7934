use crate::model::{GradeEntry, Settings};
use serde::Serialize;

/// Aggregate over a grade list. `count == 0` is the only reliable empty
/// signal: min and max are both 0 for an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub total_weight: f64,
    pub sum_weighted: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusLabel {
    NoGrades,
    Approved,
    AtRisk,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoGrades => "no-grades",
            Self::Approved => "approved",
            Self::AtRisk => "at-risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub label: StatusLabel,
    pub message: String,
}

pub fn compute_stats(grades: &[GradeEntry]) -> Stats {
    if grades.is_empty() {
        return Stats::default();
    }

    let mut sum_weighted = 0.0;
    let mut total_weight = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for g in grades {
        sum_weighted += g.score * g.weight;
        total_weight += g.weight;
        min = min.min(g.score);
        max = max.max(g.score);
    }

    let average = if total_weight > 0.0 {
        sum_weighted / total_weight
    } else {
        0.0
    };

    Stats {
        count: grades.len(),
        min,
        max,
        average,
        total_weight,
        sum_weighted,
    }
}

pub fn compute_status(stats: &Stats, settings: &Settings) -> Status {
    if stats.count == 0 {
        return Status {
            label: StatusLabel::NoGrades,
            message: "Add assessments to calculate the average and projections.".to_string(),
        };
    }

    // Threshold is inclusive.
    if stats.average >= settings.pass_threshold {
        Status {
            label: StatusLabel::Approved,
            message: format!(
                "Great work! You are {} point(s) above the pass threshold.",
                format_score(stats.average - settings.pass_threshold, 1)
            ),
        }
    } else {
        Status {
            label: StatusLabel::AtRisk,
            message: format!(
                "{} point(s) missing to reach the pass threshold.",
                format_score(settings.pass_threshold - stats.average, 1)
            ),
        }
    }
}

/// Score a further weight-1 assessment needs to bring the weighted average to
/// exactly the pass threshold. `<= 0` means any score passes; above
/// `max_score` means a single assessment cannot get there.
pub fn compute_required_next_score(stats: &Stats, settings: &Settings) -> f64 {
    if stats.count == 0 {
        return settings.pass_threshold;
    }
    settings.pass_threshold * (stats.total_weight + 1.0) - stats.sum_weighted
}

/// Fixed-decimal rendering; non-finite values render as `--`.
pub fn format_score(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let s = format!("{:.*}", decimals, value);
    // "-0.0" reads oddly next to a margin sign.
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}
