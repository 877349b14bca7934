use crate::model::{AppState, Settings};
use crate::stats::{
    compute_required_next_score, compute_stats, compute_status, format_score, Stats, Status,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "score", rename_all = "camelCase")]
pub enum RequiredNext {
    AnyScore,
    Unreachable,
    Score(f64),
}

pub fn interpret_required(stats: &Stats, settings: &Settings) -> RequiredNext {
    let required = compute_required_next_score(stats, settings);
    if stats.count == 0 {
        return RequiredNext::Score(required);
    }
    if required <= 0.0 {
        RequiredNext::AnyScore
    } else if required > settings.max_score {
        RequiredNext::Unreachable
    } else {
        RequiredNext::Score(required)
    }
}

pub fn margin(stats: &Stats, settings: &Settings) -> Option<f64> {
    (stats.count > 0).then(|| stats.average - settings.pass_threshold)
}

pub fn progress_percent(stats: &Stats, settings: &Settings) -> f64 {
    if stats.count == 0 || settings.max_score <= 0.0 {
        return 0.0;
    }
    (stats.average / settings.max_score * 100.0).min(100.0)
}

/// Display-ready view of the derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub student_name: String,
    pub student_age: i64,
    pub average: String,
    pub progress_percent: f64,
    pub status: String,
    pub message: String,
    pub count: usize,
    pub min: String,
    pub max: String,
    pub margin: String,
    pub required: String,
}

pub fn build_summary(state: &AppState) -> Summary {
    let settings = &state.settings;
    let stats = compute_stats(&state.grades);
    let Status { label, message } = compute_status(&stats, settings);
    let empty = stats.count == 0;
    let dash = || "--".to_string();

    let margin_text = match margin(&stats, settings) {
        None => dash(),
        Some(m) if m >= 0.0 => format!("+{} above", format_score(m, 1)),
        Some(m) => format!("{} below", format_score(m.abs(), 1)),
    };
    let required_text = match interpret_required(&stats, settings) {
        RequiredNext::AnyScore => "Any score".to_string(),
        RequiredNext::Unreachable => "Above max score".to_string(),
        RequiredNext::Score(x) => format_score(x, 1),
    };

    Summary {
        student_name: state.student.name.clone(),
        student_age: state.student.age,
        average: if empty {
            dash()
        } else {
            format_score(stats.average, 2)
        },
        progress_percent: progress_percent(&stats, settings),
        status: label.as_str().to_string(),
        message,
        count: stats.count,
        min: if empty { dash() } else { format_score(stats.min, 1) },
        max: if empty { dash() } else { format_score(stats.max, 1) },
        margin: margin_text,
        required: required_text,
    }
}
