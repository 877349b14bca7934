use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Versioned slot key. Bump the suffix when the record layout changes so old
/// records are not repaired as if they were current.
pub const STATE_KEY: &str = "gradebook-state:v2";

pub const MAX_SCORE_MIN: f64 = 1.0;
pub const MAX_SCORE_MAX: f64 = 100.0;
pub const WEIGHT_MIN: f64 = 0.1;
pub const WEIGHT_MAX: f64 = 10.0;
pub const AGE_MIN: i64 = 5;
pub const AGE_MAX: i64 = 120;

pub const DEFAULT_STUDENT_NAME: &str = "Ana Luiza Ribeiro";
pub const DEFAULT_STUDENT_AGE: i64 = 16;
pub const DEFAULT_MAX_SCORE: f64 = 10.0;
pub const DEFAULT_PASS_THRESHOLD: f64 = 7.0;
pub const DEFAULT_WEIGHT: f64 = 1.0;

const DEFAULT_GRADES: [(&str, f64, f64); 3] = [
    ("Exam 1", 8.5, 1.0),
    ("Group project", 7.2, 1.2),
    ("Exam 2", 9.1, 1.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeEntry {
    pub id: String,
    pub label: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub max_score: f64,
    pub pass_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_score: DEFAULT_MAX_SCORE,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub age: i64,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_STUDENT_NAME.to_string(),
            age: DEFAULT_STUDENT_AGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub student: StudentProfile,
    pub settings: Settings,
    pub grades: Vec<GradeEntry>,
}

impl AppState {
    /// Fixed default profile and settings with the three sample grades.
    /// Every call hands out fresh grade ids.
    pub fn fresh_default() -> Self {
        Self {
            student: StudentProfile::default(),
            settings: Settings::default(),
            grades: default_grades(),
        }
    }
}

pub fn default_grades() -> Vec<GradeEntry> {
    DEFAULT_GRADES
        .iter()
        .map(|(label, score, weight)| GradeEntry {
            id: new_grade_id(),
            label: (*label).to_string(),
            score: *score,
            weight: *weight,
        })
        .collect()
}

pub fn new_grade_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn fallback_label(position: usize) -> String {
    format!("Assessment {}", position)
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
