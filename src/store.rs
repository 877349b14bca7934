use crate::db;
use crate::model::{
    clamp, fallback_label, new_grade_id, AppState, GradeEntry, Settings, DEFAULT_STUDENT_NAME,
    DEFAULT_WEIGHT, MAX_SCORE_MAX, MAX_SCORE_MIN, STATE_KEY, WEIGHT_MAX, WEIGHT_MIN,
};
use crate::sanitize::{non_blank, repair_age, sanitize, to_number_or, to_submitted_number};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single durable key-value slot holding the serialized state.
pub trait Slot {
    fn read(&self) -> anyhow::Result<Option<String>>;
    fn write(&mut self, value: &str) -> anyhow::Result<()>;

    fn updated_at(&self) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

pub struct SqliteSlot {
    conn: Connection,
    key: String,
}

impl SqliteSlot {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            key: STATE_KEY.to_string(),
        }
    }
}

impl Slot for SqliteSlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        db::slot_get(&self.conn, &self.key)
    }

    fn write(&mut self, value: &str) -> anyhow::Result<()> {
        db::slot_set(&self.conn, &self.key, value)
    }

    fn updated_at(&self) -> anyhow::Result<Option<String>> {
        db::slot_updated_at(&self.conn, &self.key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write state slot: {0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddGradeError {
    #[error("score is missing or not a number")]
    MissingScore,
}

/// Result of one mutation. The in-memory state already reflects the change;
/// `persist_error` reports a failed write that the next mutation may retry.
#[derive(Debug)]
pub struct Commit<T> {
    pub value: T,
    pub persist_error: Option<PersistError>,
}

impl<T> Commit<T> {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only an absent field is `None`.
fn present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}

/// Absent fields are left alone; present ones, `null` included, are repaired.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub age: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(deserialize_with = "present")]
    pub max_score: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub pass_threshold: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradeInput {
    #[serde(deserialize_with = "present")]
    pub label: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub score: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub weight: Option<Value>,
}

/// Reads the slot; anything absent, unreadable or unparsable becomes the
/// default state, everything else goes through `sanitize`.
pub fn load(slot: &dyn Slot) -> AppState {
    let text = match slot.read() {
        Ok(Some(t)) => t,
        Ok(None) => {
            tracing::info!("no stored state, starting from defaults");
            return AppState::fresh_default();
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "state slot unreadable, starting from defaults");
            return AppState::fresh_default();
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(raw) => sanitize(&raw),
        Err(e) => {
            tracing::warn!(error = %e, "stored state is not valid JSON, starting from defaults");
            AppState::fresh_default()
        }
    }
}

pub struct StateStore {
    slot: Box<dyn Slot>,
    state: AppState,
}

impl StateStore {
    pub fn open(slot: Box<dyn Slot>) -> Self {
        let state = load(&*slot);
        Self { slot, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn slot_updated_at(&self) -> anyhow::Result<Option<String>> {
        self.slot.updated_at()
    }

    /// Overwrites the slot with the current state.
    pub fn save(&mut self) -> Result<(), PersistError> {
        let text = serde_json::to_string(&self.state)?;
        self.slot
            .write(&text)
            .map_err(|e| PersistError::Write(format!("{e:#}")))
    }

    fn commit<T>(&mut self, value: T) -> Commit<T> {
        let persist_error = self.save().err();
        if let Some(e) = &persist_error {
            tracing::warn!(error = %e, "state kept in memory, persistence failed");
        }
        Commit {
            value,
            persist_error,
        }
    }

    pub fn reset(&mut self) -> Commit<()> {
        tracing::info!("resetting state to defaults");
        self.state = AppState::fresh_default();
        self.commit(())
    }

    /// Adopts arbitrary input after repairing it.
    pub fn replace(&mut self, raw: &Value) -> Commit<()> {
        self.state = sanitize(raw);
        self.commit(())
    }

    pub fn update_student(&mut self, patch: &StudentPatch) -> Commit<()> {
        if let Some(name) = &patch.name {
            self.state.student.name =
                non_blank(Some(name)).unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string());
        }
        if let Some(age) = &patch.age {
            self.state.student.age = repair_age(Some(age), self.state.student.age);
        }
        self.commit(())
    }

    /// maxScore is applied first; the threshold and every score are then
    /// re-clamped against it.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Commit<Settings> {
        let current = self.state.settings;
        let max_score = clamp(
            to_number_or(patch.max_score.as_ref(), current.max_score),
            MAX_SCORE_MIN,
            MAX_SCORE_MAX,
        );
        let pass_threshold = clamp(
            to_number_or(patch.pass_threshold.as_ref(), current.pass_threshold),
            0.0,
            max_score,
        );
        self.state.settings = Settings {
            max_score,
            pass_threshold,
        };
        if max_score < current.max_score {
            for g in &mut self.state.grades {
                g.score = clamp(g.score, 0.0, max_score);
            }
        }
        tracing::debug!(max_score, pass_threshold, "settings updated");
        let settings = self.state.settings;
        self.commit(settings)
    }

    /// Rejects the add when no numeric score is given; nothing is created.
    pub fn add_grade(&mut self, input: &GradeInput) -> Result<Commit<GradeEntry>, AddGradeError> {
        let score = input
            .score
            .as_ref()
            .and_then(to_submitted_number)
            .ok_or(AddGradeError::MissingScore)?;
        let entry = GradeEntry {
            id: new_grade_id(),
            label: non_blank(input.label.as_ref())
                .unwrap_or_else(|| fallback_label(self.state.grades.len() + 1)),
            score: clamp(score, 0.0, self.state.settings.max_score),
            weight: clamp(
                to_number_or(input.weight.as_ref(), DEFAULT_WEIGHT),
                WEIGHT_MIN,
                WEIGHT_MAX,
            ),
        };
        tracing::debug!(id = %entry.id, label = %entry.label, "grade added");
        self.state.grades.push(entry.clone());
        Ok(self.commit(entry))
    }

    /// Returns how many entries carried `id`. An unknown id writes nothing.
    pub fn remove_grade(&mut self, id: &str) -> Commit<usize> {
        let before = self.state.grades.len();
        self.state.grades.retain(|g| g.id != id);
        let removed = before - self.state.grades.len();
        if removed == 0 {
            return Commit {
                value: 0,
                persist_error: None,
            };
        }
        self.commit(removed)
    }

    pub fn clear_grades(&mut self) -> Commit<usize> {
        let removed = self.state.grades.len();
        tracing::info!(removed, "clearing all grades");
        self.state.grades.clear();
        self.commit(removed)
    }
}
