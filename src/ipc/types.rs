use std::path::PathBuf;

use crate::store::StateStore;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Default)]
pub struct DaemonState {
    pub workspace: Option<PathBuf>,
    pub store: Option<StateStore>,
}
