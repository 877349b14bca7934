pub mod core;
pub mod grades;
pub mod settings;
pub mod state;
pub mod stats;
pub mod student;

use crate::ipc::error::err;
use crate::ipc::types::{DaemonState, Request};
use crate::store::StateStore;

/// The open store, or the `no_workspace` response to send back.
pub(crate) fn store_mut<'a>(
    state: &'a mut DaemonState,
    req: &Request,
) -> Result<&'a mut StateStore, serde_json::Value> {
    state
        .store
        .as_mut()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// Destructive methods only run with an explicit `confirm: true`.
pub(crate) fn require_confirm(req: &Request) -> Result<(), serde_json::Value> {
    if req.params.get("confirm").and_then(|v| v.as_bool()) == Some(true) {
        Ok(())
    } else {
        Err(err(
            &req.id,
            "not_confirmed",
            format!("{} requires params.confirm = true", req.method),
            None,
        ))
    }
}

/// Deserializes `params`, treating an absent params object as empty.
pub(crate) fn parse_params<T>(req: &Request) -> Result<T, serde_json::Value>
where
    T: serde::de::DeserializeOwned + Default,
{
    if req.params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(req.params.clone())
        .map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}
