use crate::ipc::error::committed;
use crate::ipc::handlers::{parse_params, store_mut};
use crate::ipc::types::{DaemonState, Request};
use crate::store::SettingsPatch;
use serde_json::json;

fn handle_settings_update(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let patch: SettingsPatch = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let commit = store.update_settings(&patch);
    // Scores may have been re-clamped, so the grades go back too.
    committed(
        &req.id,
        &commit,
        json!({
            "settings": commit.value,
            "grades": store.state().grades,
        }),
    )
}

pub fn try_handle(state: &mut DaemonState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "settings.update" => Some(handle_settings_update(state, req)),
        _ => None,
    }
}
