use crate::ipc::error::{committed, err, ok};
use crate::ipc::handlers::{require_confirm, store_mut};
use crate::ipc::types::{DaemonState, Request};
use serde_json::json;

fn handle_state_get(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "state": store.state() }))
}

fn handle_state_import(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let Some(raw) = req.params.get("state") else {
        return err(&req.id, "bad_params", "missing params.state", None);
    };
    let commit = store.replace(raw);
    committed(&req.id, &commit, json!({ "state": store.state() }))
}

fn handle_state_reset(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    if let Err(resp) = require_confirm(req) {
        return resp;
    }
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let commit = store.reset();
    committed(&req.id, &commit, json!({ "state": store.state() }))
}

pub fn try_handle(state: &mut DaemonState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "state.get" => Some(handle_state_get(state, req)),
        "state.import" => Some(handle_state_import(state, req)),
        "state.reset" => Some(handle_state_reset(state, req)),
        _ => None,
    }
}
