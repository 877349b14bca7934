use crate::ipc::error::committed;
use crate::ipc::handlers::{parse_params, store_mut};
use crate::ipc::types::{DaemonState, Request};
use crate::store::StudentPatch;
use serde_json::json;

fn handle_student_update(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let patch: StudentPatch = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let commit = store.update_student(&patch);
    committed(&req.id, &commit, json!({ "student": store.state().student }))
}

pub fn try_handle(state: &mut DaemonState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "student.update" => Some(handle_student_update(state, req)),
        _ => None,
    }
}
