use crate::ipc::error::{committed, err, ok};
use crate::ipc::handlers::{parse_params, require_confirm, store_mut};
use crate::ipc::types::{DaemonState, Request};
use crate::store::{AddGradeError, GradeInput};
use serde_json::json;

fn handle_grades_list(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "grades": store.state().grades }))
}

fn handle_grades_add(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let input: GradeInput = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.add_grade(&input) {
        Ok(commit) => committed(&req.id, &commit, json!({ "grade": commit.value })),
        Err(e @ AddGradeError::MissingScore) => {
            err(&req.id, "missing_score", e.to_string(), Some(json!({ "field": "score" })))
        }
    }
}

fn handle_grades_remove(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let Some(grade_id) = req.params.get("gradeId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing gradeId", None);
    };
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let commit = store.remove_grade(grade_id);
    if commit.value == 0 {
        return err(
            &req.id,
            "not_found",
            "grade not found",
            Some(json!({ "gradeId": grade_id })),
        );
    }
    committed(&req.id, &commit, json!({ "removed": commit.value }))
}

fn handle_grades_clear(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    if let Err(resp) = require_confirm(req) {
        return resp;
    }
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let commit = store.clear_grades();
    committed(&req.id, &commit, json!({ "removed": commit.value }))
}

pub fn try_handle(state: &mut DaemonState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_grades_list(state, req)),
        "grades.add" => Some(handle_grades_add(state, req)),
        "grades.remove" => Some(handle_grades_remove(state, req)),
        "grades.clear" => Some(handle_grades_clear(state, req)),
        _ => None,
    }
}
