use crate::ipc::error::ok;
use crate::ipc::handlers::store_mut;
use crate::ipc::types::{DaemonState, Request};
use crate::stats::{compute_required_next_score, compute_stats, compute_status};
use crate::summary::{build_summary, interpret_required, margin};
use serde_json::json;

fn handle_stats_get(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let app = store.state();
    let stats = compute_stats(&app.grades);
    let status = compute_status(&stats, &app.settings);
    ok(
        &req.id,
        json!({
            "stats": stats,
            "status": status,
            "margin": margin(&stats, &app.settings),
            "requiredNext": compute_required_next_score(&stats, &app.settings),
            "requiredNextKind": interpret_required(&stats, &app.settings),
        }),
    )
}

fn handle_dashboard_summary(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let store = match store_mut(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "summary": build_summary(store.state()) }))
}

pub fn try_handle(state: &mut DaemonState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.get" => Some(handle_stats_get(state, req)),
        "dashboard.summary" => Some(handle_dashboard_summary(state, req)),
        _ => None,
    }
}
