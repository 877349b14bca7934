use crate::store::Commit;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Success response for a mutation. A failed write is not an error: the
/// result carries `persisted: false` and the reason.
pub fn committed<T>(id: &str, commit: &Commit<T>, mut result: serde_json::Value) -> serde_json::Value {
    result["persisted"] = json!(commit.persisted());
    if let Some(e) = &commit.persist_error {
        result["persistError"] = json!(e.to_string());
    }
    ok(id, result)
}
