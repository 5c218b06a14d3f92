use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::ops::OpError;
use crate::store::{self, Snapshot};
use serde::de::DeserializeOwned;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Typed view of `params.input`; shape errors (missing fields, values outside
/// the closed enums) come back as `bad_params`.
pub fn required_input<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    let raw = req
        .params
        .get("input")
        .cloned()
        .ok_or_else(|| err(&req.id, "bad_params", "missing params.input", None))?;
    serde_json::from_value(raw)
        .map_err(|e| err(&req.id, "bad_params", format!("invalid input: {}", e), None))
}

pub fn snapshot<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a Snapshot, serde_json::Value> {
    state
        .snapshot
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// Swap in the replacement snapshot and schedule the save. Persistence is
/// fire-and-forget: a failed write is logged and the request still succeeds,
/// leaving memory as the only record until the next successful write.
pub fn commit(state: &mut AppState, next: Snapshot) {
    if let Some(workspace) = state.workspace.as_ref() {
        if let Err(e) = store::save_snapshot(workspace, &next) {
            eprintln!("educontrold: failed to persist snapshot: {:#}", e);
        }
    }
    state.snapshot = Some(next);
}

pub fn op_err(id: &str, e: &OpError) -> serde_json::Value {
    err(id, e.code(), e.message(), e.details())
}
