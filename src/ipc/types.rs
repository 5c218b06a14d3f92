use crate::store::Snapshot;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Daemon state: the selected workspace and the current snapshot. Both are
/// set together by `workspace.select`; the snapshot is only ever replaced
/// wholesale, never mutated in place.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub snapshot: Option<Snapshot>,
}
