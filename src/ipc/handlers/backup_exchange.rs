use crate::backup::{self, ImportError};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let out_path = match helpers::required_str(req, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e,
    };
    match backup::export_backup_bundle(&snap, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count,
                "outPath": out_path.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "export_failed", format!("{e:#}"), None),
    }
}

fn handle_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Requires a workspace: the restored snapshot has to land somewhere.
    if let Err(e) = helpers::snapshot(state, req) {
        return e;
    }
    let path = match helpers::required_str(req, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e,
    };
    // Any failure below leaves the current snapshot untouched.
    let summary = match backup::import_backup(&path) {
        Ok(s) => s,
        Err(ImportError::Malformed(e)) => {
            return err(&req.id, "malformed_backup", format!("{e:#}"), None)
        }
        Err(ImportError::Io(e)) => return err(&req.id, "import_failed", format!("{e:#}"), None),
    };

    let restored = summary.snapshot;
    let counts = json!({
        "students": restored.students.len(),
        "teachers": restored.teachers.len(),
        "lessonPlans": restored.lesson_plans.len(),
        "attendances": restored.attendances.len(),
        "grades": restored.grades.len(),
    });
    helpers::commit(state, restored);
    ok(
        &req.id,
        json!({
            "bundleFormatDetected": summary.bundle_format_detected,
            "restored": counts,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_export(state, req)),
        "backup.import" => Some(handle_import(state, req)),
        _ => None,
    }
}
