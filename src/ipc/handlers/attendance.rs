use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use crate::ops;
use crate::store::{AttendanceStatus, Snapshot};
use serde_json::json;

fn parse_status(req: &Request) -> Result<AttendanceStatus, serde_json::Value> {
    let raw = req
        .params
        .get("status")
        .cloned()
        .ok_or_else(|| err(&req.id, "bad_params", "missing status", None))?;
    serde_json::from_value(raw)
        .map_err(|_| err(&req.id, "bad_params", "status must be \"P\" or \"F\"", None))
}

fn handle_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let student_id = match helpers::required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let lesson_plan_id = match helpers::required_str(req, "lessonPlanId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let status = match parse_status(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let attendances = ops::set_attendance(&snap.attendances, &student_id, &lesson_plan_id, status);
    let next = Snapshot {
        attendances,
        ..snap
    };
    helpers::commit(state, next);
    ok(
        &req.id,
        json!({
            "studentId": student_id,
            "lessonPlanId": lesson_plan_id,
            "status": status,
        }),
    )
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let plan_id = req.params.get("planId").and_then(|v| v.as_str());

    match plan_id {
        Some(plan_id) => {
            let rows: Vec<_> = snap
                .attendances
                .iter()
                .filter(|a| a.lesson_plan_id == plan_id)
                .collect();
            let present = rows
                .iter()
                .filter(|a| a.status == AttendanceStatus::Present)
                .count();
            ok(
                &req.id,
                json!({
                    "attendances": rows,
                    "presentCount": present,
                    "absentCount": rows.len() - present,
                }),
            )
        }
        None => ok(&req.id, json!({ "attendances": snap.attendances })),
    }
}

fn handle_consolidated(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let consolidated = calc::compute_consolidated_attendance(&snap.attendances);
    ok(&req.id, json!(consolidated))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.set" => Some(handle_set(state, req)),
        "attendance.list" => Some(handle_list(state, req)),
        "attendance.consolidated" => Some(handle_consolidated(state, req)),
        _ => None,
    }
}
