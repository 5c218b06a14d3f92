use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use crate::report;
use serde_json::json;

fn handle_analytics_attendance(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let stats = calc::compute_attendance_stats(&snap.students, &snap.attendances);
    ok(&req.id, json!({ "stats": stats }))
}

fn handle_analytics_at_risk(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let students =
        calc::compute_at_risk_students(&snap.students, &snap.grades, &snap.attendances);
    ok(&req.id, json!({ "students": students }))
}

fn handle_analytics_subject_averages(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let subjects = calc::distinct_subjects(&snap.teachers);
    let students = calc::compute_subject_averages(&snap.students, &snap.grades, &subjects);
    ok(
        &req.id,
        json!({ "subjects": subjects, "students": students }),
    )
}

fn handle_analytics_totals(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let totals = calc::compute_totals(&snap.students, &snap.teachers, &snap.attendances);
    ok(&req.id, json!(totals))
}

fn handle_report_attendance(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let stats = calc::compute_attendance_stats(&snap.students, &snap.attendances);
    ok(&req.id, json!(report::attendance_report(&stats)))
}

fn handle_report_grades(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let subjects = calc::distinct_subjects(&snap.teachers);
    let averages = calc::compute_subject_averages(&snap.students, &snap.grades, &subjects);
    ok(&req.id, json!(report::grades_report(&averages, &subjects)))
}

fn handle_report_teachers(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    ok(&req.id, json!(report::teachers_report(&snap.teachers)))
}

fn handle_report_plans(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!(report::plans_report(&snap.lesson_plans, &snap.teachers)),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.attendance" => Some(handle_analytics_attendance(state, req)),
        "analytics.atRisk" => Some(handle_analytics_at_risk(state, req)),
        "analytics.subjectAverages" => Some(handle_analytics_subject_averages(state, req)),
        "analytics.totals" => Some(handle_analytics_totals(state, req)),
        "reports.attendance" => Some(handle_report_attendance(state, req)),
        "reports.grades" => Some(handle_report_grades(state, req)),
        "reports.teachers" => Some(handle_report_teachers(state, req)),
        "reports.plans" => Some(handle_report_plans(state, req)),
        _ => None,
    }
}
