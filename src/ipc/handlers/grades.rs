use crate::ipc::error::ok;
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use crate::ops;
use crate::store::{Grade, Snapshot};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradeInput {
    #[serde(default)]
    student_id: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    description: String,
    value: f64,
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    ok(&req.id, json!({ "grades": snap.grades }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let input: GradeInput = match helpers::required_input(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let grade = Grade {
        id: Uuid::new_v4().to_string(),
        student_id: input.student_id,
        subject: input.subject,
        description: input.description,
        value: input.value,
    };
    let grades = match ops::create_grade(&snap.grades, grade.clone()) {
        Ok(g) => g,
        Err(e) => return helpers::op_err(&req.id, &e),
    };
    let next = Snapshot { grades, ..snap };
    helpers::commit(state, next);
    ok(&req.id, json!({ "grade": grade }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let id = match helpers::required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let next = Snapshot {
        grades: ops::delete_grade(&snap.grades, &id),
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "deleted": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_list(state, req)),
        "grades.create" => Some(handle_create(state, req)),
        "grades.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
