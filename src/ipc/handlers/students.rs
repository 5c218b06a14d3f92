use crate::ipc::error::ok;
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use crate::ops;
use crate::store::{SchoolingLevel, Snapshot, Student};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentInput {
    name: String,
    #[serde(default)]
    cpf: String,
    #[serde(default)]
    dob: String,
    schooling: SchoolingLevel,
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    ok(&req.id, json!({ "students": snap.students }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let input: StudentInput = match helpers::required_input(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student = Student {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        cpf: input.cpf,
        dob: input.dob,
        schooling: input.schooling,
    };
    let next = Snapshot {
        students: ops::create_student(&snap.students, student.clone()),
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "student": student }))
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let id = match helpers::required_str(req, "id") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let input: StudentInput = match helpers::required_input(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student = Student {
        id,
        name: input.name,
        cpf: input.cpf,
        dob: input.dob,
        schooling: input.schooling,
    };
    let next = Snapshot {
        students: ops::update_student(&snap.students, student.clone()),
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "student": student }))
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
        students: ops::delete_student(&snap.students, &id),
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "deleted": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.update" => Some(handle_update(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
