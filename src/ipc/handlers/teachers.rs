use crate::ipc::error::ok;
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use crate::ops;
use crate::store::{Shift, Snapshot, Teacher, Weekday};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeacherInput {
    name: String,
    subject: String,
    day_of_week: Weekday,
    shift: Shift,
}

impl TeacherInput {
    fn into_teacher(self, id: String) -> Teacher {
        Teacher {
            id,
            name: self.name,
            subject: self.subject,
            day_of_week: self.day_of_week,
            shift: self.shift,
        }
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    ok(&req.id, json!({ "teachers": snap.teachers }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let input: TeacherInput = match helpers::required_input(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let teacher = input.into_teacher(Uuid::new_v4().to_string());
    let teachers = match ops::create_teacher(&snap.teachers, teacher.clone()) {
        Ok(t) => t,
        Err(e) => return helpers::op_err(&req.id, &e),
    };
    let next = Snapshot { teachers, ..snap };
    helpers::commit(state, next);
    ok(&req.id, json!({ "teacher": teacher }))
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
    let input: TeacherInput = match helpers::required_input(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let teacher = input.into_teacher(id);
    let teachers = match ops::update_teacher(&snap.teachers, teacher.clone()) {
        Ok(t) => t,
        Err(e) => return helpers::op_err(&req.id, &e),
    };
    let next = Snapshot { teachers, ..snap };
    helpers::commit(state, next);
    ok(&req.id, json!({ "teacher": teacher }))
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
        teachers: ops::delete_teacher(&snap.teachers, &id),
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "deleted": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.list" => Some(handle_list(state, req)),
        "teachers.create" => Some(handle_create(state, req)),
        "teachers.update" => Some(handle_update(state, req)),
        "teachers.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
