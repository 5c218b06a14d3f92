use crate::ipc::error::ok;
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};
use crate::ops;
use crate::store::{LessonPlan, Shift, Snapshot};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanInput {
    #[serde(default)]
    teacher_id: String,
    date: String,
    shift: Shift,
    #[serde(default)]
    description: String,
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s,
        Err(e) => return e,
    };
    ok(&req.id, json!({ "plans": snap.lesson_plans }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snap = match helpers::snapshot(state, req) {
        Ok(s) => s.clone(),
        Err(e) => return e,
    };
    let input: PlanInput = match helpers::required_input(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let plan = LessonPlan {
        id: Uuid::new_v4().to_string(),
        teacher_id: input.teacher_id,
        date: input.date,
        shift: input.shift,
        description: input.description,
    };
    let lesson_plans = match ops::create_lesson_plan(&snap.lesson_plans, plan.clone()) {
        Ok(p) => p,
        Err(e) => return helpers::op_err(&req.id, &e),
    };
    let next = Snapshot {
        lesson_plans,
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "plan": plan }))
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
    // No cascade: attendance rows referencing this plan stay behind and
    // resolve to "unknown" in downstream views.
    let next = Snapshot {
        lesson_plans: ops::delete_lesson_plan(&snap.lesson_plans, &id),
        ..snap
    };
    helpers::commit(state, next);
    ok(&req.id, json!({ "deleted": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "plans.list" => Some(handle_list(state, req)),
        "plans.create" => Some(handle_create(state, req)),
        "plans.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
