use crate::config::Config;
use crate::ipc::helpers::{
    current_user, get_optional_str, get_required_str, parse_fields, respond, respond_list,
    HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{canonical_day, AttendanceFields, AttendanceStatus};
use crate::repo::Repository;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

fn attendance_list(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let student_id = get_optional_str(params, "studentId");
    let date = get_optional_str(params, "date").map(|d| canonical_day(&d, "date").unwrap_or(d));
    let repo = Repository::<AttendanceFields>::new(store);
    let records = match (student_id.as_deref(), date.as_deref()) {
        (Some(s), Some(d)) => repo.find(|a| a.fields.student_id == s && a.fields.date == d)?,
        (Some(s), None) => repo.by_student(s)?,
        (None, Some(d)) => repo.by_date(d)?,
        (None, None) => repo.list_all()?,
    };
    Ok(json!({ "attendance": records }))
}

fn attendance_mark(
    store: &mut dyn KeyValueStore,
    config: &Config,
    params: &Value,
) -> HandlerResult {
    let student_id = get_required_str(params, "studentId")?;
    let date = get_required_str(params, "date")?;
    let status: AttendanceStatus =
        parse_fields(params.get("status").cloned().unwrap_or(Value::Null))?;
    let marked_by = match get_optional_str(params, "markedBy") {
        Some(id) => Some(id),
        None => current_user(store, config)?.map(|u| u.id),
    };

    let record = Repository::<AttendanceFields>::new(store).mark(AttendanceFields {
        student_id,
        date: date.trim().to_string(),
        status,
        marked_by,
    })?;
    Ok(json!({ "record": record }))
}

fn attendance_summary(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let student_id = get_required_str(params, "studentId")?;
    let summary = Repository::<AttendanceFields>::new(store).summary_for(&student_id)?;
    Ok(json!(summary))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.list" => Some(respond_list(
            state,
            req,
            json!({ "attendance": [] }),
            attendance_list,
        )),
        "attendance.mark" => Some(respond(state, req, attendance_mark)),
        "attendance.summary" => Some(respond(state, req, attendance_summary)),
        _ => None,
    }
}
