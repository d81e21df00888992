use crate::config::Config;
use crate::ipc::helpers::{
    get_object, get_optional_str, get_required_str, parse_fields, respond, respond_list,
    HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::models::FeeFields;
use crate::repo::Repository;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

fn fees_list(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let repo = Repository::<FeeFields>::new(store);
    let fees = match get_optional_str(params, "studentId") {
        Some(sid) => repo.by_student(&sid)?,
        None => repo.list_all()?,
    };
    Ok(json!({ "fees": fees }))
}

fn fees_create(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let fields: FeeFields = parse_fields(Value::Object(get_object(params, "fee")?))?;
    let fee = Repository::<FeeFields>::new(store).raise(fields)?;
    Ok(json!({ "fee": fee }))
}

fn fees_mark_paid(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let id = get_required_str(params, "id")?;
    let fee = Repository::<FeeFields>::new(store).mark_paid(&id)?;
    Ok(json!({ "fee": fee }))
}

fn fees_summary(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let student_id = get_optional_str(params, "studentId");
    let summary = Repository::<FeeFields>::new(store).summary(student_id.as_deref())?;
    Ok(json!(summary))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "fees.list" => Some(respond_list(state, req, json!({ "fees": [] }), fees_list)),
        "fees.create" => Some(respond(state, req, fees_create)),
        "fees.markPaid" => Some(respond(state, req, fees_mark_paid)),
        "fees.summary" => Some(respond(state, req, fees_summary)),
        _ => None,
    }
}
