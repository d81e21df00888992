use crate::ipc::helpers::{
    create_record, delete_record, get_record, respond, respond_list, update_record,
};
use crate::ipc::types::{AppState, Request};
use crate::models::ExamFields;
use crate::repo::Repository;
use serde_json::json;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exams.list" => Some(respond_list(state, req, json!({ "exams": [] }), |store, _, _| {
            let exams = Repository::<ExamFields>::new(store).list_all()?;
            Ok(json!({ "exams": exams }))
        })),
        "exams.get" => Some(respond(state, req, |store, _, params| {
            get_record::<ExamFields>(store, params, "exam")
        })),
        "exams.create" => Some(respond(state, req, |store, _, params| {
            create_record::<ExamFields>(store, params, "exam")
        })),
        "exams.update" => Some(respond(state, req, |store, _, params| {
            update_record::<ExamFields>(store, params, "exam")
        })),
        "exams.delete" => Some(respond(state, req, |store, _, params| {
            delete_record::<ExamFields>(store, params)
        })),
        _ => None,
    }
}
