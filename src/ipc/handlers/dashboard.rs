use crate::config::Config;
use crate::ipc::helpers::{respond, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::models::{ExamFields, FeeFields, NoticeFields, StudentFields};
use crate::repo::Repository;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

fn dashboard_stats(store: &mut dyn KeyValueStore, _: &Config, _: &Value) -> HandlerResult {
    let students = Repository::<StudentFields>::new(&mut *store).list_all()?.len();
    let notices = Repository::<NoticeFields>::new(&mut *store).list_all()?.len();
    let exams = Repository::<ExamFields>::new(&mut *store).list_all()?.len();
    let fees = Repository::<FeeFields>::new(store).summary(None)?;
    Ok(json!({
        "students": students,
        "notices": notices,
        "exams": exams,
        "pendingFees": fees.pending_count,
        "paidFees": fees.paid_count,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.stats" => Some(respond(state, req, dashboard_stats)),
        _ => None,
    }
}
