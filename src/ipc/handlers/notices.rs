use crate::config::Config;
use crate::ipc::helpers::{
    current_user, delete_record, get_object, get_record, parse_fields, respond, respond_list,
    update_record, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{NoticeFields, Role};
use crate::repo::Repository;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

/// Whole collection, or the newest-first feed for `role`.
fn notices_list(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let repo = Repository::<NoticeFields>::new(store);
    let notices = match params.get("role").filter(|v| !v.is_null()) {
        Some(role) => {
            let role: Role = parse_fields(role.clone())?;
            repo.feed_for(role)?
        }
        None => repo.list_all()?,
    };
    Ok(json!({ "notices": notices }))
}

/// Author fields default to the signed-in user.
fn notices_create(
    store: &mut dyn KeyValueStore,
    config: &Config,
    params: &Value,
) -> HandlerResult {
    let mut fields: NoticeFields = parse_fields(Value::Object(get_object(params, "notice")?))?;
    if fields.created_by.is_none() {
        if let Some(user) = current_user(store, config)? {
            fields.created_by = Some(user.id);
            fields.created_by_name = fields.created_by_name.or(Some(user.fields.name));
        }
    }
    let notice = Repository::<NoticeFields>::new(store).create(fields)?;
    Ok(json!({ "notice": notice }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notices.list" => Some(respond_list(
            state,
            req,
            json!({ "notices": [] }),
            notices_list,
        )),
        "notices.get" => Some(respond(state, req, |store, _, params| {
            get_record::<NoticeFields>(store, params, "notice")
        })),
        "notices.create" => Some(respond(state, req, notices_create)),
        "notices.update" => Some(respond(state, req, |store, _, params| {
            update_record::<NoticeFields>(store, params, "notice")
        })),
        "notices.delete" => Some(respond(state, req, |store, _, params| {
            delete_record::<NoticeFields>(store, params)
        })),
        _ => None,
    }
}
