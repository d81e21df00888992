use crate::config::Config;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    create_record, current_user, delete_record, get_optional_str, get_record, parse_fields,
    respond, respond_list, update_record, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{Role, StudentFields};
use crate::repo::Repository;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

fn students_list(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let repo = Repository::<StudentFields>::new(store);
    let students = match get_optional_str(params, "class") {
        Some(class) => repo.by_class(&class)?,
        None => repo.list_all()?,
    };
    Ok(json!({ "students": students }))
}

/// The student linked to an explicit `email`/`role` pair, or to the
/// signed-in user when neither is given.
fn students_for_user(
    store: &mut dyn KeyValueStore,
    config: &Config,
    params: &Value,
) -> HandlerResult {
    let explicit = match (params.get("email"), params.get("role")) {
        (Some(email), Some(role)) => {
            let email = email
                .as_str()
                .ok_or_else(|| HandlerErr::bad_params("email must be a string"))?
                .to_string();
            let role: Role = parse_fields(role.clone())?;
            Some((email, role))
        }
        (None, None) => None,
        _ => return Err(HandlerErr::bad_params("email and role go together")),
    };
    let student = match explicit {
        Some((email, role)) => Repository::<StudentFields>::new(store).linked_to(&email, role)?,
        None => match current_user(store, config)? {
            Some(user) => Repository::<StudentFields>::new(store).linked_to_user(&user)?,
            None => None,
        },
    };
    Ok(json!({ "student": student }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(respond_list(
            state,
            req,
            json!({ "students": [] }),
            students_list,
        )),
        "students.get" => Some(respond(state, req, |store, _, params| {
            get_record::<StudentFields>(store, params, "student")
        })),
        "students.forUser" => Some(respond(state, req, students_for_user)),
        "students.create" => Some(respond(state, req, |store, _, params| {
            create_record::<StudentFields>(store, params, "student")
        })),
        "students.update" => Some(respond(state, req, |store, _, params| {
            update_record::<StudentFields>(store, params, "student")
        })),
        "students.delete" => Some(respond(state, req, |store, _, params| {
            delete_record::<StudentFields>(store, params)
        })),
        _ => None,
    }
}
