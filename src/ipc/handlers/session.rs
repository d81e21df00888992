use crate::config::Config;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_str, parse_fields, respond, user_json, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::models::UserFields;
use crate::session::{Session, SessionService};
use crate::store::KeyValueStore;
use serde_json::{json, Value};

fn session_json(session: &Session) -> Value {
    json!({
        "user": user_json(&session.user),
        "token": session.token,
    })
}

fn session_login(store: &mut dyn KeyValueStore, config: &Config, params: &Value) -> HandlerResult {
    let email = get_required_str(params, "email")?;
    let password = get_required_str(params, "password")?;
    let session = SessionService::new(store, config.token_ttl).authenticate(&email, &password)?;
    Ok(session_json(&session))
}

fn session_register(
    store: &mut dyn KeyValueStore,
    config: &Config,
    params: &Value,
) -> HandlerResult {
    if !params.is_object() {
        return Err(HandlerErr::bad_params("params must be a user object"));
    }
    let fields: UserFields = parse_fields(params.clone())?;
    let session = SessionService::new(store, config.token_ttl).register(fields)?;
    Ok(session_json(&session))
}

fn session_current(store: &mut dyn KeyValueStore, config: &Config, _: &Value) -> HandlerResult {
    let user = SessionService::new(store, config.token_ttl).current_user()?;
    Ok(json!({ "user": user.as_ref().map(user_json) }))
}

fn session_logout(store: &mut dyn KeyValueStore, config: &Config, _: &Value) -> HandlerResult {
    SessionService::new(store, config.token_ttl).end_session()?;
    Ok(json!({}))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(respond(state, req, session_login)),
        "session.register" => Some(respond(state, req, session_register)),
        "session.current" => Some(respond(state, req, session_current)),
        "session.logout" => Some(respond(state, req, session_logout)),
        _ => None,
    }
}
