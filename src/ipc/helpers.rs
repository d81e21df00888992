use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::models::{Fields, Record, User};
use crate::repo::Repository;
use crate::session::SessionService;
use crate::store::KeyValueStore;

pub type HandlerResult = Result<Value, HandlerErr>;

/// Runs `f` against the open store, or fails with `no_workspace`.
pub fn respond<H>(state: &mut AppState, req: &Request, f: H) -> Value
where
    H: FnOnce(&mut dyn KeyValueStore, &Config, &Value) -> HandlerResult,
{
    let Some(store) = state.store.as_deref_mut() else {
        return HandlerErr::no_workspace().response(&req.id);
    };
    match f(store, &state.config, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

/// Like [`respond`], but answers `empty` when no workspace is open.
pub fn respond_list<H>(state: &mut AppState, req: &Request, empty: Value, f: H) -> Value
where
    H: FnOnce(&mut dyn KeyValueStore, &Config, &Value) -> HandlerResult,
{
    if state.store.is_none() {
        return ok(&req.id, empty);
    }
    respond(state, req, f)
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_optional_str(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn get_object(params: &Value, key: &str) -> Result<Map<String, Value>, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_object())
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {} object", key)))
}

pub fn parse_fields<F: DeserializeOwned>(value: Value) -> Result<F, HandlerErr> {
    serde_json::from_value(value).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

pub fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Users on the wire never carry their password.
pub fn user_json(user: &User) -> Value {
    let mut v = to_json(user);
    if let Some(obj) = v.as_object_mut() {
        obj.remove("password");
    }
    v
}

pub fn current_user(
    store: &mut dyn KeyValueStore,
    config: &Config,
) -> Result<Option<User>, HandlerErr> {
    Ok(SessionService::new(store, config.token_ttl).current_user()?)
}

pub fn get_record<F: Fields>(
    store: &mut dyn KeyValueStore,
    params: &Value,
    key: &str,
) -> HandlerResult {
    let id = get_required_str(params, "id")?;
    let record: Option<Record<F>> = Repository::<F>::new(store).get_by_id(&id)?;
    Ok(json!({ key: record }))
}

pub fn create_record<F: Fields>(
    store: &mut dyn KeyValueStore,
    params: &Value,
    key: &str,
) -> HandlerResult {
    let fields: F = parse_fields(Value::Object(get_object(params, key)?))?;
    let record = Repository::<F>::new(store).create(fields)?;
    Ok(json!({ key: record }))
}

pub fn update_record<F: Fields>(
    store: &mut dyn KeyValueStore,
    params: &Value,
    key: &str,
) -> HandlerResult {
    let id = get_required_str(params, "id")?;
    let patch = get_object(params, "patch")?;
    let record = Repository::<F>::new(store).update(&id, &patch)?;
    Ok(json!({ key: record }))
}

pub fn delete_record<F: Fields>(store: &mut dyn KeyValueStore, params: &Value) -> HandlerResult {
    let id = get_required_str(params, "id")?;
    let deleted = Repository::<F>::new(store).delete(&id)?;
    Ok(json!({ "deleted": deleted }))
}
