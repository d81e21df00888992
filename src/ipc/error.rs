use serde_json::json;

use crate::repo::RepoError;
use crate::session::AccessError;
use crate::store::StoreError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

#[derive(Debug)]
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn no_workspace() -> Self {
        Self::new("no_workspace", "select a workspace first")
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<StoreError> for HandlerErr {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "storage failure");
        let details = match &e {
            StoreError::Corrupt { key, .. }
            | StoreError::Encode { key, .. }
            | StoreError::QuotaExceeded { key, .. } => Some(json!({ "key": key })),
            StoreError::Backend(_) => None,
        };
        Self {
            code: "storage_failed",
            message: e.to_string(),
            details,
        }
    }
}

impl From<RepoError> for HandlerErr {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Validation(msg) => {
                tracing::warn!(reason = %msg, "rejected input");
                HandlerErr::bad_params(msg)
            }
            RepoError::Storage(e) => e.into(),
        }
    }
}

impl From<AccessError> for HandlerErr {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::InvalidCredentials => {
                HandlerErr::new("invalid_credentials", e.to_string())
            }
            AccessError::AlreadyExists => HandlerErr::new("already_exists", e.to_string()),
            AccessError::Validation(msg) => HandlerErr::bad_params(msg),
            AccessError::Storage(e) => e.into(),
        }
    }
}
