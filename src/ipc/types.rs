use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Config;
use crate::store::KeyValueStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<Box<dyn KeyValueStore>>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            workspace: None,
            store: None,
            config,
        }
    }
}
