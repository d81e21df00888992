mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use handlers::core::{open_memory_store, open_workspace};
pub use router::handle_request;
pub use types::{AppState, Request};
