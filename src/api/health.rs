use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::CallbackState;

/// Reports whether the listener is still waiting for the browser redirect.
pub async fn health(Extension(shared_state): Extension<Arc<CallbackState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "awaiting_callback": shared_state.is_pending().await,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
