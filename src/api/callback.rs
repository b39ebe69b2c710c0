use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::{Mutex, oneshot};

/// What the browser redirect carried back to the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
}

/// Shared state of the callback route for one authorization session.
pub struct CallbackState {
    expected_state: String,
    completion: Mutex<Option<oneshot::Sender<CallbackOutcome>>>,
}

impl CallbackState {
    pub fn new(expected_state: String, completion: oneshot::Sender<CallbackOutcome>) -> Self {
        Self {
            expected_state,
            completion: Mutex::new(Some(completion)),
        }
    }

    /// `true` until the first valid callback has resolved the session.
    pub async fn is_pending(&self) -> bool {
        self.completion.lock().await.is_some()
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<CallbackState>>,
) -> (StatusCode, Html<&'static str>) {
    let code = params.get("code");
    let error = params.get("error");
    if code.is_none() && error.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        );
    }

    let outcome = if params.get("state") != Some(&shared_state.expected_state) {
        CallbackOutcome::Denied("state mismatch".to_string())
    } else if let Some(error) = error {
        CallbackOutcome::Denied(error.clone())
    } else {
        // checked above: one of code or error is present
        CallbackOutcome::Code(code.cloned().unwrap_or_default())
    };

    let Some(sender) = shared_state.completion.lock().await.take() else {
        return (
            StatusCode::CONFLICT,
            Html("<h4>Authorization already completed.</h4><p>You can close this window.</p>"),
        );
    };

    let accepted = matches!(outcome, CallbackOutcome::Code(_));
    // the session may already have given up waiting
    let _ = sender.send(outcome);

    // the code is exchanged only after this page is served
    if accepted {
        (
            StatusCode::OK,
            Html("<h2>Authorization received.</h2><p>You can close this window.</p>"),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Html("<h4>Authentication failed.</h4><p>Please try again.</p>"),
        )
    }
}
