use std::time::Duration;

use serde_json::json;

use crate::{
    error::AuthError,
    session::Session,
    tools::ToolResult,
    types::AccessCredential,
};

/// Room for the token exchange after a callback that arrived at the deadline.
const EXCHANGE_GRACE: Duration = Duration::from_secs(5);

/// Authenticates the user, reusing the cached credential when present.
///
/// The browser-mediated wait is bounded by the configured
/// `auth_timeout`; running out of time yields
/// `{"success": false, "error": "authentication timed out"}`.
pub async fn authenticate(session: &Session) -> ToolResult {
    match ensure_credential(session).await {
        Ok(credential) => ToolResult::ok(json!({ "scopes": credential.scopes })),
        Err(e) => ToolResult::failure("authenticate", e),
    }
}

pub(crate) async fn ensure_credential(session: &Session) -> Result<AccessCredential, AuthError> {
    let timeout = session.settings().auth_timeout;
    match tokio::time::timeout(
        timeout + EXCHANGE_GRACE,
        session.authorizer().acquire_credential(timeout),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(AuthError::Timeout),
    }
}
