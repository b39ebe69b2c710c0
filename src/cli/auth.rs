use crate::{session::Session, success, tools, utils, warning};

/// Runs the authorization flow and reports the outcome.
///
/// Returns `true` when a credential is available afterwards.
pub async fn auth(session: &Session) -> bool {
    if session.credentials().is_authenticated().await {
        return true;
    }

    let pb = utils::spinner("Waiting for Spotify authorization in your browser...");
    let result = tools::authenticate(session).await;
    pb.finish_and_clear();

    if result.success {
        success!("Authenticated with Spotify.");
        true
    } else {
        warning!(
            "Authentication failed: {}",
            result.error.unwrap_or_default()
        );
        false
    }
}
