use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::oneshot,
    task::JoinHandle,
    time::{Instant, sleep, timeout, timeout_at},
};

use crate::{
    api::{self, CallbackOutcome, CallbackState},
    error::AuthError,
    warning,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Ephemeral local HTTP server receiving the OAuth redirect.
///
/// The listener owns its socket for the lifetime of one authorization
/// session. [`CallbackListener::stop`] shuts the server down and waits for the
/// port to be released; dropping the handle without calling `stop` still
/// triggers the shutdown, so the port is freed on every exit path.
pub struct CallbackListener {
    addr: SocketAddr,
    outcome: oneshot::Receiver<CallbackOutcome>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CallbackListener {
    /// Binds `addr` and starts serving `/callback` and `/health`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Fixed loopback address matching the registered redirect URI
    /// * `expected_state` - The `state` value sent with the authorization URL;
    ///   callbacks carrying a different value are rejected
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Bind`] if the port is already taken.
    pub async fn start(addr: SocketAddr, expected_state: String) -> Result<Self, AuthError> {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let state = Arc::new(CallbackState::new(expected_state, outcome_tx));

        let app = Router::new()
            .route("/health", get(api::health))
            .route("/callback", get(api::callback))
            .layer(Extension(state));

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AuthError::Bind { addr, source })?;
        let addr = listener.local_addr().unwrap_or(addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                warning!("Callback listener stopped with error: {}", e);
            }
        });

        Ok(Self {
            addr,
            outcome: outcome_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits for the browser redirect.
    ///
    /// Sleeps for `dwell` first (capped at `timeout`) to give the user time to
    /// act, then races the completion signal against the overall deadline.
    /// A callback that already arrived during the dwell always wins.
    ///
    /// # Returns
    ///
    /// - `Ok(code)` - the authorization code from the redirect
    /// - `Err(AuthError::Rejected)` - the redirect carried an error or a bad `state`
    /// - `Err(AuthError::Timeout)` - nothing arrived before the deadline
    pub async fn await_callback(
        &mut self,
        timeout: Duration,
        dwell: Duration,
    ) -> Result<String, AuthError> {
        let deadline = Instant::now() + timeout;
        sleep(dwell.min(timeout)).await;

        match timeout_at(deadline, &mut self.outcome).await {
            Ok(Ok(CallbackOutcome::Code(code))) => Ok(code),
            Ok(Ok(CallbackOutcome::Denied(reason))) => Err(AuthError::Rejected(reason)),
            Ok(Err(_)) => Err(AuthError::Rejected(
                "callback listener closed unexpectedly".to_string(),
            )),
            Err(_) => Err(AuthError::Timeout),
        }
    }

    /// Shuts the server down and waits until the socket is released.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(mut task) = self.task.take() {
            if timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
                // lingering browser connection; drop the server outright
                task.abort();
                let _ = task.await;
            }
        }
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn start_on_free_port(state: &str) -> CallbackListener {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        CallbackListener::start(addr, state.to_string())
            .await
            .expect("listener starts")
    }

    fn callback_url(listener: &CallbackListener, query: &str) -> String {
        format!("http://{}/callback?{}", listener.local_addr(), query)
    }

    #[tokio::test]
    async fn resolves_with_code_when_state_matches() {
        let mut listener = start_on_free_port("abc").await;

        let response = reqwest::get(callback_url(&listener, "code=the-code&state=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let page = response.text().await.unwrap();
        assert!(page.contains("Authorization received"));
        assert!(!page.contains("successful"));

        let code = listener
            .await_callback(Duration::from_secs(2), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(code, "the-code");
        listener.stop().await;
    }

    #[tokio::test]
    async fn error_query_rejects_the_session() {
        let mut listener = start_on_free_port("abc").await;

        let response = reqwest::get(callback_url(&listener, "error=access_denied&state=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let result = listener
            .await_callback(Duration::from_secs(2), Duration::ZERO)
            .await;
        assert!(matches!(result, Err(AuthError::Rejected(reason)) if reason == "access_denied"));
        listener.stop().await;
    }

    #[tokio::test]
    async fn state_mismatch_rejects_the_session() {
        let mut listener = start_on_free_port("abc").await;

        reqwest::get(callback_url(&listener, "code=the-code&state=forged"))
            .await
            .unwrap();

        let result = listener
            .await_callback(Duration::from_secs(2), Duration::ZERO)
            .await;
        assert!(matches!(result, Err(AuthError::Rejected(reason)) if reason == "state mismatch"));
        listener.stop().await;
    }

    #[tokio::test]
    async fn only_the_first_callback_counts() {
        let mut listener = start_on_free_port("abc").await;

        reqwest::get(callback_url(&listener, "code=first&state=abc"))
            .await
            .unwrap();
        let second = reqwest::get(callback_url(&listener, "code=second&state=abc"))
            .await
            .unwrap();
        assert_eq!(second.status(), 409);

        let code = listener
            .await_callback(Duration::from_secs(2), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(code, "first");
        listener.stop().await;
    }

    #[tokio::test]
    async fn request_without_code_does_not_resolve() {
        let mut listener = start_on_free_port("abc").await;

        let response = reqwest::get(callback_url(&listener, "state=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let result = listener
            .await_callback(Duration::from_millis(150), Duration::ZERO)
            .await;
        assert!(matches!(result, Err(AuthError::Timeout)));
        listener.stop().await;
    }

    #[tokio::test]
    async fn times_out_no_earlier_than_the_deadline() {
        let mut listener = start_on_free_port("abc").await;
        let started = Instant::now();

        let result = listener
            .await_callback(Duration::from_millis(200), Duration::from_millis(50))
            .await;

        assert!(matches!(result, Err(AuthError::Timeout)));
        assert!(started.elapsed() >= Duration::from_millis(200));
        listener.stop().await;
    }

    #[tokio::test]
    async fn callback_during_dwell_is_not_lost() {
        let mut listener = start_on_free_port("abc").await;
        reqwest::get(callback_url(&listener, "code=early&state=abc"))
            .await
            .unwrap();

        let code = listener
            .await_callback(Duration::from_millis(100), Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(code, "early");
        listener.stop().await;
    }

    #[tokio::test]
    async fn health_reports_pending_callback() {
        let listener = start_on_free_port("abc").await;
        let health = format!("http://{}/health", listener.local_addr());

        let body: serde_json::Value = reqwest::get(&health).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["awaiting_callback"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

        reqwest::get(format!(
            "http://{}/callback?code=c&state=abc",
            listener.local_addr()
        ))
        .await
        .unwrap();
        let body: serde_json::Value = reqwest::get(&health).await.unwrap().json().await.unwrap();
        assert_eq!(body["awaiting_callback"], false);
        listener.stop().await;
    }

    #[tokio::test]
    async fn port_is_released_after_stop() {
        let listener = start_on_free_port("abc").await;
        let addr = listener.local_addr();
        listener.stop().await;

        let rebound = CallbackListener::start(addr, "again".to_string())
            .await
            .expect("port is free again");
        rebound.stop().await;
    }

    #[tokio::test]
    async fn second_listener_on_same_port_fails_to_bind() {
        let listener = start_on_free_port("abc").await;

        let result = CallbackListener::start(listener.local_addr(), "other".to_string()).await;
        assert!(matches!(result, Err(AuthError::Bind { .. })));
        listener.stop().await;
    }
}
