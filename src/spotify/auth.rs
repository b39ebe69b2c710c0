use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::Mutex;
use url::Url;

use crate::{
    config::{Settings, parse_scopes},
    error::AuthError,
    info,
    management::CredentialStore,
    server::CallbackListener,
    success,
    types::{AccessCredential, TokenResponse},
    utils, warning,
};

/// Opens URLs outside the process, usually in the default browser.
///
/// Opening is best effort: the user can always navigate manually, so an
/// `Err` is only reported, never treated as a failed authorization.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// [`Browser`] backed by the operating system's URL handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        webbrowser::open(url).map_err(|e| e.to_string())
    }
}

/// Drives the authorization code flow and owns the credential cache.
///
/// At most one authorization session runs at a time. A caller arriving while
/// a session is pending waits for it and then reuses the credential it
/// produced, so the callback port is never bound twice.
pub struct Authorizer {
    settings: Settings,
    http: Client,
    store: CredentialStore,
    browser: Arc<dyn Browser>,
    gate: Mutex<()>,
}

impl Authorizer {
    pub fn new(
        settings: Settings,
        http: Client,
        store: CredentialStore,
        browser: Arc<dyn Browser>,
    ) -> Self {
        Self {
            settings,
            http,
            store,
            browser,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Returns the cached credential or runs a new authorization session.
    ///
    /// This function orchestrates the entire authentication process:
    /// 1. Returning the cached credential immediately when one exists
    /// 2. Starting the local callback listener on the registered port
    /// 3. Opening the authorization URL in the user's browser
    /// 4. Waiting (dwell, then bounded by `timeout`) for the redirect
    /// 5. Stopping the listener, on every path
    /// 6. Exchanging the code for a bearer token and caching it
    ///
    /// # Arguments
    ///
    /// * `timeout` - Upper bound for the browser-mediated wait
    ///
    /// # Errors
    ///
    /// - [`AuthError::Timeout`] if no redirect arrived in time
    /// - [`AuthError::Rejected`] if the user denied access, the redirect was
    ///   invalid, or the token endpoint returned no access token
    /// - [`AuthError::Bind`] if the callback port is taken by another process
    ///
    /// # Example
    ///
    /// ```
    /// let credential = authorizer.acquire_credential(Duration::from_secs(20)).await?;
    /// println!("Granted scopes: {:?}", credential.scopes);
    /// ```
    pub async fn acquire_credential(
        &self,
        timeout: Duration,
    ) -> Result<AccessCredential, AuthError> {
        if let Some(credential) = self.store.get().await {
            return Ok(credential);
        }

        let _session = self.gate.lock().await;
        // a session that finished while we waited for the gate
        if let Some(credential) = self.store.get().await {
            return Ok(credential);
        }

        let state = utils::generate_state();
        let auth_url = authorization_url(&self.settings, &state)?;

        let mut listener = CallbackListener::start(self.settings.callback_addr(), state).await?;
        info!(
            "Waiting for Spotify authorization on {}",
            self.settings.redirect_uri()
        );

        if let Err(e) = self.browser.open(auth_url.as_str()) {
            warning!(
                "Failed to open browser ({}). Please navigate to the following URL manually:\n{}",
                e,
                auth_url
            );
        }

        let outcome = listener
            .await_callback(timeout, self.settings.auth_dwell)
            .await;
        listener.stop().await;

        let code = outcome?;
        let credential = exchange_code(&self.http, &self.settings, &code).await?;
        self.store.set(credential.clone()).await;

        success!("Authentication successful.");
        Ok(credential)
    }
}

/// Builds the URL of Spotify's consent page.
///
/// Carries `response_type=code`, the client id, the space-joined scope list,
/// the redirect URI and the anti-forgery `state` value, all query-encoded.
pub fn authorization_url(settings: &Settings, state: &str) -> Result<Url, AuthError> {
    let scope = settings.scopes.join(" ");
    let redirect_uri = settings.redirect_uri();

    let url = Url::parse_with_params(
        &settings.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", settings.client_id.as_str()),
            ("scope", scope.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("state", state),
        ],
    )?;
    Ok(url)
}

/// Exchanges an authorization code for an access token.
///
/// Posts `grant_type=authorization_code`, the code and the redirect URI as a
/// form body, authenticated with the client id and secret as HTTP basic
/// credentials.
///
/// # Returns
///
/// The credential with the scopes the service actually granted (falling back
/// to the requested scopes when the response omits them).
///
/// # Errors
///
/// - [`AuthError::Rejected`] if the response is not JSON or lacks an access token
/// - [`AuthError::Transport`] on connection failures
pub async fn exchange_code(
    client: &Client,
    settings: &Settings,
    code: &str,
) -> Result<AccessCredential, AuthError> {
    let redirect_uri = settings.redirect_uri();

    let res = client
        .post(&settings.token_url)
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    let token: TokenResponse = serde_json::from_str(&body).map_err(|_| {
        AuthError::Rejected(format!(
            "token endpoint answered {} with an unreadable body",
            status
        ))
    })?;

    match token.access_token {
        Some(access_token) if !access_token.is_empty() => {
            let scopes = token
                .scope
                .as_deref()
                .map(parse_scopes)
                .unwrap_or_else(|| settings.scopes.clone());
            Ok(AccessCredential::new(access_token, scopes))
        }
        _ => Err(AuthError::Rejected(
            token
                .error_description
                .or(token.error)
                .unwrap_or_else(|| format!("no access token in response ({})", status)),
        )),
    }
}
