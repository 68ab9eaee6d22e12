//! OAuth 2.0 Authorization Code flow with PKCE for Google APIs.
//!
//! # Flow Overview
//!
//! 1. Generate a code verifier and its SHA-256 challenge
//! 2. Bind a loopback listener on `127.0.0.1`
//! 3. Open the user's browser on Google's consent page
//! 4. Google redirects to the listener with an authorization code
//! 5. Exchange the code (with verifier) for access and refresh tokens
//!
//! The `state` parameter is checked on the redirect to reject forged
//! callbacks.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CredentialProvider, RefreshedToken};

use super::config::{GoogleConfig, OAuthCredentials};
use super::tokens::TokenInfo;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The PKCE code verifier length (in bytes, before base64 encoding).
const CODE_VERIFIER_LENGTH: usize = 32;

/// How long to wait for the user to finish consent in the browser.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

const CALLBACK_PATH: &str = "/callback";

/// OAuth client for Google APIs.
///
/// This is the interactive [`CredentialProvider`]: `authorize` needs a browser
/// and a human.
#[derive(Debug)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    port_range: (u16, u16),
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates an OAuth client from the provider configuration.
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            credentials: config.credentials.clone(),
            port_range: config.loopback_port_range,
            http_client,
        })
    }

    /// Runs the interactive consent flow and returns the obtained tokens.
    ///
    /// # Errors
    ///
    /// Fails if no loopback port is free, the user denies consent, the
    /// callback does not arrive in time, or the code exchange fails.
    pub async fn authorize(&self, scopes: &[String]) -> ProviderResult<TokenInfo> {
        let pkce = PkceFlow::new();

        let (listener, port) = Self::bind_loopback_server(self.port_range)?;
        let redirect_uri = format!("http://127.0.0.1:{}{}", port, CALLBACK_PATH);

        let auth_url = pkce.build_auth_url(&self.credentials.client_id, &redirect_uri, scopes);

        info!("starting OAuth flow, opening browser...");
        debug!("authorization URL: {}", auth_url);

        if let Err(e) = open::that(&auth_url) {
            warn!("failed to open browser: {}", e);
            eprintln!("\nPlease open this URL in your browser:\n\n{}\n", auth_url);
        }

        let callback = Self::wait_for_callback(listener)?;

        if callback.state != pkce.state {
            return Err(ProviderError::authentication(
                "OAuth state mismatch - possible CSRF attack",
            ));
        }

        info!("received authorization code, exchanging for tokens...");

        let response = self
            .post_token_request(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", callback.code.as_str()),
                ("code_verifier", pkce.verifier.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .await?;

        info!("successfully obtained tokens");
        Ok(TokenInfo::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            scopes.to_vec(),
        ))
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<RefreshedToken> {
        let response = self
            .post_token_request(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        info!("successfully refreshed access token");
        Ok(RefreshedToken {
            access_token: response.access_token,
            expires_in: response.expires_in,
        })
    }

    /// Posts a form to the token endpoint and decodes the response.
    async fn post_token_request(&self, params: &[(&str, &str)]) -> ProviderResult<TokenResponse> {
        let grant = params
            .iter()
            .find(|(k, _)| *k == "grant_type")
            .map(|(_, v)| *v)
            .unwrap_or("unknown");

        let response = self
            .http_client
            .post(GOOGLE_TOKEN_URL)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("{} request failed: {}", grant, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "{} exchange failed ({}): {}",
                grant, status, body
            )));
        }

        TokenResponse::parse(&body)
    }

    /// Binds the first free port in `port_range` on the loopback interface,
    /// then any free port the OS hands out.
    fn bind_loopback_server(port_range: (u16, u16)) -> ProviderResult<(TcpListener, u16)> {
        for port in port_range.0..=port_range.1 {
            if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
                debug!("bound loopback server on port {}", port);
                return Ok((listener, port));
            }
        }

        debug!(
            "ports {}-{} busy, asking the OS for one",
            port_range.0, port_range.1
        );
        let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|e| {
            ProviderError::configuration(format!("failed to bind loopback server: {}", e))
                .with_source(e)
        })?;
        let port = listener
            .local_addr()
            .map_err(|e| {
                ProviderError::internal(format!("failed to read loopback address: {}", e))
                    .with_source(e)
            })?
            .port();
        Ok((listener, port))
    }

    /// Waits for the OAuth redirect on `listener`.
    fn wait_for_callback(listener: TcpListener) -> ProviderResult<CallbackParams> {
        let (tx, rx) = mpsc::channel();

        // Accept on a helper thread so the wait can time out.
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        if let Some(result) = Self::handle_callback(stream) {
                            let _ = tx.send(result);
                            return;
                        }
                    }
                    Err(e) => error!("failed to accept connection: {}", e),
                }
            }
        });

        match rx.recv_timeout(CALLBACK_TIMEOUT) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(ProviderError::authentication("OAuth callback timeout"))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(ProviderError::internal("callback channel disconnected"))
            }
        }
    }

    /// Answers one HTTP request; returns `None` for requests that are not the
    /// redirect, such as a favicon request.
    fn handle_callback(mut stream: TcpStream) -> Option<ProviderResult<CallbackParams>> {
        let mut request_line = String::new();
        BufReader::new(&stream).read_line(&mut request_line).ok()?;

        let result = parse_callback_request(&request_line)?;

        let response = if result.is_ok() {
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n\
            <html><body><h1>Authorization Successful</h1>\
            <p>You can close this window and return to the terminal.</p></body></html>"
        } else {
            "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\n\r\n\
            <html><body><h1>Authorization Failed</h1>\
            <p>You can close this window.</p></body></html>"
        };

        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();

        Some(result)
    }
}

impl CredentialProvider for OAuthClient {
    fn authorize<'a>(&'a self, scopes: &'a [String]) -> BoxFuture<'a, ProviderResult<TokenInfo>> {
        Box::pin(OAuthClient::authorize(self, scopes))
    }

    fn refresh<'a>(
        &'a self,
        refresh_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RefreshedToken>> {
        Box::pin(self.refresh_token(refresh_token))
    }
}

/// Code and state extracted from the OAuth redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CallbackParams {
    code: String,
    state: String,
}

/// Parses `GET /callback?code=...&state=... HTTP/1.1`.
///
/// Returns `None` when the request is not aimed at the callback path.
fn parse_callback_request(request_line: &str) -> Option<ProviderResult<CallbackParams>> {
    let mut parts = request_line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let target = parts.next()?;
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    if path != CALLBACK_PATH {
        return None;
    }

    let mut code = None;
    let mut state = None;
    let mut denied = None;

    for (key, value) in query.split('&').filter_map(|pair| pair.split_once('=')) {
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_default();
        match key {
            "code" => code = Some(value),
            "state" => state = Some(value),
            "error" => denied = Some(value),
            _ => {}
        }
    }

    if let Some(reason) = denied {
        return Some(Err(ProviderError::authentication(format!(
            "authorization denied: {}",
            reason
        ))));
    }

    Some(match code {
        Some(code) => Ok(CallbackParams {
            code,
            state: state.unwrap_or_default(),
        }),
        None => Err(ProviderError::authentication(
            "missing authorization code in callback",
        )),
    })
}

/// PKCE flow state (RFC 7636).
#[derive(Debug)]
pub struct PkceFlow {
    /// High-entropy random string kept secret until the code exchange.
    pub verifier: String,
    /// SHA-256 of the verifier, base64url encoded.
    pub challenge: String,
    /// Random state for CSRF protection.
    pub state: String,
}

impl PkceFlow {
    pub fn new() -> Self {
        let verifier = random_token(CODE_VERIFIER_LENGTH);
        let challenge = Self::compute_challenge(&verifier);
        Self {
            verifier,
            challenge,
            state: random_token(16),
        }
    }

    fn compute_challenge(verifier: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
    }

    /// Builds the Google consent URL, requesting offline access so a refresh
    /// token is issued.
    pub fn build_auth_url(&self, client_id: &str, redirect_uri: &str, scopes: &[String]) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&\
            code_challenge={}&code_challenge_method=S256&state={}&\
            access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes.join(" ")),
            urlencoding::encode(&self.challenge),
            urlencoding::encode(&self.state),
        )
    }
}

impl Default for PkceFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
    URL_SAFE_NO_PAD.encode(&bytes)
}

/// Response from Google's token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn parse(body: &str) -> ProviderResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))
    }
}
