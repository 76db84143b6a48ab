//! HTTP gateway to the Momentum server.
//!
//! [`HttpGateway`] implements both server-side collaborators of the wizard:
//!
//! - uniqueness checks: `GET {base}{endpoint}?email=…` answering `{"exists": bool}`
//! - submissions: form-encoded `POST {base}{endpoint}` with the `X-CSRFToken` header
//!
//! The gateway keeps a cookie jar so the `csrftoken` cookie set by the server
//! (see [`HttpGateway::prime_session`]) is picked up at submission time.

pub mod csrf;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use serde::Deserialize;

use momentum_wizard::{
    CheckKind, RemoteCheckResult, SubmissionResult, TransportError, UniquenessChecker,
    WizardSubmitter,
};

use crate::config::CliConfig;
use crate::error::{CliResult, ConfigError};

/// Cookie holding the CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the server reads the CSRF token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Submission reply as sent by the server.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, FieldErrors>>,
}

/// A field's errors: a single message or a list of messages.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldErrors {
    One(String),
    Many(Vec<String>),
}

impl FieldErrors {
    fn first(self) -> Option<String> {
        match self {
            FieldErrors::One(message) => Some(message),
            FieldErrors::Many(messages) => messages.into_iter().next(),
        }
    }
}

impl SubmitResponse {
    fn into_result(self, status_ok: bool) -> SubmissionResult {
        let field_errors = self
            .errors
            .map(|errors| {
                errors
                    .into_iter()
                    .filter_map(|(field, messages)| messages.first().map(|m| (field, m)))
                    .collect::<BTreeMap<_, _>>()
            })
            .filter(|errors| !errors.is_empty());

        SubmissionResult {
            success: self.success && status_ok,
            message: self.message.or(self.error).unwrap_or_default(),
            field_errors,
        }
    }
}

/// reqwest-backed checker and submitter.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    jar: Arc<Jar>,
    form_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &CliConfig) -> CliResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| ConfigError::InvalidBaseUrl(config.base_url.clone()))?;

        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            jar,
            form_token: config.csrf_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cookies shared by every request of this gateway.
    pub fn cookie_jar(&self) -> &Jar {
        &self.jar
    }

    /// GET `path` so the server can set its session and CSRF cookies.
    pub async fn prime_session(&self, path: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        log::debug!("Session primed from {} ({})", path, status);
        Ok(())
    }

    /// Current CSRF token: the `csrftoken` cookie, else the configured token.
    ///
    /// Read fresh on every call; the cookie may rotate between submissions.
    pub fn csrf_token(&self) -> Option<String> {
        self.cookie_token().or_else(|| self.form_token.clone())
    }

    fn cookie_token(&self) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        let header = self.jar.cookies(&url)?;
        csrf::cookie_value(header.to_str().ok()?, CSRF_COOKIE)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait(?Send)]
impl UniquenessChecker for HttpGateway {
    async fn check(
        &self,
        kind: CheckKind,
        endpoint: &str,
        value: &str,
    ) -> Result<RemoteCheckResult, TransportError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&[(kind.query_param(), value)])
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} check returned {}", kind, status);
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<RemoteCheckResult>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl WizardSubmitter for HttpGateway {
    async fn submit(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<SubmissionResult, TransportError> {
        let mut request = self
            .client
            .post(self.url(endpoint))
            .form(fields)
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1);

        match self.csrf_token() {
            Some(token) => request = request.header(CSRF_HEADER, token),
            None => log::warn!("No CSRF token available for {}", endpoint),
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;
        log::debug!("Submission to {} answered {}", endpoint, status);

        match serde_json::from_str::<SubmitResponse>(&body) {
            Ok(reply) => Ok(reply.into_result(status.is_success())),
            Err(e) if status.is_success() => Err(TransportError::Decode(e.to_string())),
            Err(_) => Err(TransportError::Status(status.as_u16())),
        }
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    TransportError::Request(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn build_gateway(server: &ServerGuard, form_token: Option<&str>) -> HttpGateway {
        let config = CliConfig {
            base_url: server.url(),
            csrf_token: form_token.map(str::to_string),
            ..CliConfig::default()
        };
        HttpGateway::new(&config).unwrap()
    }

    fn fields() -> Vec<(String, String)> {
        vec![
            ("email".to_string(), "ana@momentum.io".to_string()),
            ("username".to_string(), "areyes".to_string()),
        ]
    }

    #[tokio::test]
    async fn test_check_encodes_query_and_decodes_exists() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/core/check_email/".to_string()))
            .match_query(Matcher::UrlEncoded(
                "email".to_string(),
                "ana+test@momentum.io".to_string(),
            ))
            .match_header("x-requested-with", "XMLHttpRequest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"exists": true}"#)
            .create_async()
            .await;

        let gateway = build_gateway(&server, None);
        let result = gateway
            .check(CheckKind::Email, "/core/check_email/", "ana+test@momentum.io")
            .await
            .unwrap();

        assert!(result.exists);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_non_success_status_is_transport_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/core/check_username/".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let gateway = build_gateway(&server, None);
        let err = gateway
            .check(CheckKind::Username, "/core/check_username/", "areyes")
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Status(500));
    }

    #[tokio::test]
    async fn test_check_undecodable_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/core/check_username/".to_string()))
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let gateway = build_gateway(&server, None);
        let err = gateway
            .check(CheckKind::Username, "/core/check_username/", "areyes")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_submit_sends_form_with_cookie_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/core/registration/")
            .match_header("x-csrftoken", "abc123")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("email".to_string(), "ana@momentum.io".to_string()),
                Matcher::UrlEncoded("username".to_string(), "areyes".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "message": "Registration successful!"}"#)
            .create_async()
            .await;

        let gateway = build_gateway(&server, Some("form-token"));
        let url = Url::parse(&server.url()).unwrap();
        gateway
            .cookie_jar()
            .add_cookie_str("csrftoken=abc123; Path=/", &url);

        let result = gateway.submit("/core/registration/", &fields()).await.unwrap();
        assert_eq!(result, SubmissionResult::accepted("Registration successful!"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_configured_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/core/admin/create-admin/")
            .match_header("x-csrftoken", "form-token")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let gateway = build_gateway(&server, Some("form-token"));
        let result = gateway
            .submit("/core/admin/create-admin/", &fields())
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.message.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_decodes_field_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/core/registration/")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "success": false,
                    "error": "Invalid data",
                    "errors": {
                        "username": ["A user with that username already exists.", "Too common."],
                        "email": "Enter a valid email address.",
                        "position": []
                    }
                }"#,
            )
            .create_async()
            .await;

        let gateway = build_gateway(&server, None);
        let result = gateway.submit("/core/registration/", &fields()).await.unwrap();

        assert_eq!(
            result,
            SubmissionResult::rejected("Invalid data")
                .with_field_error("email", "Enter a valid email address.")
                .with_field_error("username", "A user with that username already exists.")
        );
    }

    #[tokio::test]
    async fn test_submit_unparsable_error_page_is_transport_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/core/registration/")
            .with_status(502)
            .with_body("Bad gateway")
            .create_async()
            .await;

        let gateway = build_gateway(&server, None);
        let err = gateway
            .submit("/core/registration/", &fields())
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Status(502));
    }

    #[tokio::test]
    async fn test_prime_session_collects_csrf_cookie() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_header("set-cookie", "csrftoken=fromserver; Path=/")
            .create_async()
            .await;

        let gateway = build_gateway(&server, Some("form-token"));
        assert_eq!(gateway.csrf_token().as_deref(), Some("form-token"));

        gateway.prime_session("/").await.unwrap();
        assert_eq!(gateway.csrf_token().as_deref(), Some("fromserver"));
    }
}
