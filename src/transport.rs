use crate::client::{create_http_client, Config};
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

/// Build a full endpoint URL from a service base URL, a path and an
/// optional raw query string.
pub(crate) fn endpoint(base: &str, path: &str, query: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", base, path))?;
    url.set_query(query);
    Ok(url)
}

/// Credential scope used to sign a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Application key/secret pair
    App,
    /// Group key/secret pair (group push)
    Group,
}

/// Application and optional group credentials for Basic authentication
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub app_key: String,
    pub master_secret: String,
    pub group_key: String,
    pub group_master_secret: String,
}

impl Credentials {
    /// Create credentials from an application key/secret pair
    pub fn new(app_key: &str, master_secret: &str) -> Self {
        Credentials {
            app_key: app_key.to_string(),
            master_secret: master_secret.to_string(),
            ..Credentials::default()
        }
    }

    /// Attach a group key/secret pair for group-push requests
    pub fn with_group(mut self, group_key: &str, group_master_secret: &str) -> Self {
        self.group_key = group_key.to_string();
        self.group_master_secret = group_master_secret.to_string();
        self
    }

    /// Build the Basic-Authorization header value for the given scope.
    ///
    /// Group requests authenticate as `group-{key}:{secret}`.
    pub fn authorization(&self, auth: Auth) -> String {
        let pair = match auth {
            Auth::App => format!("{}:{}", self.app_key, self.master_secret),
            Auth::Group => format!("group-{}:{}", self.group_key, self.group_master_secret),
        };
        format!("Basic {}", STANDARD.encode(pair.as_bytes()))
    }
}

/// A fully buffered HTTP response from a JPush endpoint
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for the status code
    pub status_text: String,
    /// Raw response body
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the remote accepted the request (strictly HTTP 200)
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Response body as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Error description: the body text when non-empty, else the status line
    pub fn error_message(&self) -> String {
        let text = self.text();
        if text.trim().is_empty() {
            format!("{} {}", self.status, self.status_text)
        } else {
            text
        }
    }

    /// Fail with a status error unless the response is HTTP 200
    pub fn ensure_ok(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::status(self.status, self.error_message()))
        }
    }

    /// Decode the body into the target type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decode the body as an untyped JSON object
    pub fn into_map(self) -> Result<Map<String, Value>> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Authenticated HTTP transport shared by all resource clients.
///
/// Each call is one synchronous round trip; there is no retry and no state
/// beyond the read-only credentials, so a transport can be cloned freely and
/// used from multiple threads.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    credentials: Credentials,
    debug: bool,
}

impl Transport {
    /// Create a transport from credentials and client configuration
    pub fn new(credentials: Credentials, config: &Config) -> Self {
        Transport {
            client: create_http_client(config),
            credentials,
            debug: config.debug,
        }
    }

    /// User-Agent header sent with every request
    pub fn user_agent() -> String {
        format!(
            "({}) jpush-rs/{}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION")
        )
    }

    /// Execute one request against a JPush endpoint and buffer the response.
    ///
    /// Sets the Basic-Authorization header for the selected credential scope
    /// and `Content-Type: application/json` when a body is present. Any HTTP
    /// status comes back as an [`ApiResponse`]; only connection or read
    /// failures are errors at this layer.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        auth: Auth,
    ) -> Result<ApiResponse> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Authorization", self.credentials.authorization(auth))
            .header("User-Agent", Self::user_agent());

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        let start = std::time::Instant::now();
        let response = request.send()?;
        let status = response.status();
        let body = response.bytes()?;

        if self.debug {
            eprintln!(
                "[jpush] {} {} => {:?} (status: {})",
                method,
                url,
                start.elapsed(),
                status
            );
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_authorization_header() {
        let credentials = Credentials::new("7d431e42dfa6a6d693ac2d04", "5e987ac6d2e04d95a9d8f0d1");
        assert_eq!(
            credentials.authorization(Auth::App),
            format!(
                "Basic {}",
                STANDARD.encode("7d431e42dfa6a6d693ac2d04:5e987ac6d2e04d95a9d8f0d1")
            )
        );
    }

    #[test]
    fn test_group_authorization_header() {
        let credentials =
            Credentials::new("appkey", "secret").with_group("2ed1465b94aab3f03f6778e0", "d4ee2375846bc30fa51334f5");
        assert_eq!(
            credentials.authorization(Auth::Group),
            format!(
                "Basic {}",
                STANDARD.encode("group-2ed1465b94aab3f03f6778e0:d4ee2375846bc30fa51334f5")
            )
        );
    }

    #[test]
    fn test_error_message_prefers_body() {
        let response = ApiResponse {
            status: 400,
            status_text: "Bad Request".to_string(),
            body: br#"{"error":{"code":1003,"message":"Missing parameter"}}"#.to_vec(),
        };
        assert!(response.error_message().contains("Missing parameter"));
    }

    #[test]
    fn test_error_message_falls_back_to_status_line() {
        let response = ApiResponse {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: Vec::new(),
        };
        assert_eq!(response.error_message(), "503 Service Unavailable");
    }

    #[test]
    fn test_ensure_ok() {
        let ok = ApiResponse {
            status: 200,
            status_text: "OK".to_string(),
            body: b"{}".to_vec(),
        };
        assert!(ok.ensure_ok().is_ok());

        let not_found = ApiResponse {
            status: 404,
            status_text: "Not Found".to_string(),
            body: Vec::new(),
        };
        let err = not_found.ensure_ok().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_endpoint_keeps_comma_separated_query() {
        let url = endpoint(
            "https://device.jpush.cn",
            "/v3/aliases/qiu",
            Some("platform=android,ios"),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://device.jpush.cn/v3/aliases/qiu?platform=android,ios"
        );
    }

    #[test]
    fn test_user_agent_mentions_crate_version() {
        let agent = Transport::user_agent();
        assert!(agent.contains("jpush-rs/"));
        assert!(agent.contains(env!("CARGO_PKG_VERSION")));
    }
}
