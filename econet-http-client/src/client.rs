//! Econet24 HTTP client implementation

use crate::error::EconetError;
use crate::window::{self, TimeWindow};
use chrono::Local;
use reqwest::cookie::{CookieStore, Jar};
use serde_json::Value;
use std::sync::Arc;

/// Production Econet24 service host
const API_ROOT: &str = "https://www.econet24.com";

/// Cookie that proves an authenticated session
const SESSION_COOKIE: &str = "sessionid";

/// The main Econet24 HTTP client
///
/// This client authenticates against the Econet24 web service with a session
/// cookie and fetches the device list and historical telemetry. The device
/// list is cached at login time; its first entry is used as the default
/// device for history queries.
///
/// The API is blocking and synchronous. One call issues one HTTP request; no
/// retries and no internal locking. Use one client per thread.
///
/// # Example
///
/// ```no_run
/// use econet_http_client::EconetClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = EconetClient::new()?;
/// client.login("user", "secret")?;
///
/// // Telemetry since midnight for the account's first device
/// let payload = client.data_today(None)?;
/// println!("{payload}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EconetClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    cookies: Arc<Jar>,
    user_devices: Vec<String>,
}

impl EconetClient {
    /// Create a new client with rustls-tls configuration and a fresh cookie jar
    ///
    /// # Errors
    ///
    /// Returns `EconetError::ClientInit` if the HTTP client cannot be
    /// initialized.
    pub fn new() -> Result<Self, EconetError> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use econet_http_client::EconetClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = EconetClient::builder()
    ///     .base_url("http://localhost:1234")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> EconetClientBuilder {
        EconetClientBuilder::new()
    }

    /// Device identifiers cached by the last successful `login`
    pub fn user_devices(&self) -> &[String] {
        &self.user_devices
    }

    /// Look up a cookie by name in the jar, scoped to the base URL
    fn cookie_value(&self, name: &str) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let raw = header.to_str().ok()?;
        raw.split("; ").find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }

    fn assert_session_cookie(&self) -> Result<(), EconetError> {
        if self.cookie_value(SESSION_COOKIE).is_some() {
            Ok(())
        } else {
            Err(EconetError::LoginFailed)
        }
    }

    /// Construct an endpoint URL from path segments
    ///
    /// A trailing empty segment produces a trailing slash, which the login
    /// endpoint requires.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, EconetError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EconetError::ClientInit("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// Authenticate and cache the account's device list
    ///
    /// Idempotent: when a session cookie is already present, returns
    /// `Ok(None)` without touching the network. Otherwise POSTs the
    /// credentials, verifies that the server set a session cookie, eagerly
    /// fetches the device list (its first entry becomes the default device
    /// for history queries), and returns the raw login response.
    ///
    /// # Errors
    ///
    /// * `EconetError::InvalidStatus` - the login request returned non-2xx
    /// * `EconetError::LoginFailed` - no session cookie was set (for example
    ///   bad credentials, where the server only sets a csrf cookie)
    /// * `EconetError::Request` - network error, or a malformed device-list
    ///   response body
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Option<reqwest::blocking::Response>, EconetError> {
        if self.cookie_value(SESSION_COOKIE).is_some() {
            return Ok(None);
        }

        let url = self.endpoint(&["login", ""])?;
        let form = [("username", username), ("password", password)];
        let response = self.client.post(url).form(&form).send()?;

        if !response.status().is_success() {
            return Err(EconetError::InvalidStatus {
                status: response.status(),
            });
        }

        self.assert_session_cookie()?;
        let devices = self.get_user_devices()?;
        self.user_devices = extract_device_ids(&devices);

        Ok(Some(response))
    }

    /// Fetch the account's device list
    ///
    /// Requires an authenticated session. The JSON body is returned verbatim;
    /// the expected shape is an object with a `devices` list of identifiers.
    ///
    /// # Errors
    ///
    /// * `EconetError::LoginFailed` - no session cookie exists
    /// * `EconetError::InvalidStatus` - non-2xx response
    /// * `EconetError::Request` - network or JSON decode error
    pub fn get_user_devices(&self) -> Result<Value, EconetError> {
        self.assert_session_cookie()?;

        let url = self.endpoint(&["service", "getUserDevices"])?;
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(EconetError::InvalidStatus {
                status: response.status(),
            });
        }

        Ok(response.json()?)
    }

    /// Fetch historical telemetry for an explicit time window
    ///
    /// When `uid` is omitted, the first device cached at login time is used;
    /// if no device is cached either, the call fails with `LoginFailed`. The
    /// telemetry payload is opaque and returned verbatim.
    ///
    /// # Errors
    ///
    /// * `EconetError::LoginFailed` - no session cookie, or no uid and no
    ///   cached default device
    /// * `EconetError::InvalidStatus` - non-2xx response
    /// * `EconetError::Request` - network or JSON decode error
    pub fn data_history(
        &self,
        window: TimeWindow,
        uid: Option<&str>,
    ) -> Result<Value, EconetError> {
        self.assert_session_cookie()?;

        let uid = match uid {
            Some(uid) => uid,
            None => self
                .user_devices
                .first()
                .ok_or(EconetError::LoginFailed)?
                .as_str(),
        };

        let url = self.endpoint(&["service", "getHistoryParamsValues"])?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("uid", uid.to_string()),
                ("fromDate", window.from_date_param()),
                ("toDate", window.to_date_param()),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(EconetError::InvalidStatus {
                status: response.status(),
            });
        }

        Ok(response.json()?)
    }

    /// Telemetry from midnight through now
    pub fn data_today(&self, uid: Option<&str>) -> Result<Value, EconetError> {
        self.data_history(window::today(Local::now().naive_local()), uid)
    }

    /// Telemetry for the full previous calendar day
    pub fn data_yesterday(&self, uid: Option<&str>) -> Result<Value, EconetError> {
        self.data_history(window::yesterday(Local::now().naive_local()), uid)
    }

    /// Telemetry from Monday of the current week through now
    pub fn data_this_week(&self, uid: Option<&str>) -> Result<Value, EconetError> {
        self.data_history(window::this_week(Local::now().naive_local()), uid)
    }

    /// Telemetry for the full previous week, Monday through Sunday
    pub fn data_prev_week(&self, uid: Option<&str>) -> Result<Value, EconetError> {
        self.data_history(window::prev_week(Local::now().naive_local()), uid)
    }

    /// Telemetry from the 1st of the current month through now
    pub fn data_this_month(&self, uid: Option<&str>) -> Result<Value, EconetError> {
        self.data_history(window::this_month(Local::now().naive_local()), uid)
    }

    /// Telemetry for the full previous calendar month
    pub fn data_prev_month(&self, uid: Option<&str>) -> Result<Value, EconetError> {
        self.data_history(window::prev_month(Local::now().naive_local()), uid)
    }
}

/// Extract device identifiers from a device-list response
///
/// A missing or malformed `devices` key yields an empty list; non-string
/// entries are skipped.
fn extract_device_ids(payload: &Value) -> Vec<String> {
    payload
        .get("devices")
        .and_then(Value::as_array)
        .map(|devices| {
            devices
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Builder for configuring an Econet24 HTTP client
///
/// Allows overriding the base URL (mock servers in tests) and the underlying
/// HTTP client configuration (timeouts, proxies). The cookie jar is always
/// installed regardless of the provided builder, since session handling
/// depends on it.
///
/// # Example
///
/// ```no_run
/// use econet_http_client::EconetClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EconetClient::builder()
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(30))
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EconetClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl EconetClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            base_url: None,
            client_builder: None,
        }
    }

    /// Set a custom base URL for the client
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, EconetError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder
    ///
    /// Allows full customization of the transport. The cookie provider will
    /// be overridden regardless of the provided builder configuration.
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Build the client with the configured settings
    ///
    /// # Errors
    ///
    /// Returns `EconetError::ClientInit` if the HTTP client cannot be
    /// initialized.
    pub fn build(self) -> Result<EconetClient, EconetError> {
        let base_url = self.base_url.unwrap_or_else(|| {
            reqwest::Url::parse(API_ROOT).expect("Default base URL should always be valid")
        });

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());

        // The jar is held separately so session-cookie presence can be asserted
        let cookies = Arc::new(Jar::default());
        let client = builder
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|e| EconetError::ClientInit(e.to_string()))?;

        Ok(EconetClient {
            client,
            base_url,
            cookies,
            user_devices: Vec::new(),
        })
    }
}

impl Default for EconetClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::TimeWindow;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn client_for(server: &mockito::Server) -> EconetClient {
        EconetClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap()
    }

    fn mock_login(server: &mut mockito::Server, cookie: &str, hits: usize) -> mockito::Mock {
        server
            .mock("POST", "/login/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("username".into(), "user".into()),
                mockito::Matcher::UrlEncoded("password".into(), "secret".into()),
            ]))
            .with_status(200)
            .with_header("set-cookie", cookie)
            .with_body("OK")
            .expect(hits)
            .create()
    }

    fn mock_devices(server: &mut mockito::Server, body: &str, hits: usize) -> mockito::Mock {
        server
            .mock("GET", "/service/getUserDevices")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create()
    }

    fn fixed_window() -> TimeWindow {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap();
        TimeWindow::new(start, end)
    }

    #[test]
    fn test_login_caches_device_list() {
        let mut server = mockito::Server::new();
        let login = mock_login(&mut server, "sessionid=abc123; Path=/", 1);
        let devices = mock_devices(&mut server, r#"{"devices": ["dev-123", "dev-456"]}"#, 1);

        let mut client = client_for(&server);
        let response = client.login("user", "secret").unwrap();

        assert!(response.is_some());
        assert_eq!(client.user_devices(), ["dev-123", "dev-456"]);
        login.assert();
        devices.assert();
    }

    #[test]
    fn test_login_is_idempotent() {
        let mut server = mockito::Server::new();
        let login = mock_login(&mut server, "sessionid=abc123; Path=/", 1);
        let devices = mock_devices(&mut server, r#"{"devices": ["dev-123"]}"#, 1);

        let mut client = client_for(&server);
        assert!(client.login("user", "secret").unwrap().is_some());

        // Second login short-circuits: no response, no further requests
        assert!(client.login("user", "secret").unwrap().is_none());
        login.assert();
        devices.assert();
    }

    #[test]
    fn test_login_with_only_csrf_cookie_fails() {
        let mut server = mockito::Server::new();
        let login = mock_login(&mut server, "csrftoken=tok; Path=/", 1);
        let devices = mock_devices(&mut server, r#"{"devices": []}"#, 0);

        let mut client = client_for(&server);
        let result = client.login("user", "secret");

        assert!(matches!(result, Err(EconetError::LoginFailed)));
        login.assert();
        devices.assert();
    }

    #[test]
    fn test_login_non_success_status() {
        let mut server = mockito::Server::new();
        let login = server.mock("POST", "/login/").with_status(503).create();

        let mut client = client_for(&server);
        let result = client.login("user", "secret");

        match result.unwrap_err() {
            EconetError::InvalidStatus { status } => assert_eq!(status.as_u16(), 503),
            other => panic!("Expected InvalidStatus, got {:?}", other),
        }
        login.assert();
    }

    #[test]
    fn test_data_calls_before_login_fail() {
        let server = mockito::Server::new();
        let client = client_for(&server);

        assert!(matches!(
            client.get_user_devices(),
            Err(EconetError::LoginFailed)
        ));
        assert!(matches!(
            client.data_history(fixed_window(), Some("dev-123")),
            Err(EconetError::LoginFailed)
        ));
        assert!(matches!(client.data_today(None), Err(EconetError::LoginFailed)));
    }

    #[test]
    fn test_data_history_uses_first_cached_device() {
        let mut server = mockito::Server::new();
        mock_login(&mut server, "sessionid=abc123; Path=/", 1);
        mock_devices(&mut server, r#"{"devices": ["dev-123", "dev-456"]}"#, 1);
        let history = server
            .mock("GET", "/service/getHistoryParamsValues")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("uid".into(), "dev-123".into()),
                mockito::Matcher::UrlEncoded(
                    "fromDate".into(),
                    "2024-03-15T00:00:00.000000Z".into(),
                ),
                mockito::Matcher::UrlEncoded(
                    "toDate".into(),
                    "2024-03-15T23:59:59.999999Z".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"curves": {}}"#)
            .expect(1)
            .create();

        let mut client = client_for(&server);
        client.login("user", "secret").unwrap();
        let payload = client.data_history(fixed_window(), None).unwrap();

        assert_eq!(payload, serde_json::json!({"curves": {}}));
        history.assert();
    }

    #[test]
    fn test_data_history_explicit_uid_overrides_default() {
        let mut server = mockito::Server::new();
        mock_login(&mut server, "sessionid=abc123; Path=/", 1);
        mock_devices(&mut server, r#"{"devices": ["dev-123"]}"#, 1);
        let history = server
            .mock("GET", "/service/getHistoryParamsValues")
            .match_query(mockito::Matcher::UrlEncoded("uid".into(), "dev-999".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .expect(1)
            .create();

        let mut client = client_for(&server);
        client.login("user", "secret").unwrap();
        client.data_history(fixed_window(), Some("dev-999")).unwrap();

        history.assert();
    }

    #[test]
    fn test_data_history_without_uid_or_devices_fails() {
        let mut server = mockito::Server::new();
        mock_login(&mut server, "sessionid=abc123; Path=/", 1);
        // No "devices" key: cached list stays empty rather than some sentinel
        mock_devices(&mut server, r#"{"status": "ok"}"#, 1);

        let mut client = client_for(&server);
        client.login("user", "secret").unwrap();

        assert!(client.user_devices().is_empty());
        assert!(matches!(
            client.data_history(fixed_window(), None),
            Err(EconetError::LoginFailed)
        ));
    }

    #[test]
    fn test_malformed_json_propagates_decode_error() {
        let mut server = mockito::Server::new();
        mock_login(&mut server, "sessionid=abc123; Path=/", 1);
        server
            .mock("GET", "/service/getUserDevices")
            .with_status(200)
            .with_body("not json")
            .create();

        let mut client = client_for(&server);
        let result = client.login("user", "secret");

        match result.unwrap_err() {
            EconetError::Request(e) => assert!(e.is_decode()),
            other => panic!("Expected Request decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let result = EconetClient::builder().base_url("not a valid url");

        assert!(result.is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_base_url_configuration(
            scheme in prop::sample::select(vec!["http", "https"]),
            host in "[a-z]{3,10}",
            port in 1000u16..10000u16,
        ) {
            let base_url = format!("{}://{}:{}", scheme, host, port);

            let client = EconetClient::builder()
                .base_url(&base_url)
                .unwrap()
                .build()
                .unwrap();

            prop_assert_eq!(client.base_url.scheme(), scheme);
            prop_assert_eq!(client.base_url.host_str(), Some(host.as_str()));
            prop_assert_eq!(client.base_url.port(), Some(port));
        }

        #[test]
        fn prop_default_base_url(_dummy in 0u8..10u8) {
            let client = EconetClient::builder().build().unwrap();

            prop_assert_eq!(client.base_url.as_str(), "https://www.econet24.com/");
        }
    }
}
