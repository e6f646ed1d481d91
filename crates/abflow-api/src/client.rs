// BusinessFlow API HTTP client
//
// Wraps `reqwest::Client` with BusinessFlow URL construction and response
// handling. Endpoint groups (auth, applications, flows) are implemented as
// inherent methods in separate files so this module stays focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::{ParseError, Url};

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

/// Path prefix shared by every BusinessFlow REST endpoint.
const API_PREFIX: [&str; 3] = ["BusinessFlow", "rest", "v1"];

/// Longest slice of an error body kept in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the BusinessFlow REST API.
///
/// Session state lives in the cookie jar of the underlying `reqwest::Client`:
/// [`login`](Self::login) stores the session cookie and every later request
/// presents it.
pub struct AbfClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AbfClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). The `base_url` is the
    /// appliance root, e.g. `https://algosec.example.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/BusinessFlow/rest/v1/{segments...}`.
    ///
    /// Segments are percent-encoded individually, so application and flow
    /// names may contain spaces or slashes.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Send a bodiless POST request, discarding whatever the API returns.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await.map(drop)
    }

    /// Send a DELETE request, discarding whatever the API returns.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.http.delete(url).send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await.map(drop)
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map non-success statuses to errors, passing successful responses through.
    ///
    /// 401 is reported as `Error::Authentication`; any other failure carries
    /// the `message` field of the API's error document when there is one.
    pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| preview(&body));
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(len = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> AbfClient {
        AbfClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_appends_prefix() {
        let url = client("https://algosec.example.com")
            .api_url(&["applications"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://algosec.example.com/BusinessFlow/rest/v1/applications"
        );
    }

    #[test]
    fn api_url_keeps_port_and_encodes_segments() {
        let url = client("https://10.0.0.5:8443/")
            .api_url(&["applications", "name", "HR Payroll/v2"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://10.0.0.5:8443/BusinessFlow/rest/v1/applications/name/HR%20Payroll%2Fv2"
        );
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_CHARS + 10);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
