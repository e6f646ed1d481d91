// BusinessFlow session authentication
//
// The login endpoint sets a session cookie in the client's jar;
// subsequent requests present that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::AbfClient;
use crate::error::Error;

impl AbfClient {
    /// Authenticate with username/password.
    ///
    /// `POST /BusinessFlow/rest/v1/login`
    ///
    /// On success the session cookie is stored in the client's cookie jar
    /// and used for all subsequent requests.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url(&["login"])?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `GET /BusinessFlow/rest/v1/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url(&["logout"])?;
        debug!("logging out at {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await?;

        debug!("logout complete");
        Ok(())
    }
}
