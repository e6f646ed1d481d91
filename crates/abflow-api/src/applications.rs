// BusinessFlow application endpoints
//
// Applications are addressed by the id of their current revision, which
// changes whenever a draft is applied. Callers resolve it by name right
// before each mutation instead of caching it.

use tracing::debug;

use crate::client::AbfClient;
use crate::error::Error;
use crate::models::{ApplicationRecord, NewApplication};

impl AbfClient {
    /// List every application visible to the session.
    ///
    /// `GET /BusinessFlow/rest/v1/applications`
    pub async fn get_applications(&self) -> Result<Vec<ApplicationRecord>, Error> {
        let url = self.api_url(&["applications"])?;
        debug!("listing applications");
        self.get(url).await
    }

    /// Fetch a single application by name.
    ///
    /// `GET /BusinessFlow/rest/v1/applications/name/{name}`
    pub async fn get_application_by_name(&self, name: &str) -> Result<ApplicationRecord, Error> {
        let url = self.api_url(&["applications", "name", name])?;
        debug!(application = name, "fetching application");
        self.get(url).await
    }

    /// Resolve the current revision id of an application.
    ///
    /// An unknown name surfaces as the API's 404 (see [`Error::is_not_found`]).
    pub async fn get_app_revision_id_by_name(&self, name: &str) -> Result<u64, Error> {
        self.get_application_by_name(name).await?.current_revision()
    }

    /// Create an empty application.
    ///
    /// `POST /BusinessFlow/rest/v1/applications/new`
    ///
    /// Only the name can be set: the API has no update call for the other
    /// application attributes yet.
    pub async fn create_application(&self, name: &str) -> Result<ApplicationRecord, Error> {
        let url = self.api_url(&["applications", "new"])?;
        debug!(application = name, "creating application");
        let body = NewApplication {
            name,
            custom_fields: Vec::new(),
            contacts: Vec::new(),
            labels: Vec::new(),
            flows: Vec::new(),
        };
        self.post(url, &body).await
    }

    /// Decommission the application owning the given revision.
    ///
    /// `POST /BusinessFlow/rest/v1/applications/{revision_id}/decommission`
    pub async fn decommission_application(&self, revision_id: u64) -> Result<(), Error> {
        let revision = revision_id.to_string();
        let url = self.api_url(&["applications", &revision, "decommission"])?;
        debug!(revision_id, "decommissioning application");
        self.post_empty(url).await
    }

    /// Apply (commit) a draft revision.
    ///
    /// `POST /BusinessFlow/rest/v1/applications/{revision_id}/apply`
    pub async fn apply_application_draft(&self, revision_id: u64) -> Result<(), Error> {
        let revision = revision_id.to_string();
        let url = self.api_url(&["applications", &revision, "apply"])?;
        debug!(revision_id, "applying application draft");
        self.post_empty(url).await
    }
}
