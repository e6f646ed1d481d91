// ── Device abstraction ──
//
// One connection to a BusinessFlow appliance. The API session is created
// and logged in lazily on first use, then reused for every later call made
// through this `Device`.

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use abflow_api::transport::{TlsMode, TransportConfig};
use abflow_api::{AbfClient, ApplicationRecord};

use crate::config::{DeviceConfig, TlsVerification};
use crate::error::CoreError;
use crate::guard::ManagedApplications;
use crate::model::DraftState;

/// Outcome of [`Device::apply_application_drafts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftApplyReport {
    /// Applications whose draft was committed.
    pub applied: Vec<String>,
    /// Applications whose apply call failed, with the error text.
    pub failed: Vec<(String, String)>,
}

impl DraftApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A BusinessFlow appliance and its (lazily established) API session.
pub struct Device {
    config: DeviceConfig,
    api: OnceCell<AbfClient>,
}

impl Device {
    /// Create a device. Does NOT connect; the first call to
    /// [`api()`](Self::api) logs in.
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            api: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn managed_applications(&self) -> &ManagedApplications {
        &self.config.managed
    }

    /// The logged-in API client, created on first use.
    pub async fn api(&self) -> Result<&AbfClient, CoreError> {
        self.api.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<AbfClient, CoreError> {
        let config = &self.config;
        let client = AbfClient::new(config.url.clone(), &build_transport(config))?;
        client.login(&config.username, &config.password).await?;
        debug!(url = %config.url, "BusinessFlow session established");
        if config.managed.is_unrestricted() {
            debug!("managing every application");
        } else {
            debug!(managed = ?config.managed.names(), "managed applications");
        }
        Ok(client)
    }

    /// End the session if one was established. Failures are logged, not returned.
    pub async fn logout(&self) {
        if let Some(client) = self.api.get() {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
    }

    // ── Guard ────────────────────────────────────────────────────────

    pub fn is_managed_application(&self, name: &str) -> bool {
        self.config.managed.is_managed(name)
    }

    /// Fail with a policy error unless `application` is managed.
    pub fn ensure_managed(
        &self,
        operation: &str,
        application: &str,
        target: impl Into<String>,
    ) -> Result<(), CoreError> {
        if self.is_managed_application(application) {
            Ok(())
        } else {
            Err(CoreError::unmanaged(operation, target))
        }
    }

    /// Current revision id of `application`, looked up by name.
    ///
    /// A 404 from the lookup becomes [`CoreError::ApplicationNotFound`].
    pub async fn revision_id(&self, application: &str) -> Result<u64, CoreError> {
        match self.api().await?.get_app_revision_id_by_name(application).await {
            Ok(revision_id) => Ok(revision_id),
            Err(e) if e.is_not_found() => Err(CoreError::ApplicationNotFound {
                name: application.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // ── Drafts ───────────────────────────────────────────────────────

    /// Whether any managed application has an unapplied draft revision.
    ///
    /// Stops at the first one found.
    pub async fn has_outstanding_drafts(&self) -> Result<bool, CoreError> {
        let apps = self.api().await?.get_applications().await?;
        match apps.iter().find(|app| self.is_managed_draft(app)) {
            Some(app) => {
                info!("Outstanding application draft found for: {}", app.name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn draft_state(&self) -> Result<DraftState, CoreError> {
        self.has_outstanding_drafts()
            .await
            .map(DraftState::from_outstanding)
    }

    /// Apply the draft of every managed application that has one.
    ///
    /// Every draft is attempted even if an earlier one fails; failures are
    /// collected in the returned report.
    pub async fn apply_application_drafts(&self) -> Result<DraftApplyReport, CoreError> {
        let api = self.api().await?;
        let apps = api.get_applications().await?;

        let mut report = DraftApplyReport::default();
        for app in apps.iter().filter(|app| self.is_managed_draft(app)) {
            let applied = match app.current_revision() {
                Ok(revision_id) => api.apply_application_draft(revision_id).await,
                Err(e) => Err(e),
            };
            match applied {
                Ok(()) => {
                    info!("Application draft applied for: {}", app.name);
                    report.applied.push(app.name.clone());
                }
                Err(e) => {
                    warn!(error = %e, "Failed to apply application draft for: {}", app.name);
                    report.failed.push((app.name.clone(), e.to_string()));
                }
            }
        }
        Ok(report)
    }

    fn is_managed_draft(&self, app: &ApplicationRecord) -> bool {
        self.is_managed_application(&app.name) && app.is_draft()
    }
}

fn build_transport(config: &DeviceConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        cookie_jar: None, // AbfClient::new adds one automatically
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
