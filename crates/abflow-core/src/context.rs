// ── Provider context ──
//
// What a provider sees during a call: a log sink tagged with the resource
// kind, the device handle, and the change journal of the current pass.

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::device::Device;
use crate::model::{Change, ChangeAction, ResourceKind};

/// Per-pass context handed to every provider call.
///
/// Cheap to clone; clones share the device and the journal.
#[derive(Clone)]
pub struct Context {
    device: Arc<Device>,
    kind: Option<ResourceKind>,
    journal: Arc<Mutex<Vec<Change>>>,
}

impl Context {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            kind: None,
            journal: Arc::default(),
        }
    }

    /// A context whose log lines are tagged with `kind`.
    #[must_use]
    pub fn scoped(&self, kind: ResourceKind) -> Self {
        Self {
            kind: Some(kind),
            ..self.clone()
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    // ── Logging ──────────────────────────────────────────────────────

    fn resource(&self) -> String {
        self.kind.map_or_else(|| "device".to_owned(), |k| k.to_string())
    }

    /// User-facing announcement of an action.
    pub fn notice(&self, message: impl Display) {
        info!(resource = %self.resource(), "{message}");
    }

    pub fn info(&self, message: impl Display) {
        info!(resource = %self.resource(), "{message}");
    }

    pub fn debug(&self, message: impl Display) {
        debug!(resource = %self.resource(), "{message}");
    }

    pub fn warning(&self, message: impl Display) {
        warn!(resource = %self.resource(), "{message}");
    }

    // ── Change journal ───────────────────────────────────────────────

    pub fn record(&self, change: Change) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change);
    }

    /// Changes recorded so far, in order.
    pub fn changes(&self) -> Vec<Change> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `action` as an update of the resource `name`, recording it.
    pub async fn updating<T, E, F>(&self, name: &str, action: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.debug(format_args!("updating '{name}'"));
        let result = action.await;
        if result.is_ok() {
            if let Some(kind) = self.kind {
                self.record(Change::new(kind, name, ChangeAction::Update));
            }
        }
        result
    }
}
