// abflow-core: Reconciliation of BusinessFlow applications, flows and drafts.

pub mod config;
pub mod context;
pub mod convert;
pub mod device;
pub mod error;
pub mod guard;
pub mod manifest;
pub mod model;
pub mod provider;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceConfig, TlsVerification};
pub use context::Context;
pub use device::{Device, DraftApplyReport};
pub use error::CoreError;
pub use guard::ManagedApplications;
pub use manifest::{DesiredState, Manifest};
pub use provider::{ApplicationProvider, ApplyDraftProvider, FlowProvider, Provider};
pub use reconcile::{ReconcileReport, Reconciler};

pub use model::{
    APPLY_DRAFT_NAME, Application, ApplyDraft, Change, ChangeAction, DraftAction, DraftState,
    Ensure, Flow, FlowKey, FlowName, ResourceKind,
};
