// ── Domain model ──
//
// Desired/observed-state records handled by the providers. Every record
// here is the canonical form of a BusinessFlow object, independent of the
// wire format in `abflow_api::models`.

pub mod application;
pub mod change;
pub mod common;
pub mod draft;
pub mod flow;

pub use application::Application;
pub use change::{Change, ChangeAction};
pub use common::{Ensure, ResourceKind};
pub use draft::{APPLY_DRAFT_NAME, ApplyDraft, DraftAction, DraftState};
pub use flow::{Flow, FlowKey, FlowName};
