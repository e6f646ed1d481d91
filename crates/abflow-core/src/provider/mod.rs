// ── Resource providers ──
//
// One provider per resource kind, all speaking the same get / create /
// update / delete / canonicalize contract. Capabilities a kind lacks fall
// back to the trait defaults, which refuse with `NotImplemented`.

pub mod application;
pub mod apply_draft;
pub mod flow;

pub use application::ApplicationProvider;
pub use apply_draft::ApplyDraftProvider;
pub use flow::FlowProvider;

use crate::context::Context;
use crate::error::CoreError;
use crate::model::ResourceKind;

/// Shared capability interface of the resource providers.
#[allow(async_fn_in_trait)]
pub trait Provider {
    /// Desired/observed record handled by this provider.
    type Resource;
    /// How a single resource is addressed.
    type Identity: ?Sized;

    const KIND: ResourceKind;

    /// Observed state of every resource of this kind.
    async fn get(&self, ctx: &Context) -> Result<Vec<Self::Resource>, CoreError>;

    async fn create(
        &self,
        ctx: &Context,
        id: &Self::Identity,
        desired: &Self::Resource,
    ) -> Result<(), CoreError>;

    async fn update(
        &self,
        _ctx: &Context,
        _id: &Self::Identity,
        _desired: &Self::Resource,
    ) -> Result<(), CoreError> {
        Err(CoreError::not_implemented(format!("{} update", Self::KIND)))
    }

    async fn delete(&self, _ctx: &Context, _id: &Self::Identity) -> Result<(), CoreError> {
        Err(CoreError::not_implemented(format!("{} delete", Self::KIND)))
    }

    /// Bring records into comparable form before diffing.
    fn canonicalize(&self, _ctx: &Context, records: Vec<Self::Resource>) -> Vec<Self::Resource> {
        records
    }
}
