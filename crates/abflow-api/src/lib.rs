// abflow-api: Async Rust client for the AlgoSec BusinessFlow REST API

pub mod applications;
pub mod auth;
pub mod client;
pub mod error;
pub mod flows;
pub mod models;
pub mod transport;

pub use client::AbfClient;
pub use error::Error;
pub use models::{
    ApplicationRecord, FlowRecord, NamedObject, NetworkApplicationRef, NetworkUserRef, NewFlow,
    APPLICATION_FLOW_TYPE, DRAFT_REVISION_STATUS,
};
pub use transport::{TlsMode, TransportConfig};
