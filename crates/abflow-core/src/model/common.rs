// ── Shared building blocks ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a resource should exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

/// Resource kinds known to the reconciler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum ResourceKind {
    #[strum(serialize = "abf_application")]
    #[serde(rename = "abf_application")]
    Application,
    #[strum(serialize = "abf_flow")]
    #[serde(rename = "abf_flow")]
    Flow,
    #[strum(serialize = "abf_apply_draft")]
    #[serde(rename = "abf_apply_draft")]
    ApplyDraft,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resource_kind_names() {
        assert_eq!(ResourceKind::Flow.to_string(), "abf_flow");
        assert_eq!(
            "abf_apply_draft".parse::<ResourceKind>().unwrap(),
            ResourceKind::ApplyDraft
        );
    }

    #[test]
    fn ensure_defaults_to_present() {
        assert_eq!(Ensure::default(), Ensure::Present);
        assert_eq!(Ensure::Absent.to_string(), "absent");
    }
}
