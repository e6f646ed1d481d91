// ── Draft-apply pseudo-resource ──
//
// "Commit all pending drafts" expressed as a declarative resource. The
// observed `apply` flag is the negation of "drafts are outstanding", so a
// desired `apply: true` shows up as a pending change only when there is
// something to commit.

use serde::{Deserialize, Serialize};

/// Name of the singleton draft-apply resource.
pub const APPLY_DRAFT_NAME: &str = "apply";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDraft {
    pub name: String,
    pub apply: bool,
}

impl ApplyDraft {
    pub fn new(apply: bool) -> Self {
        Self {
            name: APPLY_DRAFT_NAME.to_owned(),
            apply,
        }
    }
}

/// Observed draft state of the managed applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// At least one managed application has an unapplied draft revision.
    Outstanding,
    Clean,
}

/// What a desired `apply` flag amounts to in a given [`DraftState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    /// Commit every outstanding draft.
    Apply,
    /// Drafts exist but applying them was not requested.
    Skip,
    /// Nothing outstanding.
    Nothing,
}

impl DraftState {
    pub fn from_outstanding(outstanding: bool) -> Self {
        if outstanding { Self::Outstanding } else { Self::Clean }
    }

    /// The resource as the appliance presents it.
    pub fn observed(self) -> ApplyDraft {
        ApplyDraft::new(self == Self::Clean)
    }

    pub fn action(self, desired_apply: bool) -> DraftAction {
        match (self, desired_apply) {
            (Self::Outstanding, true) => DraftAction::Apply,
            (Self::Outstanding, false) => DraftAction::Skip,
            (Self::Clean, _) => DraftAction::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_apply_is_negated_outstanding() {
        assert!(!DraftState::Outstanding.observed().apply);
        assert!(DraftState::Clean.observed().apply);
        assert_eq!(DraftState::Clean.observed().name, "apply");
    }

    #[test]
    fn truth_table() {
        assert_eq!(DraftState::Outstanding.action(true), DraftAction::Apply);
        assert_eq!(DraftState::Outstanding.action(false), DraftAction::Skip);
        assert_eq!(DraftState::Clean.action(true), DraftAction::Nothing);
        assert_eq!(DraftState::Clean.action(false), DraftAction::Nothing);
    }

    #[test]
    fn desired_apply_differs_from_observed_only_with_drafts() {
        let desired = ApplyDraft::new(true);
        assert_ne!(DraftState::Outstanding.observed(), desired);
        assert_eq!(DraftState::Clean.observed(), desired);
    }
}
