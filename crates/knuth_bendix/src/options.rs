use kbc_utilities::Limit;

use crate::KnuthBendixError;
use crate::OverlapPolicy;

/// The settings of the completion procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnuthBendixOptions {
    /// The number of candidate rules that are collected before they are
    /// reduced and added to the rewriting system.
    pub max_pending_rules: usize,

    /// The number of overlaps that are considered between two checks for confluence.
    pub check_confluence_interval: Limit,

    /// Overlaps longer than this, measured by the overlap policy, are skipped.
    pub max_overlap: Limit,

    /// The completion stops when this many rules are active.
    pub max_rules: Limit,

    pub overlap_policy: OverlapPolicy,
}

impl Default for KnuthBendixOptions {
    fn default() -> Self {
        KnuthBendixOptions {
            max_pending_rules: 128,
            check_confluence_interval: Limit::Bounded(4096),
            max_overlap: Limit::Unbounded,
            max_rules: Limit::Unbounded,
            overlap_policy: OverlapPolicy::Abc,
        }
    }
}

impl KnuthBendixOptions {
    /// Checks that the values can be used by the completion.
    pub fn validate(&self) -> Result<(), KnuthBendixError> {
        if self.max_pending_rules == 0 {
            return Err(KnuthBendixError::InvalidOption {
                option: "max_pending_rules",
                reason: "the value must be at least 1",
            });
        }

        if self.check_confluence_interval == Limit::Bounded(0) {
            return Err(KnuthBendixError::InvalidOption {
                option: "check_confluence_interval",
                reason: "the value must be at least 1, or unbounded to disable the check",
            });
        }

        Ok(())
    }
}
