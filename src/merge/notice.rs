// src/merge/notice.rs
use std::fmt;

use crate::sources::types::GeneralField;

/// What the merge observed for one general field of one source.
/// Purely informational; never feeds back into the merged profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeNotice {
    /// First source to supply the field; its value is kept.
    Promoted {
        field: GeneralField,
        source: String,
        value: String,
    },
    /// Later source agrees with the kept value.
    Matched {
        field: GeneralField,
        source: String,
        value: String,
    },
    /// Later source disagrees; `value` was dropped in favor of `kept`.
    Conflict {
        field: GeneralField,
        source: String,
        value: String,
        kept: String,
    },
}

impl MergeNotice {
    /// Console marker. Differing photos are routine, so they get their own.
    pub fn marker(&self) -> &'static str {
        match self {
            MergeNotice::Promoted { .. } => "⬆️",
            MergeNotice::Matched { .. } => "🆗",
            MergeNotice::Conflict {
                field: GeneralField::Photo,
                ..
            } => "🆕",
            MergeNotice::Conflict { .. } => "🆚",
        }
    }

    pub fn field(&self) -> GeneralField {
        match self {
            MergeNotice::Promoted { field, .. }
            | MergeNotice::Matched { field, .. }
            | MergeNotice::Conflict { field, .. } => *field,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            MergeNotice::Promoted { source, .. }
            | MergeNotice::Matched { source, .. }
            | MergeNotice::Conflict { source, .. } => source,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeNotice::Conflict { .. })
    }
}

impl fmt::Display for MergeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = self.marker();
        match self {
            MergeNotice::Promoted {
                field,
                source,
                value,
            } => write!(
                f,
                "{marker}: Promoted '{field}' from {source} to general information: {value}"
            ),
            MergeNotice::Matched {
                field,
                source,
                value,
            } => write!(
                f,
                "{marker}: {source} has the same '{field}' as seen before: {value}"
            ),
            MergeNotice::Conflict {
                field,
                source,
                value,
                kept,
            } => write!(
                f,
                "{marker}: {source} has different '{field}' than seen before: {value} (instead of {kept})"
            ),
        }
    }
}
