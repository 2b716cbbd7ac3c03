//! # Merge Engine
//! Pure logic that maps an ordered list of source records → `MergedProfile`.
//! No I/O apart from the optional verbose notices on stderr.
//!
//! Policy: records are taken in priority order, duplicates by URL are dropped,
//! the first non-empty value of each general field wins, and the win rate comes
//! from summed W-L-D records or, failing that, the mean of reported rates.

pub mod notice;
pub mod stats;

use std::collections::HashSet;

use indexmap::IndexMap;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::sources::types::{GeneralField, GeneralFields, RecordData, SourceRecord};

pub use notice::MergeNotice;
pub use stats::{format_percentage, parse_percentage, parse_record, MatchRecord, WinRateTally};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralProfile {
    #[serde(flatten)]
    pub fields: GeneralFields,
    /// Absent when nothing could be computed (distinct from `"0.00%"`).
    #[serde(rename = "win rate", default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<String>,
}

impl GeneralProfile {
    pub fn get(&self, field: GeneralField) -> Option<&str> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.win_rate.is_none()
    }
}

/// Provenance of one source: where it came from and everything it said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub url: String,
    pub data: RecordData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedProfile {
    pub general: GeneralProfile,
    /// In the order sources were merged; a repeated label keeps its first slot.
    pub sources: IndexMap<String, SourceEntry>,
}

/// Merge records given in priority order. `None` entries (failed sources) are skipped.
/// With `verbose`, every promotion/match/conflict is printed to stderr.
pub fn merge<I, R>(records: I, verbose: bool) -> MergedProfile
where
    I: IntoIterator<Item = R>,
    R: Into<Option<SourceRecord>>,
{
    merge_with(records, |notice| {
        if verbose {
            eprintln!("{notice}");
        }
    })
}

/// Same as [`merge`], handing each notice to `observe` instead of printing it.
pub fn merge_with<I, R, F>(records: I, mut observe: F) -> MergedProfile
where
    I: IntoIterator<Item = R>,
    R: Into<Option<SourceRecord>>,
    F: FnMut(&MergeNotice),
{
    crate::metrics::ensure_described();
    counter!(crate::metrics::MERGE_RUNS_TOTAL).increment(1);

    let mut profile = MergedProfile::default();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut tally = WinRateTally::default();

    for rec in records.into_iter().filter_map(Into::into) {
        if !seen_urls.insert(rec.url.clone()) {
            tracing::debug!(target: "merge", source = %rec.source, url = %rec.url, "duplicate url skipped");
            continue;
        }

        for field in GeneralField::ALL {
            let Some(value) = rec.get(field) else {
                continue;
            };
            let notice = match profile.general.fields.get(field) {
                None => {
                    profile.general.fields.set(field, value);
                    MergeNotice::Promoted {
                        field,
                        source: rec.source.clone(),
                        value: value.to_string(),
                    }
                }
                Some(kept) if kept == value => MergeNotice::Matched {
                    field,
                    source: rec.source.clone(),
                    value: value.to_string(),
                },
                Some(kept) => MergeNotice::Conflict {
                    field,
                    source: rec.source.clone(),
                    value: value.to_string(),
                    kept: kept.to_string(),
                },
            };
            if notice.is_conflict() {
                counter!(crate::metrics::MERGE_CONFLICTS_TOTAL).increment(1);
            }
            tracing::debug!(target: "merge", field = field.key(), source = %rec.source, "{notice}");
            observe(&notice);
        }

        tally.observe(&rec.data);

        let SourceRecord { source, url, data } = rec;
        if let Some(prev) = profile.sources.insert(source.clone(), SourceEntry { url, data }) {
            tracing::debug!(target: "merge", %source, replaced = %prev.url, "source label seen twice; keeping the later entry");
        }
    }

    profile.general.win_rate = tally.win_rate();
    profile
}
