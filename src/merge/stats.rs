// src/merge/stats.rs
//! Win/loss/draw parsing and the merged win rate.

use crate::sources::types::RecordData;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

impl MatchRecord {
    /// `None` when the total does not fit in a `u64`.
    pub fn games(&self) -> Option<u64> {
        self.wins.checked_add(self.losses)?.checked_add(self.draws)
    }
}

fn count(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parse `"W-L"` or `"W-L-D"`; missing draws count as 0.
/// Counts are plain digits, and records whose total overflows are rejected.
pub fn parse_record(s: &str) -> Option<MatchRecord> {
    let parts: Vec<&str> = s.trim().split('-').map(str::trim).collect();
    let (w, l, d) = match parts.as_slice() {
        [w, l] => (*w, *l, "0"),
        [w, l, d] => (*w, *l, *d),
        _ => return None,
    };
    let rec = MatchRecord {
        wins: count(w)?,
        losses: count(l)?,
        draws: count(d)?,
    };
    rec.games()?;
    Some(rec)
}

/// Parse `"62.5%"`, `"62.5 %"` or `"62.5"`. Non-numeric and non-finite input yields `None`.
pub fn parse_percentage(s: &str) -> Option<f64> {
    let v: f64 = s.trim().trim_end_matches('%').trim().parse().ok()?;
    v.is_finite().then_some(v)
}

pub fn format_percentage(v: f64) -> String {
    format!("{v:.2}%")
}

/// Accumulates everything the merged win rate is computed from.
#[derive(Debug, Clone, Default)]
pub struct WinRateTally {
    wins: u128,
    games: u128,
    reported: Vec<f64>,
}

impl WinRateTally {
    pub fn observe(&mut self, data: &RecordData) {
        // parse_record only returns records whose total fits in a u64
        if let Some(rec) = data.record.as_deref().and_then(parse_record) {
            self.wins += u128::from(rec.wins);
            self.games += u128::from(rec.games().unwrap_or_default());
        }
        if let Some(pct) = data.reported_win_rate().and_then(parse_percentage) {
            self.reported.push(pct);
        }
    }

    /// Totals over all W-L-D records win; otherwise the mean of the reported
    /// percentages; otherwise nothing.
    pub fn win_rate(&self) -> Option<String> {
        if self.games > 0 {
            let pct = self.wins as f64 / self.games as f64 * 100.0;
            return Some(format_percentage(pct));
        }
        if self.reported.is_empty() {
            return None;
        }
        let n = self.reported.len() as f64;
        let avg: f64 = self.reported.iter().map(|v| v / n).sum();
        avg.is_finite().then(|| format_percentage(avg))
    }
}
