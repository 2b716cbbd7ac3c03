// src/sources/mod.rs
pub mod http;
pub mod providers;
pub mod social;
pub mod types;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which external site an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKey {
    Unity,
    #[serde(rename = "mtgelo")]
    MtgElo,
    Melee,
    Topdeck,
    Untapped,
}

impl SourceKey {
    /// Built-in priority: earlier sources win field conflicts.
    pub const DEFAULT_ORDER: [SourceKey; 5] = [
        SourceKey::Unity,
        SourceKey::MtgElo,
        SourceKey::Melee,
        SourceKey::Topdeck,
        SourceKey::Untapped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKey::Unity => "unity",
            SourceKey::MtgElo => "mtgelo",
            SourceKey::Melee => "melee",
            SourceKey::Topdeck => "topdeck",
            SourceKey::Untapped => "untapped",
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        SourceKey::DEFAULT_ORDER
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                format!("unknown source '{s}' (expected one of: unity, mtgelo, melee, topdeck, untapped)")
            })
    }
}
