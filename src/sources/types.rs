// src/sources/types.rs
use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Person-level attributes that get promoted into the merged profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneralField {
    Name,
    Photo,
    Age,
    Bio,
    Team,
    Country,
    Hometown,
    Pronouns,
    Facebook,
    Twitch,
    Youtube,
}

impl GeneralField {
    /// Promotion order used by the merge engine.
    pub const ALL: [GeneralField; 11] = [
        GeneralField::Name,
        GeneralField::Photo,
        GeneralField::Age,
        GeneralField::Bio,
        GeneralField::Team,
        GeneralField::Country,
        GeneralField::Hometown,
        GeneralField::Pronouns,
        GeneralField::Facebook,
        GeneralField::Twitch,
        GeneralField::Youtube,
    ];

    pub fn key(self) -> &'static str {
        match self {
            GeneralField::Name => "name",
            GeneralField::Photo => "photo",
            GeneralField::Age => "age",
            GeneralField::Bio => "bio",
            GeneralField::Team => "team",
            GeneralField::Country => "country",
            GeneralField::Hometown => "hometown",
            GeneralField::Pronouns => "pronouns",
            GeneralField::Facebook => "facebook",
            GeneralField::Twitch => "twitch",
            GeneralField::Youtube => "youtube",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for GeneralField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hometown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

impl GeneralFields {
    /// Value of `field`, treating an empty string as absent.
    pub fn get(&self, field: GeneralField) -> Option<&str> {
        self.slot(field).as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, field: GeneralField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn is_empty(&self) -> bool {
        GeneralField::ALL.into_iter().all(|f| self.get(f).is_none())
    }

    fn slot(&self, field: GeneralField) -> &Option<String> {
        match field {
            GeneralField::Name => &self.name,
            GeneralField::Photo => &self.photo,
            GeneralField::Age => &self.age,
            GeneralField::Bio => &self.bio,
            GeneralField::Team => &self.team,
            GeneralField::Country => &self.country,
            GeneralField::Hometown => &self.hometown,
            GeneralField::Pronouns => &self.pronouns,
            GeneralField::Facebook => &self.facebook,
            GeneralField::Twitch => &self.twitch,
            GeneralField::Youtube => &self.youtube,
        }
    }

    fn slot_mut(&mut self, field: GeneralField) -> &mut Option<String> {
        match field {
            GeneralField::Name => &mut self.name,
            GeneralField::Photo => &mut self.photo,
            GeneralField::Age => &mut self.age,
            GeneralField::Bio => &mut self.bio,
            GeneralField::Team => &mut self.team,
            GeneralField::Country => &mut self.country,
            GeneralField::Hometown => &mut self.hometown,
            GeneralField::Pronouns => &mut self.pronouns,
            GeneralField::Facebook => &mut self.facebook,
            GeneralField::Twitch => &mut self.twitch,
            GeneralField::Youtube => &mut self.youtube,
        }
    }
}

/// Everything a source reported apart from its label and URL.
/// Serialized flat, which is also the shape of `sources[*].data` in the merged output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    #[serde(flatten)]
    pub general: GeneralFields,
    /// `"W-L"` or `"W-L-D"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(rename = "win rate", default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<String>,
    /// Source-specific keys outside the recognized set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RecordData {
    /// Route a scraped `key -> value` pair into its slot.
    /// Blank values are dropped so "present" always means "non-empty".
    pub fn set(&mut self, key: &str, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return;
        }
        if let Some(field) = GeneralField::from_key(key) {
            self.general.set(field, value);
            return;
        }
        match key {
            "record" => self.record = Some(value.to_string()),
            "win rate" => self.win_rate = Some(value.to_string()),
            _ => {
                self.extra
                    .insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }

    /// Store an extension value as-is, bypassing general-field routing.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// The win rate the source computed itself: `win rate`, else a `winRate` extension.
    pub fn reported_win_rate(&self) -> Option<&str> {
        self.win_rate
            .as_deref()
            .filter(|v| !v.is_empty())
            .or_else(|| self.extra.get("winRate").and_then(Value::as_str))
    }
}

/// Normalized output of one adapter fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source: String,
    pub url: String,
    #[serde(flatten)]
    pub data: RecordData,
}

impl SourceRecord {
    pub fn new(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            data: RecordData::default(),
        }
    }

    /// Builder form of [`RecordData::set`].
    pub fn with(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.data.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl AsRef<str>) {
        self.data.set(key, value);
    }

    pub fn get(&self, field: GeneralField) -> Option<&str> {
        self.data.general.get(field)
    }
}

/// One external site. Implementors provide `fetch`; callers use `fetch_by_id`,
/// which never fails: every error is logged, counted and turned into `None`.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<SourceRecord>;
    fn name(&self) -> &'static str;

    async fn fetch_by_id(&self, id: &str) -> Option<SourceRecord> {
        crate::metrics::ensure_described();
        let source = self.name();
        counter!(crate::metrics::FETCH_TOTAL, "source" => source).increment(1);

        let t0 = Instant::now();
        let out = self.fetch(id).await;
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!(crate::metrics::FETCH_MS, "source" => source).record(ms);

        match out {
            Ok(rec) => {
                tracing::debug!(source, id, ms, url = %rec.url, "source fetched");
                Some(rec)
            }
            Err(e) => {
                tracing::warn!(error = ?e, source, id, "source fetch failed");
                counter!(crate::metrics::FETCH_ERRORS_TOTAL, "source" => source).increment(1);
                None
            }
        }
    }
}
