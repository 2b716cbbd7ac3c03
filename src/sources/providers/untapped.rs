use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::trim_base;
use crate::sources::http::HttpClient;
use crate::sources::types::{SourceAdapter, SourceRecord};

pub const SOURCE: &str = "Untapped.gg";
pub const DEFAULT_BASE_URL: &str = "https://mtga.untapped.gg";
pub const DEFAULT_API_URL: &str = "https://api.mtga.untapped.gg";

/// MTG Arena rank from the player's most recent match on untapped.gg.
/// Identifier is the compound `userId/playerCode`.
pub struct UntappedAdapter {
    client: HttpClient,
    base_url: String,
    api_url: String,
    card_set: String,
}

impl UntappedAdapter {
    pub fn new(
        client: HttpClient,
        base_url: impl Into<String>,
        api_url: impl Into<String>,
        card_set: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_url: api_url.into(),
            card_set: card_set.into(),
        }
    }

    pub fn profile_url(&self, user_id: &str, player_code: &str) -> String {
        format!(
            "{}/profile/{user_id}/{player_code}",
            trim_base(&self.base_url)
        )
    }

    pub fn matches_url(&self, user_id: &str, player_code: &str) -> String {
        format!(
            "{}/api/v1/games/users/{user_id}/players/{player_code}/?card_set={}",
            trim_base(&self.api_url),
            self.card_set
        )
    }
}

/// `"userId/playerCode"` → both parts, rejecting anything else.
pub fn split_id(id: &str) -> Option<(&str, &str)> {
    let (user, code) = id.trim().split_once('/')?;
    if user.is_empty() || code.is_empty() || code.contains('/') {
        return None;
    }
    Some((user, code))
}

#[async_trait]
impl SourceAdapter for UntappedAdapter {
    async fn fetch(&self, id: &str) -> Result<SourceRecord> {
        let (user_id, player_code) =
            split_id(id).ok_or_else(|| anyhow!("Untapped id must be in format \"userId/playerCode\", got {id:?}"))?;

        let matches: Vec<Value> = self
            .client
            .get_json(&self.matches_url(user_id, player_code))
            .await?;
        let Some(latest) = most_recent(&matches) else {
            bail!("no matches found for Untapped player {id}");
        };

        Ok(parse_match(latest, &self.profile_url(user_id, player_code)))
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

/// `true` when `a` started strictly later than `b`. Numbers compare numerically,
/// strings (ISO timestamps) lexicographically.
fn started_after(a: &Value, b: &Value) -> bool {
    match (a.get("match_start"), b.get("match_start")) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().unwrap_or(0.0) > y.as_f64().unwrap_or(0.0)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x > y,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Latest match; ties keep the earlier entry.
pub fn most_recent(matches: &[Value]) -> Option<&Value> {
    matches.iter().reduce(|latest, current| {
        if started_after(current, latest) {
            current
        } else {
            latest
        }
    })
}

pub fn parse_match(m: &Value, url: &str) -> SourceRecord {
    let mut rec = SourceRecord::new(SOURCE, url);
    let class = m
        .get("friendly_ranking_class_after")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty());
    let tier = m
        .get("friendly_ranking_tier_after")
        .filter(|t| !t.is_null());
    if let (Some(class), Some(tier)) = (class, tier) {
        let tier = match tier {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        rec.data.insert_extra("mtga_rank", format!("{class} {tier}"));
    }
    rec
}
