use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::{absolutize, selector, text_of, trim_base};
use crate::merge::format_percentage;
use crate::sources::http::HttpClient;
use crate::sources::types::{SourceAdapter, SourceRecord};

pub const SOURCE: &str = "Topdeck";
pub const DEFAULT_BASE_URL: &str = "https://topdeck.gg";

static NAME: Lazy<Selector> = Lazy::new(|| selector("h2.text-white.fw-bold.mb-1"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static PHOTO: Lazy<Selector> = Lazy::new(|| selector("img.rounded-circle.shadow-lg"));
static PHOTO_FALLBACK: Lazy<Selector> =
    Lazy::new(|| selector(r#"img[src*="avatar"], img[src*="profile"]"#));
static STAT_BLOCK: Lazy<Selector> = Lazy::new(|| selector(".stats-container .stat, .player-stats .stat"));
static LABEL: Lazy<Selector> = Lazy::new(|| selector(".label"));
static VALUE: Lazy<Selector> = Lazy::new(|| selector(".value"));

static STAT_ELEMENTS: Lazy<[(Selector, &str); 4]> = Lazy::new(|| {
    [
        (selector("#totalTournaments"), "tournaments"),
        (selector("#overallRecord"), "record"),
        (selector("#overallWinRate"), "win rate"),
        (selector("#conversionRate"), "conversion"),
    ]
});

static STATS_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/profile/([a-zA-Z0-9]+)/stats").unwrap());
static PLAYER_ID_JS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"const playerId = "([a-zA-Z0-9]+)";"#).unwrap());

/// Stats JSON key → record key. The profile page uses the same names as element ids.
const STAT_IDS: [(&str, &str); 4] = [
    ("totalTournaments", "tournaments"),
    ("overallRecord", "record"),
    ("overallWinRate", "win rate"),
    ("conversionRate", "conversion"),
];

/// topdeck.gg profiles, keyed by handle (`@` optional).
/// The page itself is enough for a record; the stats endpoint only enriches it.
pub struct TopdeckAdapter {
    client: HttpClient,
    base_url: String,
}

impl TopdeckAdapter {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn profile_url(&self, handle: &str) -> String {
        format!("{}/profile/{}", trim_base(&self.base_url), clean_handle(handle))
    }

    pub fn stats_url(&self, internal_id: &str) -> String {
        format!("{}/profile/{}/stats", trim_base(&self.base_url), internal_id)
    }
}

#[async_trait]
impl SourceAdapter for TopdeckAdapter {
    async fn fetch(&self, handle: &str) -> Result<SourceRecord> {
        let handle = clean_handle(handle);
        let url = self.profile_url(&handle);
        let html = self.client.get_text(&url).await?;
        let (mut rec, internal_id) = parse_profile(&html, &url, &handle, &self.base_url);

        if let Some(internal_id) = internal_id {
            let stats_url = self.stats_url(&internal_id);
            match self.client.get_json::<Value>(&stats_url).await {
                Ok(stats) => apply_stats(&mut rec, &stats),
                Err(e) => {
                    tracing::warn!(error = ?e, source = SOURCE, handle = %handle, "stats fetch failed; keeping profile data");
                }
            }
        }

        Ok(rec)
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

pub fn clean_handle(handle: &str) -> String {
    let h = handle.trim();
    if h.starts_with('@') {
        h.to_string()
    } else {
        format!("@{h}")
    }
}

/// Internal player id used by the stats endpoint, if the page exposes one.
pub fn find_internal_id(html: &str) -> Option<String> {
    STATS_LINK
        .captures(html)
        .or_else(|| PLAYER_ID_JS.captures(html))
        .map(|c| c[1].to_string())
}

/// Parse the profile page. Returns the record and the internal stats id.
pub fn parse_profile(
    html: &str,
    url: &str,
    handle: &str,
    base_url: &str,
) -> (SourceRecord, Option<String>) {
    let doc = Html::parse_document(html);

    let name = [&*NAME, &*H1]
        .into_iter()
        .find_map(|sel| doc.select(sel).next().map(text_of).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| handle.to_string());
    let mut rec = SourceRecord::new(SOURCE, url).with("name", name);

    let photo = doc
        .select(&PHOTO)
        .next()
        .or_else(|| doc.select(&PHOTO_FALLBACK).next())
        .and_then(|img| img.value().attr("src"));
    if let Some(src) = photo {
        rec.set("photo", absolutize(base_url, src));
    }

    let mut found = 0;
    for (sel, key) in STAT_ELEMENTS.iter() {
        if let Some(el) = doc.select(sel).next() {
            let value = text_of(el);
            if !value.is_empty() {
                rec.set(key, value);
                found += 1;
            }
        }
    }

    // Older layout: generic label/value stat blocks.
    if found <= 1 {
        for stat in doc.select(&STAT_BLOCK) {
            let label = stat
                .select(&LABEL)
                .next()
                .map(text_of)
                .unwrap_or_default()
                .to_lowercase();
            let value = stat.select(&VALUE).next().map(text_of).unwrap_or_default();
            if !label.is_empty() {
                rec.set(&label, value);
            }
        }
    }

    (rec, find_internal_id(html))
}

fn count(v: &Value, key: &str) -> u64 {
    v.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fold the stats endpoint into the record.
/// `yearlyStats` is summed across years; otherwise the flat totals are copied.
pub fn apply_stats(rec: &mut SourceRecord, stats: &Value) {
    if let Some(years) = stats.get("yearlyStats").and_then(Value::as_object) {
        let (mut tournaments, mut wins, mut losses, mut draws) = (0u64, 0u64, 0u64, 0u64);
        for overall in years.values().filter_map(|y| y.get("overall")) {
            tournaments += count(overall, "totalTournaments");
            wins += count(overall, "wins");
            losses += count(overall, "losses");
            draws += count(overall, "draws");
        }
        if tournaments > 0 {
            rec.set("tournaments", tournaments.to_string());
            rec.set("record", format!("{wins}-{losses}-{draws}"));
            let games = wins + losses + draws;
            if games > 0 {
                rec.set(
                    "win rate",
                    format_percentage(wins as f64 / games as f64 * 100.0),
                );
            }
        }
        return;
    }

    for (json_key, key) in STAT_IDS {
        if let Some(v) = stats.get(json_key).and_then(as_text) {
            rec.set(key, v);
        }
    }
}
