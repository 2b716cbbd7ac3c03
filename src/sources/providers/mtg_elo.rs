use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{selector, text_of, trim_base};
use crate::merge::{format_percentage, parse_record};
use crate::sources::http::HttpClient;
use crate::sources::types::{SourceAdapter, SourceRecord};

pub const SOURCE: &str = "MTG Elo Project";
pub const DEFAULT_BASE_URL: &str = "https://mtgeloproject.net";
/// The site bounces profile links through several hops.
pub const MAX_REDIRECTS: usize = 10;

static NAME: Lazy<Selector> = Lazy::new(|| selector("h1"));
static NAME_FALLBACK: Lazy<Selector> = Lazy::new(|| selector(r#"[class~="text-[22pt]"]"#));
static INFO_ITEM: Lazy<Selector> = Lazy::new(|| selector(".profile-info-item"));
static INFO_LINE: Lazy<Selector> = Lazy::new(|| selector(r#"[class~="text-[18pt]"]"#));
static LABEL: Lazy<Selector> = Lazy::new(|| selector(".label"));
static VALUE: Lazy<Selector> = Lazy::new(|| selector(".value"));

pub struct MtgEloAdapter {
    client: HttpClient,
    base_url: String,
}

impl MtgEloAdapter {
    /// `client` should allow [`MAX_REDIRECTS`] hops.
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn profile_url(&self, id: &str) -> String {
        format!("{}/profile/{}", trim_base(&self.base_url), id.trim())
    }
}

#[async_trait]
impl SourceAdapter for MtgEloAdapter {
    async fn fetch(&self, id: &str) -> Result<SourceRecord> {
        let url = self.profile_url(id);
        let html = self.client.get_text(&url).await?;
        parse_profile(&html, &url, id.trim())
            .ok_or_else(|| anyhow!("no player name on MTG Elo profile {id}"))
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

/// `"Current Rating"` → `"current_rating"`
fn snake_case(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// `"Kimminich, Björn"` → `"Björn Kimminich"`
fn flip_name(name: &str) -> String {
    match name.split_once(',') {
        Some((last, first)) if !first.trim().is_empty() => {
            format!("{} {}", first.trim(), last.trim())
        }
        _ => name.to_string(),
    }
}

fn put(rec: &mut SourceRecord, label: &str, value: &str) {
    let key = match snake_case(label).as_str() {
        "" => return,
        "win_rate" => "win rate".to_string(),
        k => k.to_string(),
    };
    rec.set(&key, value);
}

/// `None` when the page has no player heading (unknown id).
pub fn parse_profile(html: &str, url: &str, id: &str) -> Option<SourceRecord> {
    let doc = Html::parse_document(html);
    let name = match doc.select(&NAME).next().map(text_of).filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => flip_name(&doc.select(&NAME_FALLBACK).next().map(text_of)?),
    };
    if name.is_empty() {
        return None;
    }

    let mut rec = SourceRecord::new(SOURCE, url).with("name", name);
    rec.data.insert_extra("player_id", id);

    for item in doc.select(&INFO_ITEM) {
        let label = item.select(&LABEL).next().map(text_of).unwrap_or_default();
        let value = item.select(&VALUE).next().map(text_of).unwrap_or_default();
        put(&mut rec, &label, &value);
    }
    for line in doc.select(&INFO_LINE) {
        if let Some((label, value)) = text_of(line).split_once(':') {
            put(&mut rec, label, value);
        }
    }

    if rec.data.win_rate.is_none() {
        if let Some(r) = rec.data.record.as_deref().and_then(parse_record) {
            if let Some(total) = r.games().filter(|t| *t > 0) {
                let pct = r.wins as f64 / total as f64 * 100.0;
                rec.set("win rate", format_percentage(pct));
            }
        }
    }

    Some(rec)
}
