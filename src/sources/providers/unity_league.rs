use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{absolutize, selector, text_of, trim_base};
use crate::sources::http::HttpClient;
use crate::sources::types::{SourceAdapter, SourceRecord};

pub const SOURCE: &str = "Unity League";
pub const DEFAULT_BASE_URL: &str = "https://unityleague.gg";

static NAME: Lazy<Selector> = Lazy::new(|| selector("h1.d-inline"));
static PHOTO: Lazy<Selector> = Lazy::new(|| selector(".card-body img.img-fluid"));
static HEADER_FLAG: Lazy<Selector> = Lazy::new(|| selector(".card-body i.fi"));
static FLAG: Lazy<Selector> = Lazy::new(|| selector("i.fi"));
static DETAIL_LABEL: Lazy<Selector> = Lazy::new(|| selector("dt.small.text-muted"));
static BIO: Lazy<Selector> = Lazy::new(|| selector(".card-body > small.mt-2"));
static RANK_TABLE: Lazy<Selector> = Lazy::new(|| selector("table.table-sm"));
static TH: Lazy<Selector> = Lazy::new(|| selector("th"));
static TBODY_TD: Lazy<Selector> = Lazy::new(|| selector("tbody td"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("table.table tr"));
static TD: Lazy<Selector> = Lazy::new(|| selector("td"));

/// unityleague.gg player pages, keyed by numeric player id.
pub struct UnityLeagueAdapter {
    client: HttpClient,
    base_url: String,
}

impl UnityLeagueAdapter {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn profile_url(&self, id: &str) -> String {
        format!("{}/player/{}/", trim_base(&self.base_url), id.trim())
    }

    pub fn parse_html(&self, html: &str, url: &str) -> SourceRecord {
        parse_profile(html, url, &self.base_url)
    }
}

#[async_trait]
impl SourceAdapter for UnityLeagueAdapter {
    async fn fetch(&self, id: &str) -> Result<SourceRecord> {
        let url = self.profile_url(id);
        let html = self.client.get_text(&url).await?;
        Ok(self.parse_html(&html, &url))
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

/// `fi fi-de` → `de`
fn flag_code(el: ElementRef<'_>) -> Option<String> {
    el.value()
        .classes()
        .find_map(|c| c.strip_prefix("fi-"))
        .map(str::to_string)
}

pub fn parse_profile(html: &str, url: &str, base_url: &str) -> SourceRecord {
    let doc = Html::parse_document(html);
    let mut rec = SourceRecord::new(SOURCE, url);

    if let Some(h1) = doc.select(&NAME).next() {
        rec.set("name", text_of(h1));
    }

    // Only real uploads live under player_profile; anything else is a placeholder.
    if let Some(src) = doc
        .select(&PHOTO)
        .next()
        .and_then(|img| img.value().attr("src"))
    {
        if src.contains("player_profile") {
            rec.set("photo", absolutize(base_url, src));
        }
    }

    if let Some(code) = doc.select(&HEADER_FLAG).next().and_then(flag_code) {
        rec.set("country", code);
    }

    for dt in doc.select(&DETAIL_LABEL) {
        let label = text_of(dt);
        let key = label.trim_end_matches(':').trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        let Some(dd) = dt
            .next_siblings()
            .find_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "dd")
        else {
            continue;
        };
        let mut value = text_of(dd);
        if key == "country" {
            if let Some(code) = dd.select(&FLAG).next().and_then(flag_code) {
                value = code;
            }
        }
        rec.set(&key, value);
    }

    if let Some(bio) = doc.select(&BIO).next() {
        rec.set("bio", text_of(bio));
    }

    // "#23", "1st", "42nd" → digits only
    if let Some(table) = doc.select(&RANK_TABLE).next() {
        let headers: Vec<String> = table.select(&TH).map(text_of).collect();
        let values: Vec<String> = table.select(&TBODY_TD).map(text_of).collect();
        for (header, value) in headers.iter().zip(values.iter()) {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            if !header.is_empty() && !digits.is_empty() {
                rec.set(&format!("rank {}", header.to_lowercase()), digits);
            }
        }
    }

    let overall = doc.select(&ROW).find(|row| {
        row.select(&TD)
            .next()
            .map(|td| text_of(td) == "Overall")
            .unwrap_or(false)
    });
    if let Some(row) = overall {
        let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
        if cells.len() >= 3 {
            let record: String = text_of(cells[1])
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            rec.set("record", record);
            rec.set("win rate", text_of(cells[2]));
        }
    }

    rec
}
