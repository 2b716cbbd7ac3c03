use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{selector, text_of, trim_base};
use crate::sources::http::HttpClient;
use crate::sources::social::{extract_handle, platform_name};
use crate::sources::types::{SourceAdapter, SourceRecord};

pub const SOURCE: &str = "Melee";
pub const DEFAULT_BASE_URL: &str = "https://melee.gg";

static NAME: Lazy<Selector> = Lazy::new(|| selector(r#"span[style*="font-size: xx-large"]"#));
static PRONOUNS: Lazy<Selector> =
    Lazy::new(|| selector(".profile-details span.text-muted.mr-2"));
static BIO: Lazy<Selector> = Lazy::new(|| selector(r#".profile-details div[style*="max-width: 75%"]"#));
static SOCIAL_LINK: Lazy<Selector> = Lazy::new(|| selector(".social-link"));

/// melee.gg profiles, keyed by username.
/// Photos are skipped: the site does not serve them to anonymous requests.
pub struct MeleeAdapter {
    client: HttpClient,
    base_url: String,
}

impl MeleeAdapter {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn profile_url(&self, username: &str) -> String {
        format!(
            "{}/Profile/Index/{}",
            trim_base(&self.base_url),
            username.trim()
        )
    }
}

#[async_trait]
impl SourceAdapter for MeleeAdapter {
    async fn fetch(&self, username: &str) -> Result<SourceRecord> {
        let url = self.profile_url(username);
        let html = self.client.get_text(&url).await?;
        Ok(parse_profile(&html, &url, username.trim()))
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}

pub fn parse_profile(html: &str, url: &str, username: &str) -> SourceRecord {
    let doc = Html::parse_document(html);

    let name = doc
        .select(&NAME)
        .next()
        .map(text_of)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| username.to_string());
    let mut rec = SourceRecord::new(SOURCE, url).with("name", name);

    if let Some(pronouns) = doc.select(&PRONOUNS).map(text_of).find(|t| t.contains('/')) {
        rec.set("pronouns", pronouns);
    }
    if let Some(bio) = doc.select(&BIO).next() {
        rec.set("bio", text_of(bio));
    }

    for link in doc.select(&SOCIAL_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if let (Some(platform), Some(handle)) = (platform_name(href), extract_handle(href)) {
            rec.set(&platform, handle);
        }
    }

    rec
}
