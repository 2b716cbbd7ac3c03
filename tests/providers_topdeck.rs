// tests/providers_topdeck.rs
use httpmock::prelude::*;
use mtg_playerinfo::config::HttpConfig;
use mtg_playerinfo::sources::http::HttpClient;
use mtg_playerinfo::sources::providers::topdeck::{self, TopdeckAdapter};
use mtg_playerinfo::{GeneralField, SourceAdapter};
use serde_json::json;

const PROFILE_HTML: &str = include_str!("fixtures/topdeck.html");

#[test]
fn fixture_parses_profile_and_stat_elements() {
    let url = "https://topdeck.gg/profile/@k0shiii";
    let (rec, internal_id) =
        topdeck::parse_profile(PROFILE_HTML, url, "@k0shiii", "https://topdeck.gg");

    assert_eq!(internal_id.as_deref(), Some("tDk42x"));
    assert_eq!(rec.source, "Topdeck");
    assert_eq!(rec.get(GeneralField::Name), Some("Björn Kimminich"));
    assert_eq!(
        rec.get(GeneralField::Photo),
        Some("https://topdeck.gg/avatars/k0shiii.png")
    );
    assert_eq!(rec.data.extra["tournaments"], json!("7"));
    assert_eq!(rec.data.record.as_deref(), Some("15-9-1"));
    assert_eq!(rec.data.win_rate.as_deref(), Some("60.00%"));
    assert_eq!(rec.data.extra["conversion"], json!("14.29%"));
}

#[test]
fn older_stat_blocks_are_read_when_ids_are_missing() {
    let html = r#"<html><body>
        <h1>Old Layout</h1>
        <div class="stats-container">
          <div class="stat"><span class="label">Record</span><span class="value">4-2</span></div>
          <div class="stat"><span class="label">Win Rate</span><span class="value">66.67%</span></div>
        </div>
    </body></html>"#;
    let (rec, internal_id) = topdeck::parse_profile(html, "u", "@old", "https://topdeck.gg");

    assert_eq!(internal_id, None);
    assert_eq!(rec.get(GeneralField::Name), Some("Old Layout"));
    assert_eq!(rec.data.record.as_deref(), Some("4-2"));
    assert_eq!(rec.data.win_rate.as_deref(), Some("66.67%"));
}

#[test]
fn handle_is_the_fallback_name() {
    let (rec, _) = topdeck::parse_profile("<html></html>", "u", "@k0shiii", "https://topdeck.gg");
    assert_eq!(rec.get(GeneralField::Name), Some("@k0shiii"));
}

#[tokio::test]
async fn stats_endpoint_enriches_the_profile() {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/profile/@k0shiii");
            then.status(200).body(PROFILE_HTML);
        })
        .await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/profile/tDk42x/stats")
                .header("accept", "application/json");
            then.status(200).json_body(json!({
                "yearlyStats": {
                    "2024": { "overall": { "totalTournaments": 3, "wins": 9, "losses": 4, "draws": 1 } },
                    "2025": { "overall": { "totalTournaments": 2, "wins": 5, "losses": 5, "draws": 0 } }
                }
            }));
        })
        .await;

    let client = HttpClient::new(&HttpConfig::default()).unwrap();
    let adapter = TopdeckAdapter::new(client, server.base_url());
    let rec = adapter.fetch_by_id("k0shiii").await.expect("profile");

    page.assert_async().await;
    stats.assert_async().await;
    assert_eq!(rec.url, format!("{}/profile/@k0shiii", server.base_url()));
    assert_eq!(rec.data.extra["tournaments"], json!("5"));
    assert_eq!(rec.data.record.as_deref(), Some("14-9-1"));
    assert_eq!(rec.data.win_rate.as_deref(), Some("58.33%"));
}

#[tokio::test]
async fn failed_stats_keep_the_profile() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/profile/@k0shiii");
            then.status(200).body(PROFILE_HTML);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/profile/tDk42x/stats");
            then.status(503);
        })
        .await;

    let client = HttpClient::new(&HttpConfig::default()).unwrap();
    let adapter = TopdeckAdapter::new(client, server.base_url());
    let rec = adapter.fetch_by_id("@k0shiii").await.expect("profile");

    assert_eq!(rec.get(GeneralField::Name), Some("Björn Kimminich"));
    assert_eq!(rec.data.record.as_deref(), Some("15-9-1"));
}

#[tokio::test]
async fn missing_profile_becomes_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/profile/@ghost");
            then.status(404);
        })
        .await;

    let client = HttpClient::new(&HttpConfig::default()).unwrap();
    let adapter = TopdeckAdapter::new(client, server.base_url());
    assert!(adapter.fetch_by_id("ghost").await.is_none());
}
