// tests/providers_untapped.rs
use httpmock::prelude::*;
use mtg_playerinfo::config::HttpConfig;
use mtg_playerinfo::sources::http::HttpClient;
use mtg_playerinfo::sources::providers::UntappedAdapter;
use mtg_playerinfo::SourceAdapter;
use serde_json::json;

fn adapter(server: &MockServer) -> UntappedAdapter {
    let client = HttpClient::new(&HttpConfig::default()).unwrap();
    UntappedAdapter::new(client, "https://mtga.untapped.gg", server.base_url(), "ECL")
}

#[tokio::test]
async fn rank_comes_from_the_latest_match() {
    let server = MockServer::start_async().await;
    let api = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/games/users/u-123/players/ABCD/")
                .query_param("card_set", "ECL");
            then.status(200).json_body(json!([
                { "match_start": 1700000000, "friendly_ranking_class_after": "Gold", "friendly_ranking_tier_after": 3 },
                { "match_start": 1700003600, "friendly_ranking_class_after": "Platinum", "friendly_ranking_tier_after": 4 }
            ]));
        })
        .await;

    let rec = adapter(&server).fetch_by_id("u-123/ABCD").await.expect("record");

    api.assert_async().await;
    assert_eq!(rec.source, "Untapped.gg");
    assert_eq!(rec.url, "https://mtga.untapped.gg/profile/u-123/ABCD");
    assert_eq!(rec.data.extra["mtga_rank"], json!("Platinum 4"));
    assert!(rec.data.general.is_empty());
}

#[tokio::test]
async fn malformed_id_is_rejected_without_a_request() {
    let server = MockServer::start_async().await;
    let api = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!([]));
        })
        .await;

    assert!(adapter(&server).fetch_by_id("no-slash").await.is_none());
    api.assert_hits_async(0).await;
}

#[tokio::test]
async fn no_matches_becomes_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/games/users/u/players/p/");
            then.status(200).json_body(json!([]));
        })
        .await;

    let err = adapter(&server).fetch("u/p").await.unwrap_err();
    assert!(err.to_string().contains("no matches"));
}
