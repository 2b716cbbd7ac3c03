// tests/manager_orchestration.rs
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use mtg_playerinfo::{
    GeneralField, PlayerIds, PlayerInfoManager, SourceAdapter, SourceKey, SourceRecord,
};

type CallLog = Arc<Mutex<Vec<String>>>;

struct MockAdapter {
    name: &'static str,
    name_field: Option<&'static str>,
    calls: CallLog,
}

#[async_trait::async_trait]
impl SourceAdapter for MockAdapter {
    async fn fetch(&self, id: &str) -> Result<SourceRecord> {
        self.calls.lock().unwrap().push(format!("{}:{id}", self.name));
        let Some(name) = self.name_field else {
            bail!("{} unavailable", self.name);
        };
        Ok(SourceRecord::new(self.name, format!("https://{}/{id}", self.name))
            .with("name", name)
            .with("record", "1-1"))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

fn manager(calls: &CallLog, failing: &[SourceKey]) -> PlayerInfoManager {
    let mk = |key: SourceKey, name: &'static str, value: &'static str| -> (SourceKey, Box<dyn SourceAdapter>) {
        let name_field = (!failing.contains(&key)).then_some(value);
        let adapter: Box<dyn SourceAdapter> = Box::new(MockAdapter {
            name,
            name_field,
            calls: calls.clone(),
        });
        (key, adapter)
    };
    PlayerInfoManager::with_adapters([
        mk(SourceKey::Unity, "unity", "Unity Name"),
        mk(SourceKey::MtgElo, "mtgelo", "Elo Name"),
        mk(SourceKey::Melee, "melee", "Melee Name"),
        mk(SourceKey::Topdeck, "topdeck", "Topdeck Name"),
        mk(SourceKey::Untapped, "untapped", "Untapped Name"),
    ])
}

fn calls_of(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn default_order_puts_unity_first() {
    let log = CallLog::default();
    let m = manager(&log, &[]);
    let ids = PlayerIds::new()
        .with(SourceKey::Melee, "koshiii")
        .with(SourceKey::Unity, "16215");

    let profile = m.get_player_info(&ids, None).await.unwrap();

    assert_eq!(calls_of(&log), vec!["unity:16215", "melee:koshiii"]);
    assert_eq!(profile.general.get(GeneralField::Name), Some("Unity Name"));
    assert_eq!(profile.sources.len(), 2);
    assert_eq!(profile.general.win_rate.as_deref(), Some("50.00%"));
}

#[tokio::test]
async fn priority_override_changes_the_winner() {
    let log = CallLog::default();
    let m = manager(&log, &[]);
    let ids = PlayerIds::new()
        .with(SourceKey::Melee, "koshiii")
        .with(SourceKey::Unity, "16215");

    let priority = [SourceKey::Melee, SourceKey::Unity];
    let profile = m.get_player_info(&ids, Some(&priority[..])).await.unwrap();

    assert_eq!(calls_of(&log), vec!["melee:koshiii", "unity:16215"]);
    assert_eq!(profile.general.get(GeneralField::Name), Some("Melee Name"));
}

#[tokio::test]
async fn sources_without_identifier_are_not_called() {
    let log = CallLog::default();
    let m = manager(&log, &[]);
    let ids = PlayerIds::new().with(SourceKey::Topdeck, "@k0shiii");

    m.get_player_info(&ids, None).await.unwrap();

    assert_eq!(calls_of(&log), vec!["topdeck:@k0shiii"]);
}

#[tokio::test]
async fn failing_source_drops_out_and_next_one_wins() {
    let log = CallLog::default();
    let m = manager(&log, &[SourceKey::Unity]);
    let ids = PlayerIds::new()
        .with(SourceKey::Unity, "1")
        .with(SourceKey::MtgElo, "2")
        .with(SourceKey::Melee, "3");

    let profile = m.get_player_info(&ids, None).await.unwrap();

    assert_eq!(calls_of(&log).len(), 3);
    assert_eq!(profile.general.get(GeneralField::Name), Some("Elo Name"));
    assert!(!profile.sources.contains_key("unity"));
    assert_eq!(profile.sources.len(), 2);
}

#[tokio::test]
async fn all_sources_failing_gives_empty_profile() {
    let log = CallLog::default();
    let m = manager(&log, &[SourceKey::Unity, SourceKey::Melee]);
    let ids = PlayerIds::new()
        .with(SourceKey::Unity, "1")
        .with(SourceKey::Melee, "3");

    let profile = m.get_player_info(&ids, None).await.unwrap();

    assert!(profile.general.is_empty());
    assert!(profile.sources.is_empty());
    let v = serde_json::to_value(&profile).unwrap();
    assert_eq!(v, serde_json::json!({ "general": {}, "sources": {} }));
}

#[tokio::test]
async fn no_identifiers_is_a_usage_error() {
    let log = CallLog::default();
    let m = manager(&log, &[]);

    let err = m.get_player_info(&PlayerIds::new(), None).await.unwrap_err();

    assert!(err.to_string().contains("at least one search option"));
    assert!(calls_of(&log).is_empty());
}

#[tokio::test]
async fn blank_identifiers_count_as_missing() {
    let ids = PlayerIds::new()
        .with(SourceKey::Unity, "   ")
        .with(SourceKey::Melee, "");
    assert!(ids.is_empty());

    let log = CallLog::default();
    assert!(manager(&log, &[]).get_player_info(&ids, None).await.is_err());
}

#[tokio::test]
async fn repeated_priority_keys_fetch_once() {
    let log = CallLog::default();
    let m = manager(&log, &[]);
    let ids = PlayerIds::new().with(SourceKey::Melee, "koshiii");

    let priority = [SourceKey::Melee, SourceKey::Melee];
    m.get_player_info(&ids, Some(&priority[..])).await.unwrap();

    assert_eq!(calls_of(&log), vec!["melee:koshiii"]);
}

#[tokio::test]
async fn source_left_out_of_priority_is_skipped() {
    let log = CallLog::default();
    let m = manager(&log, &[]);
    let ids = PlayerIds::new()
        .with(SourceKey::Melee, "koshiii")
        .with(SourceKey::Unity, "16215");

    let priority = [SourceKey::Melee];
    let profile = m.get_player_info(&ids, Some(&priority[..])).await.unwrap();

    assert_eq!(calls_of(&log), vec!["melee:koshiii"]);
    assert_eq!(profile.sources.len(), 1);
}

#[test]
fn configured_default_order_is_used() {
    let log = CallLog::default();
    let m = manager(&log, &[]).default_order(vec![SourceKey::Topdeck, SourceKey::Unity]);
    assert_eq!(m.resolve_order(None), vec![SourceKey::Topdeck, SourceKey::Unity]);
    assert_eq!(m.resolve_order(Some(&[][..])), vec![SourceKey::Topdeck, SourceKey::Unity]);
    assert_eq!(
        m.resolve_order(Some(&[SourceKey::Melee][..])),
        vec![SourceKey::Melee]
    );
}
