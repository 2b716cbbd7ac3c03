// src/manager.rs
//! Orchestrator: runs the requested source adapters one after another in
//! priority order and merges whatever came back.

use std::collections::BTreeMap;

use anyhow::{bail, Result};

use crate::config::AppConfig;
use crate::merge::{merge, MergedProfile};
use crate::sources::http::HttpClient;
use crate::sources::providers::{
    melee, mtg_elo, topdeck, unity_league, untapped, MeleeAdapter, MtgEloAdapter, TopdeckAdapter,
    UnityLeagueAdapter, UntappedAdapter,
};
use crate::sources::types::SourceAdapter;
use crate::sources::SourceKey;

/// Identifiers the caller wants looked up, one per source at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerIds {
    ids: BTreeMap<SourceKey, String>,
}

impl PlayerIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PlayerIds::insert`].
    pub fn with(mut self, key: SourceKey, id: impl Into<String>) -> Self {
        self.insert(key, id);
        self
    }

    /// Blank identifiers are ignored.
    pub fn insert(&mut self, key: SourceKey, id: impl Into<String>) {
        let id = id.into();
        if !id.trim().is_empty() {
            self.ids.insert(key, id.trim().to_string());
        }
    }

    pub fn get(&self, key: SourceKey) -> Option<&str> {
        self.ids.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = SourceKey> + '_ {
        self.ids.keys().copied()
    }
}

pub struct PlayerInfoManager {
    adapters: BTreeMap<SourceKey, Box<dyn SourceAdapter>>,
    default_order: Vec<SourceKey>,
    verbose: bool,
}

impl PlayerInfoManager {
    /// Manager over an explicit adapter set (tests, embedding).
    pub fn with_adapters<I>(adapters: I) -> Self
    where
        I: IntoIterator<Item = (SourceKey, Box<dyn SourceAdapter>)>,
    {
        Self {
            adapters: adapters.into_iter().collect(),
            default_order: SourceKey::DEFAULT_ORDER.to_vec(),
            verbose: false,
        }
    }

    /// All five sites, wired to one shared HTTP client.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = HttpClient::new(&cfg.http)?;
        let elo_client = HttpClient::with_max_redirects(
            &cfg.http,
            cfg.http.max_redirects.max(mtg_elo::MAX_REDIRECTS),
        )?;

        let base = |site: &crate::config::SiteConfig, default: &str| {
            site.base_url.clone().unwrap_or_else(|| default.to_string())
        };
        let s = &cfg.sources;
        let mut adapters: BTreeMap<SourceKey, Box<dyn SourceAdapter>> = BTreeMap::new();
        adapters.insert(
            SourceKey::Unity,
            Box::new(UnityLeagueAdapter::new(
                client.clone(),
                base(&s.unity, unity_league::DEFAULT_BASE_URL),
            )),
        );
        adapters.insert(
            SourceKey::MtgElo,
            Box::new(MtgEloAdapter::new(
                elo_client,
                base(&s.mtgelo, mtg_elo::DEFAULT_BASE_URL),
            )),
        );
        adapters.insert(
            SourceKey::Melee,
            Box::new(MeleeAdapter::new(
                client.clone(),
                base(&s.melee, melee::DEFAULT_BASE_URL),
            )),
        );
        adapters.insert(
            SourceKey::Topdeck,
            Box::new(TopdeckAdapter::new(
                client.clone(),
                base(&s.topdeck, topdeck::DEFAULT_BASE_URL),
            )),
        );
        adapters.insert(
            SourceKey::Untapped,
            Box::new(UntappedAdapter::new(
                client,
                s.untapped
                    .base_url
                    .clone()
                    .unwrap_or_else(|| untapped::DEFAULT_BASE_URL.to_string()),
                s.untapped
                    .api_url
                    .clone()
                    .unwrap_or_else(|| untapped::DEFAULT_API_URL.to_string()),
                s.untapped.card_set.clone(),
            )),
        );

        Ok(Self::with_adapters(adapters).default_order(cfg.priority.clone()))
    }

    pub fn default_order(mut self, order: Vec<SourceKey>) -> Self {
        if !order.is_empty() {
            self.default_order = order;
        }
        self
    }

    /// Print merge notices to stderr.
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    /// Effective order: `priority` when given and non-empty, else the default. Repeats dropped.
    pub fn resolve_order(&self, priority: Option<&[SourceKey]>) -> Vec<SourceKey> {
        let order = match priority {
            Some(p) if !p.is_empty() => p,
            _ => self.default_order.as_slice(),
        };
        let mut out: Vec<SourceKey> = Vec::with_capacity(order.len());
        for k in order {
            if !out.contains(k) {
                out.push(*k);
            }
        }
        out
    }

    /// Fetch every requested source in priority order (sequentially; order is
    /// priority) and merge the results. Failed sources just drop out.
    pub async fn get_player_info(
        &self,
        ids: &PlayerIds,
        priority: Option<&[SourceKey]>,
    ) -> Result<MergedProfile> {
        if ids.is_empty() {
            bail!(
                "Please provide at least one search option (unity-id, mtgelo-id, melee-user, topdeck-handle or untapped-id)."
            );
        }

        let order = self.resolve_order(priority);
        for skipped in ids.keys().filter(|k| !order.contains(k)) {
            tracing::warn!(source = %skipped, "identifier given but source not in priority order; skipping");
        }

        let mut results = Vec::with_capacity(order.len());
        for key in order {
            let Some(id) = ids.get(key) else {
                continue;
            };
            let Some(adapter) = self.adapters.get(&key) else {
                tracing::warn!(source = %key, "no adapter registered; skipping");
                continue;
            };
            tracing::info!(source = adapter.name(), id, "fetching");
            results.push(adapter.fetch_by_id(id).await);
        }

        let fetched = results.iter().filter(|r| r.is_some()).count();
        tracing::info!(requested = results.len(), fetched, "merging");

        Ok(merge(results, self.verbose))
    }
}
