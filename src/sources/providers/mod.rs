// src/sources/providers/mod.rs
pub mod melee;
pub mod mtg_elo;
pub mod topdeck;
pub mod unity_league;
pub mod untapped;

use scraper::{ElementRef, Selector};
use url::Url;

pub use melee::MeleeAdapter;
pub use mtg_elo::MtgEloAdapter;
pub use topdeck::TopdeckAdapter;
pub use unity_league::UnityLeagueAdapter;
pub use untapped::UntappedAdapter;

/// Compile a selector literal. Only used for constants inside `Lazy` statics.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Element text, trimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Resolve a possibly relative `src`/`href` against the site base.
pub(crate) fn absolutize(base_url: &str, src: &str) -> String {
    if src.starts_with("http") {
        return src.to_string();
    }
    Url::parse(base_url)
        .and_then(|b| b.join(src))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{}{}", base_url.trim_end_matches('/'), src))
}

pub(crate) fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
