// src/config/mod.rs
pub mod app;

pub use app::{load, load_from, AppConfig, HttpConfig, SiteConfig, SourcesConfig, UntappedConfig};
