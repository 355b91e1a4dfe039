use crate::fallback::{fallback_items, video_for_name, watch_url};
use crate::schema::{Catalog, GameConfig, Item, LevelRecord};
use crate::source::{CatalogSource, FallbackSource, FileSource, HttpSource};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const API_URL_ENV: &str = "RANKGUESS_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    Source(String),
    Fallback { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub origin: CatalogOrigin,
}

impl LoadReport {
    pub fn used_fallback(&self) -> bool {
        matches!(self.origin, CatalogOrigin::Fallback { .. })
    }
}

/// Never fails: any retrieval problem, or an empty result, yields the built-in list.
pub fn load_catalog(source: &dyn CatalogSource) -> Catalog {
    load_catalog_report(source).catalog
}

pub fn load_catalog_report(source: &dyn CatalogSource) -> LoadReport {
    let described = source.describe();
    tracing::info!(source = %described, "loading level list");
    let records = match source.fetch() {
        Ok(records) if records.is_empty() => {
            return fallback_report(format!("{described} returned no levels"));
        }
        Ok(records) => records,
        Err(err) => {
            return fallback_report(format!("{described}: {err}"));
        }
    };
    let received = records.len();
    let items = normalize_records(records);
    if items.is_empty() {
        return fallback_report(format!(
            "{described}: none of {received} levels had a name, id and position"
        ));
    }
    tracing::info!(levels = items.len(), received, "level list ready");
    LoadReport {
        catalog: Catalog::new(items),
        origin: CatalogOrigin::Source(described),
    }
}

fn fallback_report(reason: String) -> LoadReport {
    tracing::warn!(%reason, "using built-in level list");
    LoadReport {
        catalog: Catalog::new(fallback_items()),
        origin: CatalogOrigin::Fallback { reason },
    }
}

/// Drops unranked records, orders by rank (stable for ties), attaches a video link
/// and skips anything without an id or a usable name.
pub fn normalize_records(records: Vec<LevelRecord>) -> Vec<Item> {
    let mut ranked: Vec<(i64, LevelRecord)> = records
        .into_iter()
        .filter_map(|record| record.position.map(|rank| (rank, record)))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked
        .into_iter()
        .filter_map(|(rank, record)| {
            let id = record.level_id?;
            let name = record.name.filter(|name| !name.trim().is_empty())?;
            let video = resolve_video(record.video.as_deref(), &name);
            Some(Item {
                id: rankguess_core::ItemId(id),
                name,
                rank,
                video,
            })
        })
        .collect()
}

/// A full YouTube link wins, then an 11-character video id, then the name table.
/// The reference is used exactly as given, without trimming.
pub fn resolve_video(raw: Option<&str>, name: &str) -> Option<String> {
    if let Some(raw) = raw {
        if raw.contains("youtube.com") || raw.contains("youtu.be") {
            return Some(raw.to_string());
        }
        if is_video_id(raw) {
            return Some(watch_url(raw));
        }
    }
    video_for_name(name)
}

fn is_video_id(value: &str) -> bool {
    value.chars().count() == 11
}

/// Reads `config.json` from `dir`. A missing file means defaults; a broken one is an error.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let config =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

/// `RANKGUESS_API_URL` replaces the configured list endpoint when set and non-empty.
pub fn apply_env_overrides(mut config: GameConfig) -> GameConfig {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_url = url.trim().to_string();
        }
    }
    config
}

/// Offline beats a local file, which beats the configured HTTP endpoint.
pub fn select_source(
    config: &GameConfig,
    offline: bool,
    catalog_path: Option<&PathBuf>,
) -> Box<dyn CatalogSource + Send> {
    if offline {
        return Box::new(FallbackSource);
    }
    if let Some(path) = catalog_path {
        return Box::new(FileSource::new(path));
    }
    Box::new(HttpSource::new(
        config.api_url.clone(),
        config.fetch_timeout_ms,
    ))
}
