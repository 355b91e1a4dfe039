use rankguess_core::{Item, ItemId};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "uri", rename_all = "snake_case")]
pub enum Thumbnail {
    Remote(String),
    Placeholder,
}

pub fn thumbnail_uri(base: &str, id: ItemId) -> String {
    format!("{}/{}.webp", base.trim_end_matches('/'), id)
}

/// Best guess without touching the network: id 0 never has artwork.
pub fn thumbnail_for(base: &str, item: &Item) -> Thumbnail {
    if item.id.0 == 0 {
        return Thumbnail::Placeholder;
    }
    Thumbnail::Remote(thumbnail_uri(base, item.id))
}

/// Checks the image with a HEAD request. Any failure, including a 404, gives `Placeholder`.
pub fn resolve_thumbnail(base: &str, item: &Item, timeout_ms: u64) -> Thumbnail {
    let Thumbnail::Remote(uri) = thumbnail_for(base, item) else {
        return Thumbnail::Placeholder;
    };
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            tracing::debug!(error = %err, "thumbnail client unavailable");
            return Thumbnail::Placeholder;
        }
    };
    match client.head(&uri).send().and_then(|resp| resp.error_for_status()) {
        Ok(_) => Thumbnail::Remote(uri),
        Err(err) => {
            tracing::debug!(item = %item.name, error = %err, "thumbnail missing");
            Thumbnail::Placeholder
        }
    }
}

/// Gradient shown in place of missing artwork.
pub fn placeholder_svg() -> &'static str {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="480" height="270" viewBox="0 0 480 270"><defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="#4a4a8a"/><stop offset="100%" stop-color="#2a2a5a"/></linearGradient></defs><rect width="480" height="270" fill="url(#g)"/></svg>"##
}
