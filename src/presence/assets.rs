//! Hero artwork fetched from the public assets API

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Preferred image variants, best first.
const IMAGE_KEYS: &[&str] = &["icon_hero_card", "icon_image_small", "minimap_image"];

/// Read-only view of remote hero artwork used by the presentation builder.
pub trait HeroAssets {
    /// Image URL for a hero id, class name or display name, if one is known.
    fn hero_image(&self, hero: &str) -> Option<String>;
}

/// No remote artwork; the builder falls back to the static table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl HeroAssets for NoAssets {
    fn hero_image(&self, _hero: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct RemoteHero {
    pub id: u32,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: HashMap<String, serde_json::Value>,
}

impl RemoteHero {
    fn best_image(&self) -> Option<&str> {
        IMAGE_KEYS
            .iter()
            .find_map(|key| self.images.get(*key).and_then(|v| v.as_str()))
            .filter(|url| !url.is_empty())
    }
}

/// Cache of hero image URLs, written by the poller and read by the driver.
#[derive(Debug, Clone, Default)]
pub struct HeroAssetCache {
    images: Arc<RwLock<HashMap<String, String>>>,
}

impl HeroAssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the cache contents. An empty hero list leaves the cache untouched.
    pub fn replace(&self, heroes: &[RemoteHero]) {
        let mut images = HashMap::new();
        for hero in heroes {
            let Some(url) = hero.best_image() else {
                continue;
            };
            images.insert(hero.id.to_string(), url.to_string());
            if !hero.class_name.is_empty() {
                images.insert(hero.class_name.to_ascii_lowercase(), url.to_string());
            }
            if !hero.name.is_empty() {
                images.insert(hero.name.to_ascii_lowercase(), url.to_string());
            }
        }

        if images.is_empty() {
            return;
        }

        match self.images.write() {
            Ok(mut guard) => *guard = images,
            Err(poisoned) => *poisoned.into_inner() = images,
        }
    }
}

impl HeroAssets for HeroAssetCache {
    fn hero_image(&self, hero: &str) -> Option<String> {
        let key = hero.trim().to_ascii_lowercase();
        self.images.read().ok()?.get(&key).cloned()
    }
}

pub async fn fetch_heroes(client: &reqwest::Client, url: &str) -> Option<Vec<RemoteHero>> {
    let response = client
        .get(url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;
    response.json().await.ok()
}

/// Refreshes `cache` from `url` every `interval` until `cancel` fires.
pub fn spawn_asset_poller(
    cache: HeroAssetCache,
    url: String,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = reqwest::Client::new();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match fetch_heroes(&client, &url).await {
                        Some(heroes) => {
                            cache.replace(&heroes);
                            tracing::debug!("Hero asset cache refreshed ({} entries)", cache.len());
                        }
                        None => tracing::debug!("Hero asset fetch from {} failed, keeping cache", url),
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heroes() -> Vec<RemoteHero> {
        serde_json::from_str(
            r#"[
                {
                    "id": 6,
                    "class_name": "hero_atlas",
                    "name": "Abrams",
                    "images": {
                        "icon_image_small": "https://cdn.example/abrams_small.png",
                        "icon_hero_card": "https://cdn.example/abrams_card.png",
                        "weird": 5
                    }
                },
                { "id": 99, "class_name": "hero_noart", "name": "No Art", "images": {} }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn cache_answers_by_id_class_and_name() {
        let cache = HeroAssetCache::new();
        cache.replace(&heroes());

        let card = Some("https://cdn.example/abrams_card.png".to_string());
        assert_eq!(cache.hero_image("6"), card);
        assert_eq!(cache.hero_image("hero_atlas"), card);
        assert_eq!(cache.hero_image("ABRAMS"), card);
        assert_eq!(cache.hero_image("hero_noart"), None);
    }

    #[test]
    fn empty_refresh_keeps_previous_entries() {
        let cache = HeroAssetCache::new();
        cache.replace(&heroes());
        cache.replace(&[]);
        assert!(!cache.is_empty());
    }

    #[test]
    fn no_assets_never_answers() {
        assert_eq!(NoAssets.hero_image("6"), None);
    }
}
