//! Card hydration
//!
//! Resolves each card's icon URL (cache first, then the Modrinth API), swaps it
//! into the card's logo and records whether the icon actually loaded. Every
//! failure degrades to "keep the fallback logo"; nothing here returns an error.

use crate::config::HydratorConfig;
use crate::error::Result;
use crate::modrinth::ModrinthClient;
use crate::page::{Card, Page};
use crate::probe::{ImageLoad, ImageProbe};
use crate::store::{IconCache, KeyValueStore};

/// What happened to a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOutcome {
    /// No slug or no logo image; the card was not touched
    Skipped,
    /// No icon URL could be resolved; fallback logo kept
    Unavailable,
    /// Icon URL set and the icon loaded
    Loaded,
    /// Icon URL resolved but the icon failed to load; cache entry evicted
    LoadFailed,
}

/// Per-run tally of card outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub cards: usize,
    pub skipped: usize,
    pub unavailable: usize,
    pub loaded: usize,
    pub load_failed: usize,
}

impl HydrationReport {
    fn record(&mut self, outcome: CardOutcome) {
        self.cards += 1;
        match outcome {
            CardOutcome::Skipped => self.skipped += 1,
            CardOutcome::Unavailable => self.unavailable += 1,
            CardOutcome::Loaded => self.loaded += 1,
            CardOutcome::LoadFailed => self.load_failed += 1,
        }
    }
}

/// Icon hydrator over a key-value store `S` and an image probe `P`
#[derive(Debug)]
pub struct Hydrator<S, P> {
    client: ModrinthClient,
    cache: IconCache<S>,
    probe: P,
}

impl<S: KeyValueStore, P: ImageProbe> Hydrator<S, P> {
    /// Build a hydrator with its own HTTP client
    pub fn new(config: &HydratorConfig, store: S, probe: P) -> Result<Self> {
        let client = ModrinthClient::new(config)?;
        Ok(Self::with_client(
            client,
            IconCache::new(store, config.cache_namespace.clone()),
            probe,
        ))
    }

    pub fn with_client(client: ModrinthClient, cache: IconCache<S>, probe: P) -> Self {
        Self {
            client,
            cache,
            probe,
        }
    }

    pub fn cache(&self) -> &IconCache<S> {
        &self.cache
    }

    pub fn into_store(self) -> S {
        self.cache.into_store()
    }

    /// Icon URL for `slug`: the cached one if present, otherwise one API lookup.
    ///
    /// A fresh URL is written to the cache before it is returned. Any lookup
    /// failure (status, network, timeout, body) yields `None`.
    pub async fn resolve_icon_url(&mut self, slug: &str) -> Option<String> {
        if slug.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(slug) {
            log::debug!("Icon cache hit for {}", slug);
            return Some(cached);
        }

        log::debug!("Icon cache miss for {}, fetching from Modrinth", slug);
        let project = match self.client.fetch_project(slug).await {
            Ok(project) => project,
            Err(e) => {
                log::debug!("No icon for {}: {}", slug, e);
                return None;
            }
        };

        let icon_url = project.icon_url()?.to_string();
        if let Err(e) = self.cache.insert(slug, &icon_url) {
            log::debug!("Could not cache icon for {}: {}", slug, e);
        }
        Some(icon_url)
    }

    /// Swap the card's logo for its project icon.
    ///
    /// On a failed load the cached URL is evicted and the logo's `src` from
    /// before its first hydration is put back.
    pub async fn hydrate_card(&mut self, card: &Card<'_>) -> CardOutcome {
        let Some(slug) = card.slug() else {
            return CardOutcome::Skipped;
        };
        if card.logo().is_none() {
            return CardOutcome::Skipped;
        }

        let Some(icon_url) = self.resolve_icon_url(&slug).await else {
            return CardOutcome::Unavailable;
        };

        card.set_logo_src(&icon_url);

        match self.probe.load(&icon_url).await {
            ImageLoad::Loaded => {
                card.mark_has_icon();
                CardOutcome::Loaded
            }
            ImageLoad::Failed => {
                if let Err(e) = self.cache.evict(&slug) {
                    log::debug!("Could not evict icon for {}: {}", slug, e);
                }
                card.restore_logo_src();
                CardOutcome::LoadFailed
            }
        }
    }

    /// Hydrate every card on the page, one at a time in document order.
    pub async fn run(&mut self, page: &Page) -> HydrationReport {
        let mut report = HydrationReport::default();

        let cards = page.cards();
        if cards.is_empty() {
            return report;
        }

        log::info!("Hydrating {} cards", cards.len());
        for card in &cards {
            let outcome = self.hydrate_card(card).await;
            log::debug!("Card {:?}: {:?}", card.slug(), outcome);
            report.record(outcome);
        }

        report
    }
}

#[cfg(test)]
#[path = "hydrator_tests.rs"]
mod tests;
