// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-bounded cache of the venue's knowledge tables.
//!
//! Reads go through an [`ArcSwapOption`] and never block on each other. When
//! the snapshot is missing or older than the TTL, one caller takes the
//! refresh gate and reloads all four tables; everyone else waiting on the
//! gate re-checks freshness and reuses that result. A failed refresh leaves
//! the previous snapshot in place and the caller never sees the error.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use venuebot_config::model::CacheConfig;
use venuebot_core::traits::store::TabularStore;
use venuebot_core::types::{
    BUFFET_TABLE, BuffetTier, EXTRAS_TABLE, ExtraItem, FACTS_TABLE, Fact, PACKAGES_TABLE,
    PackageRecord,
};
use venuebot_core::VenueError;

use crate::clock::Clock;
use crate::facts::{NOT_FOUND, PhoneFixup};
use crate::render::render_snapshot;

/// A point-in-time copy of the knowledge tables.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Facts in sheet order; a key repeated in the sheet keeps its last value.
    pub facts: Vec<Fact>,
    pub packages: Vec<PackageRecord>,
    pub buffet: Vec<BuffetTier>,
    pub extras: Vec<ExtraItem>,
    /// Venue-local time of the refresh. `None` for the empty placeholder.
    pub refreshed_at: Option<NaiveDateTime>,
    pub(crate) loaded_at: Option<Instant>,
}

impl Snapshot {
    /// Raw fact value, without the phone fix-up.
    pub fn fact(&self, key: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.is_some_and(|at| at.elapsed() <= ttl)
    }
}

/// Cache in front of the knowledge tables of a [`TabularStore`].
pub struct KnowledgeCache {
    store: Arc<dyn TabularStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    fixup: PhoneFixup,
    current: ArcSwapOption<Snapshot>,
    refresh_gate: Mutex<()>,
}

impl KnowledgeCache {
    pub fn new(store: Arc<dyn TabularStore>, clock: Arc<dyn Clock>, config: &CacheConfig) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::from_secs(config.ttl_secs),
            fixup: PhoneFixup::from_config(config),
            current: ArcSwapOption::empty(),
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current snapshot, refreshed first if it is missing or stale.
    ///
    /// Without any successful refresh so far, an empty snapshot is returned.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        if let Some(snap) = self.fresh() {
            return snap;
        }

        let _gate = self.refresh_gate.lock().await;
        // Another caller may have refreshed while this one waited.
        if let Some(snap) = self.fresh() {
            return snap;
        }

        match self.load().await {
            Ok(snap) => {
                let snap = Arc::new(snap);
                self.current.store(Some(Arc::clone(&snap)));
                snap
            }
            Err(e) => {
                warn!(error = %e, "knowledge refresh failed, serving previous snapshot");
                self.current.load_full().unwrap_or_default()
            }
        }
    }

    /// Looks up a fact with the phone fix-up applied; unknown keys give `"Not Found"`.
    pub async fn fact(&self, key: &str) -> String {
        let snap = self.snapshot().await;
        match snap.fact(key) {
            Some(value) => self.fixup.apply(key, value),
            None => NOT_FOUND.to_string(),
        }
    }

    /// Renders the current snapshot as knowledge text for the model.
    pub async fn render(&self) -> String {
        let snap = self.snapshot().await;
        render_snapshot(&snap, &self.fixup)
    }

    /// Reloads immediately regardless of age, reporting failures to the caller.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, VenueError> {
        let _gate = self.refresh_gate.lock().await;
        let snap = Arc::new(self.load().await?);
        self.current.store(Some(Arc::clone(&snap)));
        Ok(snap)
    }

    fn fresh(&self) -> Option<Arc<Snapshot>> {
        self.current
            .load_full()
            .filter(|snap| snap.is_fresh(self.ttl))
    }

    /// Fetches all four tables; any failure discards the whole attempt.
    async fn load(&self) -> Result<Snapshot, VenueError> {
        let started = Instant::now();
        let (facts, packages, buffet, extras) = futures::try_join!(
            self.store.fetch_rows(FACTS_TABLE),
            self.store.fetch_rows(PACKAGES_TABLE),
            self.store.fetch_rows(BUFFET_TABLE),
            self.store.fetch_rows(EXTRAS_TABLE),
        )?;

        let snapshot = Snapshot {
            facts: dedupe_facts(facts.iter().filter_map(Fact::from_row)),
            packages: packages.iter().map(PackageRecord::from_row).collect(),
            buffet: buffet.iter().map(BuffetTier::from_row).collect(),
            extras: extras.iter().map(ExtraItem::from_row).collect(),
            refreshed_at: Some(self.clock.now()),
            loaded_at: Some(Instant::now()),
        };

        info!(
            facts = snapshot.facts.len(),
            packages = snapshot.packages.len(),
            buffet = snapshot.buffet.len(),
            extras = snapshot.extras.len(),
            "knowledge refreshed"
        );
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "knowledge load timing");
        Ok(snapshot)
    }
}

/// Keeps first-seen order while letting a later duplicate overwrite the value.
fn dedupe_facts(facts: impl Iterator<Item = Fact>) -> Vec<Fact> {
    let mut out: Vec<Fact> = Vec::new();
    for fact in facts {
        match out.iter_mut().find(|f| f.key == fact.key) {
            Some(existing) => existing.value = fact.value,
            None => out.push(fact),
        }
    }
    out
}
