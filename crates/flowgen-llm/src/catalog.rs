//! Time-boxed cache of the remote model catalog plus the autocomplete
//! matcher that ranks it.
//!
//! The cache exists to keep autocomplete keystrokes from refetching the full
//! catalog. It degrades, never fails: when the catalog cannot be fetched the
//! caller gets the static featured list instead, and a still-valid cache is
//! never touched by a failed refresh.

use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

use crate::client::{ApiClient, Model};
use crate::{FEATURED_MODELS, MODEL_CACHE_TTL};

/// Autocomplete results are truncated to this many candidates.
pub const MAX_AUTOCOMPLETE_RESULTS: usize = 50;

/// Presentation triple handed back to the runtime's autocomplete widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Offline stand-in for the catalog: the featured ids, with the segment
/// after the final `/` as the display name.
static FALLBACK_MODELS: Lazy<Arc<Vec<Model>>> = Lazy::new(|| {
    Arc::new(
        FEATURED_MODELS
            .iter()
            .map(|id| Model {
                id: id.to_string(),
                name: id.rsplit('/').next().unwrap_or(id).to_string(),
            })
            .collect(),
    )
});

struct CachedModels {
    entries: Arc<Vec<Model>>,
    fetched_at: Instant,
}

pub struct ModelCatalog {
    client: Arc<ApiClient>,
    ttl: Duration,
    // Both fields are only ever replaced together, after a successful fetch.
    cache: RwLock<Option<CachedModels>>,
}

impl ModelCatalog {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_ttl(client, MODEL_CACHE_TTL)
    }

    /// Tests inject a short TTL so expiry does not need real five-minute
    /// waits.
    pub fn with_ttl(client: Arc<ApiClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            cache: RwLock::new(None),
        }
    }

    fn cached(&self) -> Option<Arc<Vec<Model>>> {
        let guard = self.cache.read().ok()?;
        guard
            .as_ref()
            .filter(|c| !c.entries.is_empty() && c.fetched_at.elapsed() < self.ttl)
            .map(|c| Arc::clone(&c.entries))
    }

    /// Current catalog: cached entries while valid, a fresh fetch when
    /// expired, the featured fallback when the fetch fails. Infallible.
    ///
    /// Two calls within the TTL return identical sequences regardless of
    /// intervening failures. Concurrent refreshes of an expired cache race
    /// benignly; the last successful writer wins.
    pub async fn models(&self, api_key: &str) -> Arc<Vec<Model>> {
        if let Some(entries) = self.cached() {
            return entries;
        }

        match self.client.list_models(api_key).await {
            Ok(list) => {
                let entries = Arc::new(list);
                if let Ok(mut guard) = self.cache.write() {
                    *guard = Some(CachedModels {
                        entries: Arc::clone(&entries),
                        fetched_at: Instant::now(),
                    });
                }
                entries
            }
            Err(e) => {
                // Do not touch the cache: a failed refresh is not an empty
                // catalog, and must not poison a still-valid one.
                tracing::warn!(error = %e, "model catalog refresh failed, serving featured fallback");
                Arc::clone(&FALLBACK_MODELS)
            }
        }
    }

    /// Ranked, truncated candidates for a free-text autocomplete query.
    pub async fn search(&self, api_key: &str, query: &str) -> Vec<ModelCandidate> {
        let models = self.models(api_key).await;
        rank_models(&models, query)
    }
}

fn featured_rank(id: &str) -> Option<usize> {
    FEATURED_MODELS.iter().position(|f| *f == id)
}

/// Filter and rank the catalog against a query.
///
/// A model matches when its id or display name contains the query
/// case-insensitively; the empty query matches everything. Featured models
/// sort ahead of everything else — they are curated for relevance and must
/// dominate regardless of alphabetical position — with ties in curation
/// order. Non-featured matches follow, ordered by case-folded display name.
pub fn rank_models(models: &[Model], query: &str) -> Vec<ModelCandidate> {
    let needle = query.to_lowercase();

    let mut hits: Vec<&Model> = models
        .iter()
        .filter(|m| {
            needle.is_empty()
                || m.id.to_lowercase().contains(&needle)
                || m.name.to_lowercase().contains(&needle)
        })
        .collect();

    hits.sort_by(|a, b| match (featured_rank(&a.id), featured_rank(&b.id)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    hits.truncate(MAX_AUTOCOMPLETE_RESULTS);
    hits.into_iter()
        .map(|m| ModelCandidate {
            id: m.id.clone(),
            name: m.name.clone(),
            description: m.id.clone(),
        })
        .collect()
}
