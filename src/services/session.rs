use crate::core::{AdvanceResult, MatchResult, Matcher, ProfileCollector};
use crate::models::{BrandFilterSet, ProfileField, UserProfile};
use crate::services::catalog::CatalogStore;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors from the session store
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found or expired: {0}")]
    NotFound(String),
}

/// Errors from computing matches
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("vehicle catalog is not loaded")]
    CatalogUnavailable,
}

/// One user's advisor state: collector, brand sets, and a shared handle
/// to the catalog.
///
/// This is the surface the UI layer drives. Malformed user input never
/// errors here; `compute_matches` against a missing catalog does, since
/// that is a broken system precondition rather than a user mistake.
#[derive(Debug, Clone)]
pub struct AdvisorSession {
    collector: ProfileCollector,
    brands: BrandFilterSet,
    matcher: Matcher,
    catalog: Arc<CatalogStore>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl AdvisorSession {
    pub fn new(catalog: Arc<CatalogStore>, matcher: Matcher, collector: ProfileCollector) -> Self {
        Self {
            collector,
            brands: BrandFilterSet::new(),
            matcher,
            catalog,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    pub fn submit_answer(&mut self, raw_text: &str) -> AdvanceResult {
        self.collector.submit_answer(raw_text)
    }

    pub fn request_unlock(&mut self, field: ProfileField) -> bool {
        self.collector.request_unlock(field)
    }

    pub fn is_complete(&self) -> bool {
        self.collector.is_complete()
    }

    pub fn get_profile(&self) -> &UserProfile {
        self.collector.profile()
    }

    /// The question the conversation should ask now, if any.
    pub fn pending_question(&self) -> Option<ProfileField> {
        self.collector.pending_question()
    }

    pub fn set_blocked_brands<I, S>(&mut self, brands: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.brands.set_blocked(brands);
    }

    pub fn set_preferred_brands<I, S>(&mut self, brands: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.brands.set_preferred(brands);
    }

    pub fn brand_filters(&self) -> &BrandFilterSet {
        &self.brands
    }

    /// Rank the catalog against the current profile state.
    pub fn compute_matches(&self, top_n: usize) -> Result<MatchResult, MatchError> {
        if self.catalog.is_empty() {
            return Err(MatchError::CatalogUnavailable);
        }
        Ok(self
            .matcher
            .find_matches(self.get_profile(), &self.brands, self.catalog.records(), top_n))
    }

    /// Drop all answers and brand filters, keeping the catalog handle.
    pub fn restart(&mut self) {
        self.collector.restart();
        self.brands.clear();
    }
}

/// TTL-bounded in-memory store of live sessions.
///
/// Sessions are ephemeral by design: they expire after the configured
/// idle time and are never persisted. Each session sits behind its own
/// lock, so concurrent requests for different sessions never contend.
pub struct SessionStore {
    sessions: moka::future::Cache<String, Arc<Mutex<AdvisorSession>>>,
}

impl SessionStore {
    pub fn new(max_sessions: u64, ttl_secs: u64) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(Duration::from_secs(ttl_secs))
            .build();

        Self { sessions }
    }

    /// Insert a new session and return its generated id.
    pub async fn create(&self, session: AdvisorSession) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Arc::new(Mutex::new(session)))
            .await;
        tracing::debug!("Created session {}", id);
        id
    }

    pub async fn get(&self, id: &str) -> Result<Arc<Mutex<AdvisorSession>>, SessionError> {
        self.sessions
            .get(id)
            .await
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub async fn remove(&self, id: &str) {
        self.sessions.invalidate(id).await;
        tracing::debug!("Removed session {}", id);
    }

    pub fn live_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}
