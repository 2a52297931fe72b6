pub mod dashboard;
pub mod education_levels;
pub mod hr;
pub mod invoices;
pub mod reports;
pub mod resource;
pub mod roles;
pub mod settings;
pub mod students;
pub mod system_reset;
pub mod teachers;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::forms::ValidationError;

pub use resource::{Resource, ResourcePage};

/// What a page currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PageState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Empty,
    Failed(String),
}

impl<T> PageState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            PageState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Decides whether a successful fetch renders as data or as the empty state.
pub trait PageData {
    fn is_empty(&self) -> bool;
}

impl<T> PageData for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

/// Generation counter giving latest-wins semantics to overlapping loads.
#[derive(Clone, Debug, Default)]
pub struct LatestOnly {
    current: Arc<AtomicU64>,
}

#[derive(Clone, Debug)]
pub struct Ticket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl LatestOnly {
    pub fn issue(&self) -> Ticket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            generation,
            current: self.current.clone(),
        }
    }
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

fn settle<T: PageData>(result: Result<T, ApiError>) -> PageState<T> {
    match result {
        Ok(data) if data.is_empty() => PageState::Empty,
        Ok(data) => PageState::Ready(data),
        Err(e) => PageState::Failed(e.to_string()),
    }
}

async fn begin<T>(state: &RwLock<PageState<T>>, ticket: &Ticket) {
    let mut guard = state.write().await;
    if ticket.is_current() {
        *guard = PageState::Loading;
    }
}

async fn apply<T>(
    name: &str,
    state: &RwLock<PageState<T>>,
    ticket: &Ticket,
    next: PageState<T>,
) -> bool {
    let mut guard = state.write().await;
    // checked under the write lock so a newer load cannot interleave
    if !ticket.is_current() {
        debug!(page = name, "discarding superseded response");
        return false;
    }
    if let PageState::Failed(message) = &next {
        warn!(page = name, error = %message, "load failed");
    }
    *guard = next;
    true
}

/// Page-local state with latest-wins loading.
pub struct Page<T> {
    name: &'static str,
    state: Arc<RwLock<PageState<T>>>,
    latest: LatestOnly,
    inflight: Mutex<Option<AbortHandle>>,
}

impl<T> Page<T>
where
    T: PageData + Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(PageState::Idle)),
            latest: LatestOnly::default(),
            inflight: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn state(&self) -> PageState<T> {
        self.state.read().await.clone()
    }

    pub async fn data(&self) -> Option<T> {
        self.state.read().await.data().cloned()
    }

    /// Runs `fetch` and stores its outcome unless a newer load started in
    /// the meantime. Returns the state after the load.
    pub async fn load<F>(&self, fetch: F) -> PageState<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let ticket = self.latest.issue();
        begin(&self.state, &ticket).await;
        let next = settle(fetch.await);
        apply(self.name, &self.state, &ticket, next).await;
        self.state().await
    }

    /// Like [`Page::load`] but runs in the background, aborting the load
    /// it supersedes.
    pub fn spawn_load<F>(&self, fetch: F) -> JoinHandle<bool>
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let ticket = self.latest.issue();
        let state = self.state.clone();
        let name = self.name;
        let handle = tokio::spawn(async move {
            begin(&state, &ticket).await;
            let next = settle(fetch.await);
            apply(name, &state, &ticket, next).await
        });
        if let Ok(mut slot) = self.inflight.lock() {
            if let Some(previous) = slot.replace(handle.abort_handle()) {
                previous.abort();
            }
        }
        handle
    }
}

/// Stands in for an interactive yes/no confirmation.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no {noun} with id {id}")]
    NotFound { noun: &'static str, id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn only_the_newest_ticket_is_current() {
        let latest = LatestOnly::default();
        let first = latest.issue();
        assert!(first.is_current());
        let second = latest.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[tokio::test]
    async fn empty_collection_settles_as_empty() {
        let page: Page<Vec<u32>> = Page::new("numbers");
        assert_eq!(page.state().await, PageState::Idle);
        let state = page.load(async { Ok(Vec::new()) }).await;
        assert_eq!(state, PageState::Empty);
        let state = page.load(async { Ok(vec![1, 2]) }).await;
        assert_eq!(state.data(), Some(&vec![1, 2]));
    }

    #[tokio::test]
    async fn failure_is_recorded_with_message() {
        let page: Page<Vec<u32>> = Page::new("numbers");
        let state = page
            .load(async {
                Err(ApiError::Timeout {
                    endpoint: "students.php".to_string(),
                })
            })
            .await;
        assert_eq!(state.error(), Some("request to students.php timed out"));
    }

    #[tokio::test]
    async fn slower_earlier_load_cannot_overwrite_newer_one() {
        let page: Page<Vec<u32>> = Page::new("tabs");
        let slow = page.load(async {
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok(vec![1])
        });
        let fast = page.load(async { Ok(vec![2]) });
        tokio::join!(slow, fast);
        assert_eq!(page.data().await, Some(vec![2]));
    }

    #[tokio::test]
    async fn spawned_load_aborts_the_previous_one() {
        let page: Page<Vec<u32>> = Page::new("tabs");
        let first = page.spawn_load(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![1])
        });
        let second = page.spawn_load(async { Ok(vec![2]) });
        assert!(second.await.unwrap());
        assert!(first.await.unwrap_err().is_cancelled());
        assert_eq!(page.data().await, Some(vec![2]));
    }
}
