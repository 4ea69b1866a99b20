use crate::api::ApiResult;
use crate::domain::pagination::{Page, PageRequest, PaginationMeta};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// How a list store talks to the backend. Implemented per entity so the store
/// itself stays generic over what it pages through.
#[async_trait::async_trait]
pub trait ListSource: Send + Sync {
    type Item: Clone + Send + Sync;

    async fn fetch_all(&self) -> ApiResult<Vec<Self::Item>>;

    async fn fetch_page(&self, req: PageRequest) -> ApiResult<Page<Self::Item>>;

    /// Error message used when the failure itself carries no text.
    fn fallback_error(&self, paginated: bool) -> &'static str;
}

#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    pub page_size: u32,
    pub auto_load: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            auto_load: false,
        }
    }
}

#[derive(Debug)]
struct ListState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    current_page: u32,
    meta: Option<PaginationMeta>,
}

impl<T> ListState<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            meta: None,
        }
    }
}

/// Paginated list state for one view: items, loading/error flags, and the
/// server-reported pagination metadata.
///
/// Methods take `&self` so a store can be shared behind an `Arc`. Overlapping
/// fetches are resolved latest-intent-wins: every request takes a sequence
/// number before suspending, and a response is dropped whole if a newer
/// request was issued while it was in flight. A stale response does not touch
/// `loading` either; the newest request owns the flag.
pub struct ListStore<S: ListSource> {
    pub(crate) source: S,
    page_size: u32,
    seq: AtomicU64,
    state: RwLock<ListState<S::Item>>,
}

impl<S: ListSource> ListStore<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            seq: AtomicU64::new(0),
            state: RwLock::new(ListState::new()),
        }
    }

    /// Wrap in an `Arc`, optionally kicking off a fire-and-forget initial
    /// paginated fetch. Construction does not await it.
    pub fn into_shared(self, auto_load: bool) -> Arc<Self>
    where
        S: 'static,
    {
        let store = Arc::new(self);
        if auto_load {
            let initial = Arc::clone(&store);
            tokio::spawn(async move {
                initial.fetch_page(PageRequest::default()).await;
            });
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, ListState<S::Item>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState<S::Item>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.write();
        state.loading = true;
        state.error = None;
        seq
    }

    fn is_latest(&self, seq: u64) -> bool {
        seq == self.seq.load(Ordering::SeqCst)
    }

    /// Replace the items with the full unpaginated collection. On failure the
    /// previous items stay visible and only `error` changes.
    pub async fn fetch_all(&self) {
        let seq = self.begin();
        let result = self.source.fetch_all().await;

        if !self.is_latest(seq) {
            return;
        }
        let mut state = self.write();
        match result {
            Ok(items) => state.items = items,
            Err(err) => {
                tracing::warn!(error = %err, "list fetch failed");
                state.error = Some(err.message_or(self.source.fallback_error(false)));
            }
        }
        state.loading = false;
    }

    /// Fetch one page. Overrides win over the store's current page and
    /// configured page size. The page actually stored comes from the returned
    /// metadata, not from the request.
    pub async fn fetch_page(&self, overrides: PageRequest) {
        let req = PageRequest {
            page: Some(overrides.page.unwrap_or_else(|| self.current_page())),
            page_size: Some(overrides.page_size.unwrap_or(self.page_size)),
        };

        let seq = self.begin();
        let result = self.source.fetch_page(req).await;

        if !self.is_latest(seq) {
            return;
        }
        let mut state = self.write();
        match result {
            Ok(page) => {
                state.items = page.data;
                state.current_page = page.meta.page;
                state.meta = Some(page.meta);
            }
            Err(err) => {
                tracing::warn!(error = %err, page = req.page, "paginated list fetch failed");
                state.error = Some(err.message_or(self.source.fallback_error(true)));
            }
        }
        state.loading = false;
    }

    /// Navigate to a page. Out-of-range pages (including anything before the
    /// first successful paginated fetch) are silently ignored.
    pub async fn go_to_page(&self, page: u32) {
        if page < 1 || page > self.total_pages() {
            return;
        }
        self.fetch_page(PageRequest::page(page)).await;
    }

    pub async fn next_page(&self) {
        if self.has_next() {
            self.go_to_page(self.current_page() + 1).await;
        }
    }

    pub async fn previous_page(&self) {
        if self.has_previous() {
            self.go_to_page(self.current_page() - 1).await;
        }
    }

    /// Replay whichever mode last populated the store: paginated when
    /// metadata is present, the full collection otherwise.
    pub async fn refresh(&self) {
        if self.meta().is_some() {
            self.fetch_page(PageRequest::page(self.current_page())).await;
        } else {
            self.fetch_all().await;
        }
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.read().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.read().current_page
    }

    pub fn meta(&self) -> Option<PaginationMeta> {
        self.read().meta.clone()
    }

    pub fn has_items(&self) -> bool {
        !self.read().items.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        self.read().meta.as_ref().map_or(0, |m| m.total_pages)
    }

    pub fn total_items(&self) -> i64 {
        self.read().meta.as_ref().map_or(0, |m| m.total_items)
    }

    pub fn has_next(&self) -> bool {
        self.read().meta.as_ref().is_some_and(|m| m.has_next)
    }

    pub fn has_previous(&self) -> bool {
        self.read().meta.as_ref().is_some_and(|m| m.has_previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    enum Script<T> {
        Ready(ApiResult<T>),
        /// Held until the sender side releases it, for interleaving tests.
        Gated(oneshot::Receiver<()>, ApiResult<T>),
    }

    #[derive(Default)]
    struct MockSource {
        all: Mutex<VecDeque<Script<Vec<String>>>>,
        pages: Mutex<VecDeque<Script<Page<String>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn push_all(&self, result: ApiResult<Vec<String>>) {
            self.all.lock().unwrap().push_back(Script::Ready(result));
        }

        fn push_page(&self, result: ApiResult<Page<String>>) {
            self.pages.lock().unwrap().push_back(Script::Ready(result));
        }

        fn push_gated_page(&self, result: ApiResult<Page<String>>) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.pages
                .lock()
                .unwrap()
                .push_back(Script::Gated(rx, result));
            tx
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn run<T>(script: Option<Script<T>>) -> ApiResult<T> {
            match script {
                Some(Script::Ready(result)) => result,
                Some(Script::Gated(rx, result)) => {
                    let _ = rx.await;
                    result
                }
                None => Err(ApiError::Api("unscripted call".to_string())),
            }
        }
    }

    #[async_trait::async_trait]
    impl ListSource for MockSource {
        type Item = String;

        async fn fetch_all(&self) -> ApiResult<Vec<String>> {
            self.calls.lock().unwrap().push("all".to_string());
            let script = self.all.lock().unwrap().pop_front();
            Self::run(script).await
        }

        async fn fetch_page(&self, req: PageRequest) -> ApiResult<Page<String>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("page {:?}", req.page));
            let script = self.pages.lock().unwrap().pop_front();
            Self::run(script).await
        }

        fn fallback_error(&self, paginated: bool) -> &'static str {
            if paginated {
                "Failed to fetch paginated items"
            } else {
                "Failed to fetch items"
            }
        }
    }

    fn meta(page: u32, total_pages: u32, has_next: bool, has_previous: bool) -> PaginationMeta {
        PaginationMeta {
            page,
            page_size: 20,
            total_items: i64::from(total_pages) * 20,
            total_pages,
            has_next,
            has_previous,
        }
    }

    fn page_of(items: &[&str], m: PaginationMeta) -> Page<String> {
        Page {
            data: items.iter().map(|s| s.to_string()).collect(),
            meta: m,
        }
    }

    fn store() -> ListStore<MockSource> {
        ListStore::new(MockSource::default(), 20)
    }

    #[tokio::test]
    async fn current_page_comes_from_server_meta_not_request() {
        let store = store();
        // Server clamps the requested page 9 down to its last page, 3.
        store.source.push_page(Ok(page_of(&["a"], meta(3, 3, false, true))));

        store.fetch_page(PageRequest::page(9)).await;

        assert_eq!(store.current_page(), 3);
        assert_eq!(store.total_pages(), 3);
        assert!(!store.loading());
        assert!(store.has_items());
    }

    #[tokio::test]
    async fn go_to_page_is_a_noop_before_first_load() {
        let store = store();
        store.go_to_page(1).await;
        assert!(store.source.calls().is_empty());
    }

    #[tokio::test]
    async fn go_to_page_bounds_check_against_total_pages() {
        let store = store();
        store.source.push_page(Ok(page_of(&["a"], meta(1, 5, true, false))));
        store.fetch_page(PageRequest::default()).await;

        store.go_to_page(0).await;
        store.go_to_page(6).await;
        assert_eq!(store.source.calls().len(), 1);

        store.source.push_page(Ok(page_of(&["c"], meta(3, 5, true, true))));
        store.go_to_page(3).await;
        assert_eq!(store.source.calls().last().unwrap(), "page Some(3)");
        assert_eq!(store.current_page(), 3);
    }

    #[tokio::test]
    async fn next_and_previous_respect_meta_flags() {
        let store = store();
        store.source.push_page(Ok(page_of(&["a"], meta(1, 2, true, false))));
        store.fetch_page(PageRequest::default()).await;

        // has_previous is false on page 1.
        store.previous_page().await;
        assert_eq!(store.source.calls().len(), 1);

        store.source.push_page(Ok(page_of(&["b"], meta(2, 2, false, true))));
        store.next_page().await;
        assert_eq!(store.current_page(), 2);

        // has_next is false on the last page.
        store.next_page().await;
        assert_eq!(store.source.calls().len(), 2);
    }

    #[tokio::test]
    async fn refresh_dispatches_on_pagination_mode() {
        let store = store();
        store.source.push_all(Ok(vec!["x".to_string()]));
        store.refresh().await;
        assert_eq!(store.source.calls(), vec!["all"]);

        store.source.push_page(Ok(page_of(&["a"], meta(2, 3, true, true))));
        store.fetch_page(PageRequest::page(2)).await;

        store.source.push_page(Ok(page_of(&["a"], meta(2, 3, true, true))));
        store.refresh().await;
        assert_eq!(store.source.calls().last().unwrap(), "page Some(2)");
    }

    #[tokio::test]
    async fn failure_keeps_items_and_sets_error() {
        let store = store();
        store.source.push_all(Ok(vec!["kept".to_string()]));
        store.fetch_all().await;

        store
            .source
            .push_all(Err(ApiError::Transport("connection refused".to_string())));
        store.fetch_all().await;

        assert_eq!(store.items(), vec!["kept".to_string()]);
        assert_eq!(store.error().as_deref(), Some("connection refused"));
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn empty_error_message_falls_back_to_fixed_string() {
        let store = store();
        store.source.push_page(Err(ApiError::Transport(String::new())));
        store.fetch_page(PageRequest::default()).await;

        assert_eq!(store.error().as_deref(), Some("Failed to fetch paginated items"));
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let store = Arc::new(store());
        let release = store
            .source
            .push_gated_page(Ok(page_of(&["stale"], meta(1, 5, true, false))));
        store.source.push_page(Ok(page_of(&["fresh"], meta(2, 5, true, true))));

        let first = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch_page(PageRequest::page(1)).await })
        };
        tokio::task::yield_now().await;

        // Second request supersedes the gated one.
        store.fetch_page(PageRequest::page(2)).await;
        assert_eq!(store.items(), vec!["fresh".to_string()]);

        release.send(()).unwrap();
        first.await.unwrap();

        assert_eq!(store.items(), vec!["fresh".to_string()]);
        assert_eq!(store.current_page(), 2);
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn auto_load_issues_initial_paginated_fetch() {
        let source = MockSource::default();
        source.push_page(Ok(page_of(&["a"], meta(1, 1, false, false))));
        let store = ListStore::new(source, 20).into_shared(true);

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        assert_eq!(store.source.calls().len(), 1);
        assert!(store.has_items());
    }
}
