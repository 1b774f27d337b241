//! Paged browsing controller.
//!
//! Owns the (search, page) query state for the paged view, issues catalog
//! fetches for it, and reconciles responses against the request generation
//! that produced them. Fetches run on background tasks and report back over
//! the action channel; a response whose `load_id` no longer matches the
//! current generation belongs to a superseded query and is dropped, so a
//! slow page can never clobber the results of a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::types::{Category, Movie, QueryState, ResultsPage, Selector, PAGE_CAP};
use crate::window::{compute_window, PagerEntry};

pub struct Browse {
    pub query: QueryState,
    pub category: Category,
    pub movies: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
    pub loading: bool,
    pub error: Option<String>,
    load_id: u64,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Browse {
    pub fn new(catalog: Arc<dyn Catalog>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            query: QueryState::default(),
            category: Category::default(),
            movies: Vec::new(),
            total_pages: 0,
            total_results: 0,
            loading: false,
            error: None,
            load_id: 0,
            catalog,
            action_tx,
        }
    }

    /// What is currently being browsed: an active search wins over the
    /// category buckets.
    pub fn selector(&self) -> Selector {
        if self.query.search.is_empty() {
            Selector::Category(self.category)
        } else {
            Selector::Search(self.query.search.clone())
        }
    }

    /// Pager entries for the current position.
    pub fn pager_window(&self) -> Vec<PagerEntry> {
        compute_window(self.query.page, self.total_pages, 1, 1)
    }

    /// Highest page that may be requested: the known bound when one exists,
    /// the hard catalog cap otherwise.
    pub fn page_cap(&self) -> u32 {
        if self.total_pages == 0 {
            PAGE_CAP
        } else {
            self.total_pages.min(PAGE_CAP)
        }
    }

    pub fn set_search(&mut self, term: &str) {
        if self.query.search == term && self.query.page == 1 {
            return;
        }
        self.query.search = term.to_string();
        self.query.page = 1;
        self.fetch();
    }

    pub fn set_page(&mut self, page: u32) {
        let page = page.clamp(1, self.page_cap());
        if page == self.query.page {
            return;
        }
        self.query.page = page;
        self.fetch();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.query.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.query.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        if self.total_pages > 0 {
            self.set_page(self.page_cap());
        }
    }

    pub fn set_category(&mut self, category: Category) {
        if self.category == category {
            return;
        }
        self.category = category;
        self.query.page = 1;
        self.fetch();
    }

    /// Restore a position (startup `--link` / `--search` / `--page`).
    pub fn restore(&mut self, category: Category, query: QueryState) {
        self.category = category;
        self.query = query;
        self.query.page = self.query.page.clamp(1, PAGE_CAP);
    }

    /// Re-issue the fetch for the current position.
    pub fn refresh(&mut self) {
        self.fetch();
    }

    fn fetch(&mut self) {
        self.loading = true;
        self.load_id += 1;
        let load_id = self.load_id;
        let selector = self.selector();
        let page = self.query.page;
        let catalog = Arc::clone(&self.catalog);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match catalog.fetch_page(&selector, page).await {
                Ok(results) => {
                    tx.send(Action::PageLoaded { results, load_id }).ok();
                }
                Err(e) => {
                    tx.send(Action::PageFailed {
                        message: e.to_string(),
                        load_id,
                    })
                    .ok();
                }
            }
        });
    }

    pub fn on_loaded(&mut self, results: ResultsPage, load_id: u64) {
        if load_id != self.load_id {
            tracing::debug!(load_id, current = self.load_id, "discarding stale page");
            return;
        }
        tracing::debug!(page = results.page, total = results.total_pages, "page loaded");
        self.loading = false;
        self.error = None;
        self.movies = results.items;
        self.total_pages = results.total_pages.min(PAGE_CAP);
        self.total_results = results.total_results;
    }

    pub fn on_failed(&mut self, message: String, load_id: u64) {
        if load_id != self.load_id {
            return;
        }
        self.loading = false;
        // No stale items alongside an error.
        self.movies.clear();
        self.total_pages = 0;
        self.total_results = 0;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{movie, page_of, ScriptedCatalog};

    fn harness() -> (Browse, Arc<ScriptedCatalog>, mpsc::UnboundedReceiver<Action>) {
        let catalog = Arc::new(ScriptedCatalog::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let browse = Browse::new(catalog.clone(), tx);
        (browse, catalog, rx)
    }

    async fn next_action(rx: &mut mpsc::UnboundedReceiver<Action>) -> Action {
        rx.recv().await.expect("action channel closed")
    }

    fn apply(browse: &mut Browse, action: Action) {
        match action {
            Action::PageLoaded { results, load_id } => browse.on_loaded(results, load_id),
            Action::PageFailed { message, load_id } => browse.on_failed(message, load_id),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    fn one_movie_page(id: u64, title: &str) -> ResultsPage {
        ResultsPage {
            items: vec![movie(id, title)],
            page: 1,
            total_pages: 1,
            total_results: 1,
        }
    }

    #[tokio::test]
    async fn new_search_resets_page_and_supersedes_inflight_responses() {
        let (mut browse, catalog, mut rx) = harness();
        catalog.stage(
            Selector::Search("dune".to_string()),
            1,
            one_movie_page(1, "Dune"),
        );
        catalog.stage(
            Selector::Category(Category::Popular),
            1,
            one_movie_page(2, "Popular One"),
        );

        browse.set_page(3); // popular page 3: not staged, will fail late
        browse.set_search("dune");
        assert_eq!(browse.query.page, 1);
        browse.set_search("");
        assert_eq!(browse.query.page, 1);

        // Three fetches completed; only the last generation may apply.
        for _ in 0..3 {
            let action = next_action(&mut rx).await;
            apply(&mut browse, action);
        }

        assert_eq!(browse.movies.len(), 1);
        assert_eq!(browse.movies[0].title, "Popular One");
        assert!(browse.error.is_none());
        assert!(!browse.loading);
    }

    #[tokio::test]
    async fn late_response_for_an_older_page_is_discarded() {
        let (mut browse, catalog, mut rx) = harness();
        catalog.stage(
            Selector::Category(Category::Popular),
            2,
            page_of(2, 20, 10),
        );
        catalog.stage(
            Selector::Category(Category::Popular),
            3,
            page_of(3, 20, 10),
        );

        browse.set_page(2);
        browse.set_page(3);

        let first = next_action(&mut rx).await;
        let second = next_action(&mut rx).await;
        let mut responses = [first, second];
        responses.sort_by_key(|action| match action {
            Action::PageLoaded { load_id, .. } => *load_id,
            other => panic!("unexpected action: {:?}", other),
        });
        let [for_page_2, for_page_3] = responses;

        // The newer response lands first; the older one must not win.
        apply(&mut browse, for_page_3);
        apply(&mut browse, for_page_2);

        assert_eq!(browse.query.page, 3);
        assert_eq!(browse.movies[0].title, "Movie 3-0");
    }

    #[tokio::test]
    async fn set_page_clamps_against_the_known_bound() {
        let (mut browse, catalog, mut rx) = harness();
        catalog.stage(Selector::Category(Category::Popular), 1, page_of(1, 20, 30));
        catalog.stage(
            Selector::Category(Category::Popular),
            30,
            page_of(30, 20, 30),
        );

        browse.refresh();
        let action = next_action(&mut rx).await;
        apply(&mut browse, action);
        assert_eq!(browse.total_pages, 30);

        browse.set_page(700);
        assert_eq!(browse.query.page, 30);
        let action = next_action(&mut rx).await;
        apply(&mut browse, action);
        assert_eq!(browse.movies[0].title, "Movie 30-0");
    }

    #[tokio::test]
    async fn unknown_bound_clamps_to_the_catalog_cap() {
        let (mut browse, _catalog, _rx) = harness();
        browse.set_page(9999);
        assert_eq!(browse.query.page, PAGE_CAP);
    }

    #[tokio::test]
    async fn displayed_total_is_capped() {
        let (mut browse, catalog, mut rx) = harness();
        catalog.stage(
            Selector::Category(Category::Popular),
            1,
            page_of(1, 20, 48_000),
        );
        browse.refresh();
        let action = next_action(&mut rx).await;
        apply(&mut browse, action);
        assert_eq!(browse.total_pages, PAGE_CAP);
    }

    #[tokio::test]
    async fn failure_empties_results_and_a_retry_recovers() {
        let (mut browse, catalog, mut rx) = harness();
        catalog.stage(Selector::Category(Category::Popular), 1, page_of(1, 20, 10));

        browse.refresh();
        let action = next_action(&mut rx).await;
        apply(&mut browse, action);
        assert_eq!(browse.movies.len(), 20);

        browse.set_page(2); // not staged yet
        let action = next_action(&mut rx).await;
        apply(&mut browse, action);
        assert!(browse.movies.is_empty());
        assert!(browse.error.is_some());

        catalog.stage(Selector::Category(Category::Popular), 2, page_of(2, 20, 10));
        browse.refresh();
        let action = next_action(&mut rx).await;
        apply(&mut browse, action);
        assert!(browse.error.is_none());
        assert_eq!(browse.movies.len(), 20);
        assert_eq!(browse.query.page, 2);
    }

    #[tokio::test]
    async fn setting_the_same_page_issues_no_fetch() {
        let (mut browse, catalog, _rx) = harness();
        browse.set_page(1);
        assert_eq!(catalog.fetches(), 0);
    }

    #[tokio::test]
    async fn category_switch_resets_to_the_first_page() {
        let (mut browse, catalog, mut rx) = harness();
        catalog.stage(
            Selector::Category(Category::TopRated),
            1,
            page_of(1, 20, 5),
        );
        browse.set_page(4); // popular page 4: not staged, fails late
        browse.set_category(Category::TopRated);
        assert_eq!(browse.query.page, 1);

        // The page-4 failure is stale by the time it arrives and is dropped.
        for _ in 0..2 {
            let action = next_action(&mut rx).await;
            apply(&mut browse, action);
        }
        assert_eq!(browse.movies.len(), 20);
        assert!(browse.error.is_none());
    }
}
