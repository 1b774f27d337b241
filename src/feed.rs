//! Infinite-scroll accumulator.
//!
//! Grows an append-only result list one page at a time, driven by a
//! near-end signal from list navigation. At most one fetch is in flight;
//! re-entrant signals while fetching are ignored. Switching the browsing
//! key resets the list and bumps the generation counter so a response from
//! the old key is discarded on arrival.
//!
//! Pages for a fixed query are assumed disjoint, so appended items are not
//! de-duplicated (the catalog's pagination behaves that way in practice).

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::types::{Category, Movie, ResultsPage, Selector, PAGE_CAP};

pub struct Feed {
    pub items: Vec<Movie>,
    pub next_page: u32,
    pub exhausted: bool,
    pub fetching: bool,
    pub error: Option<String>,
    pub total_results: u64,
    selector: Selector,
    load_id: u64,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Feed {
    pub fn new(catalog: Arc<dyn Catalog>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            exhausted: false,
            fetching: false,
            error: None,
            total_results: 0,
            selector: Selector::Category(Category::default()),
            load_id: 0,
            catalog,
            action_tx,
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Start over under a new browsing key. Any in-flight response now
    /// carries a stale generation and will be dropped when it arrives.
    pub fn reset(&mut self, selector: Selector) {
        self.items.clear();
        self.next_page = 1;
        self.exhausted = false;
        self.fetching = false;
        self.error = None;
        self.total_results = 0;
        self.selector = selector;
        self.load_id += 1;
    }

    /// Fetch the next page. A no-op while a fetch is in flight or once the
    /// catalog is exhausted, so the near-end signal can fire as often as it
    /// likes.
    pub fn load_more(&mut self) {
        if self.fetching || self.exhausted {
            return;
        }
        self.fetching = true;
        self.error = None;

        let load_id = self.load_id;
        let selector = self.selector.clone();
        let page = self.next_page;
        let catalog = Arc::clone(&self.catalog);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match catalog.fetch_page(&selector, page).await {
                Ok(results) => {
                    tx.send(Action::FeedPageLoaded { results, load_id }).ok();
                }
                Err(e) => {
                    tx.send(Action::FeedPageFailed {
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
            tracing::debug!(load_id, current = self.load_id, "discarding stale feed page");
            return;
        }
        self.fetching = false;
        self.error = None;

        if results.items.is_empty() {
            self.exhausted = true;
            return;
        }

        self.items.extend(results.items);
        self.total_results = results.total_results;
        self.next_page += 1;
        if self.next_page > results.total_pages.min(PAGE_CAP) {
            self.exhausted = true;
        }
    }

    /// Partial success is preserved: the accumulated items stay, `next_page`
    /// does not move, and a retry re-issues the same page.
    pub fn on_failed(&mut self, message: String, load_id: u64) {
        if load_id != self.load_id {
            return;
        }
        self.fetching = false;
        self.error = Some(message);
    }
}
