use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::browse::Browse;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::event::Event;
use crate::feed::Feed;
use crate::link;
use crate::types::{Category, MovieDetail, QueryState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse, // category/search results, paged or infinite
    Detail, // single movie
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Paged,
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Rows from the end of the feed at which the next page is requested.
/// Plays the role of the sentinel element in a scrolling layout.
const NEAR_END_MARGIN: usize = 5;

pub struct App {
    pub screen: Screen,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,

    pub browse: Browse,
    pub feed: Feed,
    pub browse_index: usize,
    pub feed_index: usize,

    /// Live search buffer; applied to `browse.query.search` after the
    /// debounce window (or immediately on Enter).
    pub search_input: String,

    pub detail: Option<MovieDetail>,
    pub detail_loading: bool,
    pub scroll_offset: usize,

    /// Shareable position string, re-derived on every transition.
    pub position: String,
    pub profile_name: Option<String>,
    pub poster_size: String,
    pub notice: Option<String>,
    pub should_quit: bool,

    debounce_ms: u64,
    debounce_seq: u64,
    detail_load_id: u64,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        action_tx: mpsc::UnboundedSender<Action>,
        config: &Config,
    ) -> Self {
        let browse = Browse::new(Arc::clone(&catalog), action_tx.clone());
        let feed = Feed::new(Arc::clone(&catalog), action_tx.clone());

        Self {
            screen: Screen::Browse,
            view_mode: ViewMode::default(),
            input_mode: InputMode::default(),
            browse,
            feed,
            browse_index: 0,
            feed_index: 0,
            search_input: String::new(),
            detail: None,
            detail_loading: false,
            scroll_offset: 0,
            position: String::new(),
            profile_name: config.profile.name.clone(),
            poster_size: config.poster_size.clone(),
            notice: None,
            should_quit: false,
            debounce_ms: config.debounce_ms,
            debounce_seq: 0,
            detail_load_id: 0,
            catalog,
            action_tx,
        }
    }

    /// Seed the starting position from the CLI before the first fetch.
    pub fn restore(&mut self, category: Category, query: QueryState) {
        self.browse.restore(category, query);
        self.search_input = self.browse.query.search.clone();
        self.position = link::encode(&self.browse.query);
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Refresh,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.input_mode == InputMode::Search {
            return match key.code {
                KeyCode::Esc => Action::ExitSearchMode,
                KeyCode::Enter => Action::SearchConfirm,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Char(c) => Action::SearchInput(c),
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.screen == Screen::Browse {
                    Action::Quit
                } else {
                    Action::Back
                }
            }
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') => match (self.screen, self.view_mode) {
                (Screen::Browse, ViewMode::Paged) => Action::FirstPage,
                _ => Action::GoToTop,
            },
            KeyCode::Char('G') => match (self.screen, self.view_mode) {
                (Screen::Browse, ViewMode::Paged) => Action::LastPage,
                _ => Action::GoToBottom,
            },
            KeyCode::Char('h') | KeyCode::Left => Action::PrevPage,
            KeyCode::Char('l') | KeyCode::Right => Action::NextPage,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Char('c') => Action::ClearSearch,
            KeyCode::Char('v') | KeyCode::Tab => Action::ToggleViewMode,
            KeyCode::Char('1') => Action::SwitchCategory(Category::Popular),
            KeyCode::Char('2') => Action::SwitchCategory(Category::TopRated),
            KeyCode::Char('3') => Action::SwitchCategory(Category::Upcoming),
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('y') => Action::YankLink,
            KeyCode::Char('o') => Action::OpenInBrowser,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.notice.is_some() && !matches!(action, Action::None) {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::Browse => {
                    self.should_quit = true;
                }
                Screen::Detail => {
                    self.screen = Screen::Browse;
                    self.detail = None;
                    self.scroll_offset = 0;
                }
            },

            Action::ScrollUp => self.scroll_up(),
            Action::ScrollDown => self.scroll_down(),
            Action::GoToTop => match self.screen {
                Screen::Detail => self.scroll_offset = 0,
                Screen::Browse => match self.view_mode {
                    ViewMode::Paged => self.browse_index = 0,
                    ViewMode::Infinite => self.feed_index = 0,
                },
            },
            Action::GoToBottom => match self.screen {
                Screen::Detail => {}
                Screen::Browse => match self.view_mode {
                    ViewMode::Paged => {
                        self.browse_index = self.browse.movies.len().saturating_sub(1);
                    }
                    ViewMode::Infinite => {
                        self.feed_index = self.feed.items.len().saturating_sub(1);
                        self.maybe_load_more();
                    }
                },
            },
            Action::Select => self.open_selected(),

            Action::NextPage => {
                if self.paged_browse() {
                    self.browse.next_page();
                    self.browse_index = 0;
                }
            }
            Action::PrevPage => {
                if self.paged_browse() {
                    self.browse.prev_page();
                    self.browse_index = 0;
                }
            }
            Action::FirstPage => {
                if self.paged_browse() {
                    self.browse.first_page();
                    self.browse_index = 0;
                }
            }
            Action::LastPage => {
                if self.paged_browse() {
                    self.browse.last_page();
                    self.browse_index = 0;
                }
            }

            Action::SwitchCategory(category) => {
                self.browse.set_category(category);
                self.browse_index = 0;
                self.sync_feed();
            }
            Action::ToggleViewMode => {
                self.view_mode = match self.view_mode {
                    ViewMode::Paged => ViewMode::Infinite,
                    ViewMode::Infinite => ViewMode::Paged,
                };
                self.sync_feed();
            }

            Action::EnterSearchMode => {
                self.input_mode = InputMode::Search;
                self.search_input = self.browse.query.search.clone();
            }
            Action::ExitSearchMode => {
                self.input_mode = InputMode::Normal;
                self.debounce_seq += 1; // a pending timer is now stale
            }
            Action::SearchInput(c) => {
                self.search_input.push(c);
                self.arm_debounce();
            }
            Action::SearchBackspace => {
                if self.search_input.pop().is_some() {
                    self.arm_debounce();
                }
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                self.debounce_seq += 1;
                self.apply_search();
            }
            Action::SearchDebounced(seq) => {
                // Only the timer armed by the latest keystroke applies.
                if seq == self.debounce_seq {
                    self.apply_search();
                }
            }
            Action::ClearSearch => {
                self.search_input.clear();
                self.debounce_seq += 1;
                self.apply_search();
            }

            Action::Refresh => match (self.screen, self.view_mode) {
                (Screen::Browse, ViewMode::Paged) => self.browse.refresh(),
                (Screen::Browse, ViewMode::Infinite) => self.feed.load_more(),
                (Screen::Detail, _) => {}
            },

            Action::PageLoaded { results, load_id } => {
                self.browse.on_loaded(results, load_id);
                self.browse_index = self
                    .browse_index
                    .min(self.browse.movies.len().saturating_sub(1));
            }
            Action::PageFailed { message, load_id } => {
                self.browse.on_failed(message, load_id);
                self.browse_index = 0;
            }
            Action::FeedPageLoaded { results, load_id } => {
                self.feed.on_loaded(results, load_id);
            }
            Action::FeedPageFailed { message, load_id } => {
                self.feed.on_failed(message, load_id);
            }

            Action::DetailLoaded { detail, load_id } => {
                if load_id == self.detail_load_id {
                    self.detail_loading = false;
                    self.detail = Some(*detail);
                    self.scroll_offset = 0;
                    self.screen = Screen::Detail;
                }
            }
            Action::DetailFailed { message, load_id } => {
                if load_id == self.detail_load_id {
                    self.detail_loading = false;
                    // Fall back to the browsing view, never a broken page.
                    self.screen = Screen::Browse;
                    self.detail = None;
                    self.notice = Some(format!("couldn't open movie: {}", message));
                }
            }

            Action::YankLink => self.yank_link(),
            Action::OpenInBrowser => self.open_in_browser(),

            Action::None => {}
        }

        // The shareable position tracks every transition synchronously.
        self.position = link::encode(&self.browse.query);
    }

    fn paged_browse(&self) -> bool {
        self.screen == Screen::Browse && self.view_mode == ViewMode::Paged
    }

    fn scroll_up(&mut self) {
        match self.screen {
            Screen::Detail => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            Screen::Browse => match self.view_mode {
                ViewMode::Paged => self.browse_index = self.browse_index.saturating_sub(1),
                ViewMode::Infinite => self.feed_index = self.feed_index.saturating_sub(1),
            },
        }
    }

    fn scroll_down(&mut self) {
        match self.screen {
            Screen::Detail => self.scroll_offset += 1,
            Screen::Browse => match self.view_mode {
                ViewMode::Paged => {
                    if !self.browse.movies.is_empty()
                        && self.browse_index < self.browse.movies.len() - 1
                    {
                        self.browse_index += 1;
                    }
                }
                ViewMode::Infinite => {
                    if !self.feed.items.is_empty() && self.feed_index < self.feed.items.len() - 1 {
                        self.feed_index += 1;
                    }
                    self.maybe_load_more();
                }
            },
        }
    }

    /// The near-end signal: the selection sitting close to the end of the
    /// accumulated list stands in for a sentinel entering the viewport.
    /// `load_more` ignores re-entrant calls, so firing this on every
    /// scroll step is fine.
    fn maybe_load_more(&mut self) {
        if self.feed_index + NEAR_END_MARGIN >= self.feed.items.len() {
            self.feed.load_more();
        }
    }

    /// Keep the feed keyed to what the paged controller is browsing.
    /// Called lazily: only the visible view fetches.
    fn sync_feed(&mut self) {
        if self.view_mode != ViewMode::Infinite {
            return;
        }
        let selector = self.browse.selector();
        if *self.feed.selector() != selector {
            self.feed.reset(selector);
            self.feed_index = 0;
        }
        if self.feed.items.is_empty() && !self.feed.exhausted {
            self.feed.load_more();
        }
    }

    fn apply_search(&mut self) {
        let term = self.search_input.clone();
        self.browse.set_search(&term);
        self.browse_index = 0;
        self.sync_feed();
    }

    /// Arm the single debounce slot. Each keystroke overwrites the slot by
    /// bumping the seq; a timer that fires for an older seq is ignored.
    fn arm_debounce(&mut self) {
        self.debounce_seq += 1;
        let seq = self.debounce_seq;
        let delay = Duration::from_millis(self.debounce_ms);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send(Action::SearchDebounced(seq)).ok();
        });
    }

    fn open_selected(&mut self) {
        if self.screen != Screen::Browse {
            return;
        }
        let movie = match self.view_mode {
            ViewMode::Paged => self.browse.movies.get(self.browse_index),
            ViewMode::Infinite => self.feed.items.get(self.feed_index),
        };
        if let Some(movie) = movie {
            self.spawn_load_detail(movie.id);
        }
    }

    fn spawn_load_detail(&mut self, id: u64) {
        self.detail_loading = true;
        self.detail_load_id += 1;
        let load_id = self.detail_load_id;
        let catalog = Arc::clone(&self.catalog);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match catalog.movie(id).await {
                Ok(detail) => {
                    tx.send(Action::DetailLoaded {
                        detail: Box::new(detail),
                        load_id,
                    })
                    .ok();
                }
                Err(e) => {
                    tx.send(Action::DetailFailed {
                        message: e.to_string(),
                        load_id,
                    })
                    .ok();
                }
            }
        });
    }

    fn current_url(&self) -> String {
        match (self.screen, &self.detail) {
            (Screen::Detail, Some(detail)) => link::movie_url(detail.id),
            _ => link::web_url(self.browse.category, &self.browse.query),
        }
    }

    fn yank_link(&mut self) {
        let url = self.current_url();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.clone())) {
            Ok(()) => self.notice = Some(format!("copied {}", url)),
            Err(e) => self.notice = Some(format!("clipboard error: {}", e)),
        }
    }

    fn open_in_browser(&mut self) {
        let url = self.current_url();
        if let Err(e) = open::that(&url) {
            self.notice = Some(format!("couldn't open browser: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{movie, page_of, ScriptedCatalog};
    use crate::types::Selector;

    fn harness() -> (App, Arc<ScriptedCatalog>, mpsc::UnboundedReceiver<Action>) {
        let catalog = Arc::new(ScriptedCatalog::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(catalog.clone(), tx, &Config::default());
        (app, catalog, rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = rx.recv().await.expect("action channel closed");
        app.update(action);
    }

    #[tokio::test]
    async fn stale_debounce_timers_are_ignored() {
        let (mut app, catalog, _rx) = harness();
        app.update(Action::EnterSearchMode);
        app.update(Action::SearchInput('d'));
        app.update(Action::SearchInput('u'));

        // Timer from the first keystroke fires after the second overwrote it.
        app.update(Action::SearchDebounced(1));
        assert_eq!(app.browse.query.search, "");
        tokio::task::yield_now().await;
        assert_eq!(catalog.fetches(), 0);

        app.update(Action::SearchDebounced(2));
        assert_eq!(app.browse.query.search, "du");
        tokio::task::yield_now().await;
        assert_eq!(catalog.fetches(), 1);
    }

    #[tokio::test]
    async fn confirm_applies_without_waiting_for_the_timer() {
        let (mut app, catalog, _rx) = harness();
        app.update(Action::EnterSearchMode);
        app.update(Action::SearchInput('d'));
        app.update(Action::SearchConfirm);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.browse.query.search, "d");
        tokio::task::yield_now().await;
        assert_eq!(catalog.fetches(), 1);

        // The keystroke's own timer is stale now.
        app.update(Action::SearchDebounced(1));
        tokio::task::yield_now().await;
        assert_eq!(catalog.fetches(), 1);
    }

    #[tokio::test]
    async fn position_tracks_every_transition() {
        let (mut app, _catalog, _rx) = harness();
        assert_eq!(app.position, "");

        app.update(Action::EnterSearchMode);
        app.update(Action::SearchInput('a'));
        app.update(Action::SearchConfirm);
        assert_eq!(app.position, "search=a");

        app.update(Action::PageLoaded {
            results: page_of(1, 20, 10),
            load_id: 1,
        });
        app.update(Action::NextPage);
        assert_eq!(app.position, "search=a&page=2");
    }

    #[tokio::test]
    async fn near_end_selection_loads_more_exactly_once() {
        let (mut app, catalog, mut rx) = harness();
        catalog.stage(Selector::Category(Category::Popular), 1, page_of(1, 20, 10));

        app.update(Action::ToggleViewMode);
        assert_eq!(app.view_mode, ViewMode::Infinite);
        pump(&mut app, &mut rx).await; // entering the mode seeds page 1
        assert_eq!(catalog.fetches(), 1);
        assert_eq!(app.feed.items.len(), 20);

        // Scroll until the selection is within the margin of the end.
        for _ in 0..15 {
            app.update(Action::ScrollDown);
        }
        tokio::task::yield_now().await;
        assert_eq!(catalog.fetches(), 2);

        // Further signals while the fetch is pending are ignored.
        app.update(Action::ScrollDown);
        app.update(Action::ScrollDown);
        tokio::task::yield_now().await;
        assert_eq!(catalog.fetches(), 2);
    }

    #[tokio::test]
    async fn detail_failure_falls_back_to_the_browse_screen() {
        let (mut app, _catalog, mut rx) = harness();
        app.browse.movies = vec![movie(7, "Lost Film")]; // detail not staged

        app.update(Action::Select);
        assert!(app.detail_loading);
        pump(&mut app, &mut rx).await;

        assert_eq!(app.screen, Screen::Browse);
        assert!(app.detail.is_none());
        assert!(!app.detail_loading);
        assert!(app.notice.is_some());
    }

    #[tokio::test]
    async fn category_switch_in_infinite_mode_rekeys_the_feed() {
        let (mut app, catalog, mut rx) = harness();
        catalog.stage(Selector::Category(Category::Popular), 1, page_of(1, 20, 10));
        catalog.stage(
            Selector::Category(Category::Upcoming),
            1,
            page_of(1, 5, 1),
        );

        app.update(Action::ToggleViewMode);
        pump(&mut app, &mut rx).await;
        assert_eq!(app.feed.items.len(), 20);

        app.update(Action::SwitchCategory(Category::Upcoming));
        assert!(app.feed.items.is_empty());
        // Two fetches in flight now: the paged controller's and the feed's.
        // Only the feed completion touches the feed.
        pump(&mut app, &mut rx).await;
        pump(&mut app, &mut rx).await;
        assert_eq!(app.feed.items.len(), 5);
        assert_eq!(*app.feed.selector(), Selector::Category(Category::Upcoming));
    }

    #[tokio::test]
    async fn quit_from_browse_back_from_detail() {
        let (mut app, catalog, mut rx) = harness();
        app.browse.movies = vec![movie(3, "Some Film")];
        catalog.stage_detail(MovieDetail {
            id: 3,
            title: "Some Film".to_string(),
            vote_average: 8.0,
            release_date: None,
            runtime: Some(120),
            genres: Vec::new(),
            tagline: None,
            overview: String::new(),
            status: "Released".to_string(),
            original_language: "en".to_string(),
            budget: 0,
            revenue: 0,
            poster_path: None,
        });

        app.update(Action::Select);
        pump(&mut app, &mut rx).await;
        assert_eq!(app.screen, Screen::Detail);

        app.update(Action::Back);
        assert_eq!(app.screen, Screen::Browse);
        assert!(!app.should_quit);

        app.update(Action::Back);
        assert!(app.should_quit);
    }
}
