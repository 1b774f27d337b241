use crate::types::{Category, MovieDetail, ResultsPage};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    Select,

    // Paged navigation
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,

    SwitchCategory(Category),
    ToggleViewMode,

    // Search input
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    ClearSearch,
    /// Fired by the debounce timer; the seq ties it to the keystroke burst
    /// that armed it, so a superseded timer is ignored on arrival.
    SearchDebounced(u64),

    // Fetch completions. The load_id ties a response to the request
    // generation that issued it; stale responses are discarded on arrival.
    PageLoaded {
        results: ResultsPage,
        load_id: u64,
    },
    PageFailed {
        message: String,
        load_id: u64,
    },
    FeedPageLoaded {
        results: ResultsPage,
        load_id: u64,
    },
    FeedPageFailed {
        message: String,
        load_id: u64,
    },
    DetailLoaded {
        detail: Box<MovieDetail>,
        load_id: u64,
    },
    DetailFailed {
        message: String,
        load_id: u64,
    },

    Refresh,
    YankLink,
    OpenInBrowser,

    None,
}
