use chrono::{DateTime, Utc};
use ratatui::widgets::{ListItem, ListState};
use tracing::{debug, info, warn};

use crate::loader::{LoadMsg, Loader};
use crate::nav::{Back, Category, Selection, Shell};
use crate::render::{RowRenderer, SlotPool};
use crate::settings::Settings;
use crate::source::{NewsItem, Query};
use crate::thumbs::{ThumbState, ThumbnailCache};

/// Where queries are sent.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub url: String,
    pub api_key: String,
}

pub struct App {
    pub shell: Shell,
    pub settings: Settings,
    /// Settings changed while the panel was open; reload when it closes.
    settings_dirty: bool,
    endpoint: Endpoint,
    /// Active search term; narrows loads of the current category.
    search: Option<String>,
    /// Text typed at the `/` prompt, while it is open.
    pub search_prompt: Option<String>,
    /// Articles for the current category.  `None` until the first load for
    /// it lands, or after it failed.
    pub items: Option<Vec<NewsItem>>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    slots: SlotPool,
    loader: Loader,
    pub thumbs: ThumbnailCache,
    /// Generation of the load whose result the list is waiting for.
    awaiting: Option<u64>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last load status message.
    pub status: String,
}

impl App {
    pub fn new(
        endpoint: Endpoint,
        settings: Settings,
        loader: Loader,
        thumbs: ThumbnailCache,
    ) -> Self {
        Self {
            shell: Shell::new(),
            settings,
            settings_dirty: false,
            endpoint,
            search: None,
            search_prompt: None,
            items: None,
            list_state: ListState::default(),
            slots: SlotPool::new(),
            loader,
            thumbs,
            awaiting: None,
            quit: false,
            status: "Starting…".into(),
        }
    }

    /// Load the category the shell starts on.
    pub fn start(&mut self) {
        self.load_current();
    }

    pub fn is_loading(&self) -> bool {
        self.awaiting.is_some()
    }

    // -- navigation shell ----------------------------------------------------

    pub fn select(&mut self, category: Category) {
        let selection = self.shell.select(category);
        self.follow(selection);
    }

    pub fn select_from_drawer(&mut self) {
        let selection = self.shell.select_at_cursor();
        self.follow(selection);
    }

    /// Picking a category ends any search; the settings panel leaves it alone.
    fn follow(&mut self, selection: Selection) {
        match selection {
            Selection::Content(_) => {
                self.search = None;
                self.load_current();
            }
            Selection::Settings => {}
        }
    }

    /// Close the innermost overlay, or quit when none is open.
    pub fn back(&mut self) {
        let closing_settings = self.shell.settings_open;
        match self.shell.back() {
            Back::Handled => {
                if closing_settings && self.settings_dirty {
                    self.settings_dirty = false;
                    self.load_current();
                }
            }
            Back::Default => self.quit(),
        }
    }

    pub fn quit(&mut self) {
        self.loader.cancel();
        self.quit = true;
    }

    // -- search --------------------------------------------------------------

    pub fn open_search_prompt(&mut self) {
        self.shell.drawer_open = false;
        self.search_prompt = Some(self.search.clone().unwrap_or_default());
    }

    pub fn cancel_search_prompt(&mut self) {
        self.search_prompt = None;
    }

    pub fn push_search_char(&mut self, c: char) {
        if let Some(prompt) = self.search_prompt.as_mut() {
            prompt.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        if let Some(prompt) = self.search_prompt.as_mut() {
            prompt.pop();
        }
    }

    /// Close the prompt and search for what was typed.
    pub fn submit_search(&mut self) {
        if let Some(term) = self.search_prompt.take() {
            self.search(&term);
        }
    }

    /// Replace the list with the current category's articles matching `term`.
    /// A blank term goes back to the plain category list.
    pub fn search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            let current = self.shell.current();
            return self.select(current);
        }
        info!(term, category = self.shell.current().title(), "searching");
        self.shell.show_search(term);
        self.search = Some(term.to_string());
        self.load_current();
    }

    // -- settings panel ------------------------------------------------------

    pub fn cycle_order(&mut self) {
        self.settings.cycle_order();
        self.settings_dirty = true;
    }

    pub fn grow_page(&mut self) {
        self.settings.grow_page();
        self.settings_dirty = true;
    }

    pub fn shrink_page(&mut self) {
        self.settings.shrink_page();
        self.settings_dirty = true;
    }

    // -- loading -------------------------------------------------------------

    /// Reload the current category (and search, if one is active).
    pub fn refresh(&mut self) {
        self.load_current();
    }

    fn load_current(&mut self) {
        let query = match Query::build(
            &self.endpoint.url,
            &self.endpoint.api_key,
            self.shell.current(),
            self.search.as_deref(),
            &self.settings,
        ) {
            Ok(query) => query,
            Err(e) => {
                warn!(error = %e, "cannot build query");
                self.loader.cancel();
                self.awaiting = None;
                self.items = None;
                self.status = format!("Error: {e}");
                return;
            }
        };

        self.items = None;
        self.list_state.select(None);
        self.status = format!("Loading {}…", self.shell.title());
        self.awaiting = Some(self.loader.request(query));
    }

    /// Apply a message from the loader.  Results of superseded requests are
    /// ignored.
    pub fn apply(&mut self, msg: LoadMsg) {
        if self.awaiting != Some(msg.generation()) {
            debug!(generation = msg.generation(), "ignoring stale load result");
            return;
        }
        self.awaiting = None;

        match msg {
            LoadMsg::Loaded { items, .. } => {
                info!(count = items.len(), category = self.shell.title(), "list replaced");
                self.status = format!("Fetched {} items", items.len());
                self.thumbs.clear();
                self.slots.reset();
                self.list_state.select(if items.is_empty() { None } else { Some(0) });
                self.items = Some(items);
            }
            LoadMsg::Failed { error, .. } => {
                self.status = format!("Error: {error}");
                self.items = None;
            }
        }
    }

    // -- rendering -----------------------------------------------------------

    /// Bind the current items and return one list entry per article.
    pub fn rows(&mut self, now: DateTime<Utc>) -> Vec<ListItem<'static>> {
        let Some(items) = self.items.as_deref() else {
            return Vec::new();
        };
        let renderer = RowRenderer::new(self.shell.current().is_section());
        self.slots
            .bind_all(renderer, items, &self.thumbs, now)
            .iter()
            .map(|slot| slot.to_list_item())
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    // -- list navigation -----------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.item_count();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.item_count() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.item_count() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.item_count();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    /// Put the selected article's link in the status bar.
    pub fn show_link(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let mut status = item.url.clone().unwrap_or_else(|| item.id.clone());
        let thumb = item.thumbnail.as_deref().and_then(|uri| self.thumbs.state(uri));
        if let Some(ThumbState::Ready { width, height }) = thumb {
            status.push_str(&format!("  [img {width}x{height}]"));
        }
        self.status = status;
    }

    /// The article under the cursor.
    pub fn selected_item(&self) -> Option<&NewsItem> {
        let index = self.list_state.selected()?;
        self.items.as_ref()?.get(index)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use anyhow::{bail, Result};

    use crate::source::NewsSource;
    use crate::thumbs::ImageFetch;

    /// Serves three items for any query, or a single hit for a search;
    /// records the queries it saw.
    pub(crate) struct FakeSource {
        pub queries: std::sync::Mutex<Vec<String>>,
    }

    impl NewsSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        fn fetch(&self, query: &Query) -> Result<Vec<NewsItem>> {
            self.queries.lock().unwrap().push(query.to_string());
            if query.as_str().contains("page-size=13") {
                bail!("unlucky");
            }
            if query.as_str().contains("q=") {
                return Ok(vec![NewsItem::new("hit", "Search hit", "2017-09-13T18:04:29Z")]);
            }
            Ok(vec![
                NewsItem::new("1", "First", "2017-09-13T18:04:29Z").with_section("Sport"),
                NewsItem::new("2", "Second", "2017-09-13T17:04:29Z").with_author("Sam"),
                NewsItem::new("3", "Third", "2017-09-12T18:04:29Z"),
            ])
        }
    }

    pub(crate) struct NoImages(pub AtomicUsize);

    impl ImageFetch for NoImages {
        fn fetch(&self, _uri: &str) -> Result<Vec<u8>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            bail!("offline")
        }
    }

    pub(crate) struct Harness {
        pub app: App,
        pub rx: mpsc::Receiver<LoadMsg>,
        pub source: Arc<FakeSource>,
        _rt: tokio::runtime::Runtime,
    }

    impl Harness {
        pub fn new() -> Self {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let source = Arc::new(FakeSource {
                queries: std::sync::Mutex::new(Vec::new()),
            });
            let (loader, rx) = Loader::new(source.clone(), rt.handle().clone());
            let images = Arc::new(NoImages(AtomicUsize::new(0)));
            let thumbs = ThumbnailCache::new(images, rt.handle().clone());
            let endpoint = Endpoint {
                url: "https://content.example/search".into(),
                api_key: "test".into(),
            };
            let app = App::new(endpoint, Settings::default(), loader, thumbs);
            Self { app, rx, source, _rt: rt }
        }

        /// Wait for the next loader message and apply it.
        pub fn pump(&mut self) {
            let msg = self.rx.recv_timeout(Duration::from_secs(5)).unwrap();
            self.app.apply(msg);
        }

        /// Apply every message already delivered.
        pub fn drain(&mut self) {
            while let Ok(msg) = self.rx.recv_timeout(Duration::from_millis(200)) {
                self.app.apply(msg);
            }
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_on_home_with_no_items() {
        let h = Harness::new();
        assert!(h.app.items.is_none());
        assert!(!h.app.quit);
        assert_eq!(h.app.shell.current(), Category::Home);
        assert!(h.app.list_state.selected().is_none());
    }

    #[test]
    fn start_loads_home() {
        let mut h = Harness::new();
        h.app.start();
        assert!(h.app.is_loading());
        h.pump();

        assert!(!h.app.is_loading());
        assert_eq!(h.app.item_count(), 3);
        assert_eq!(h.app.list_state.selected(), Some(0));
        assert_eq!(h.app.status, "Fetched 3 items");
        let queries = h.source.queries.lock().unwrap();
        assert!(!queries[0].contains("section="));
    }

    // -- shell ---------------------------------------------------------------

    #[test]
    fn selecting_sports_loads_sports_and_closes_drawer() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();

        h.app.shell.toggle_drawer();
        h.app.select(Category::Sports);

        assert!(!h.app.shell.drawer_open);
        assert_eq!(h.app.shell.title(), "Sports");
        assert!(h.app.items.is_none(), "old list is cleared while loading");
        h.pump();

        assert_eq!(h.app.item_count(), 3);
        let queries = h.source.queries.lock().unwrap();
        assert!(queries.last().unwrap().contains("section=sport"));
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut h = Harness::new();
        h.app.start();
        h.app.select(Category::Culture);
        h.drain();

        assert_eq!(h.app.shell.current(), Category::Culture);
        assert!(!h.app.is_loading());
        assert_eq!(h.app.item_count(), 3);
    }

    #[test]
    fn settings_selection_does_not_reload() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();

        h.app.select(Category::Settings);
        assert!(h.app.shell.settings_open);
        assert!(!h.app.is_loading());
        assert_eq!(h.app.item_count(), 3);
    }

    #[test]
    fn closing_changed_settings_reloads() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();

        h.app.select(Category::Settings);
        h.app.cycle_order();
        h.app.back();

        assert!(!h.app.shell.settings_open);
        assert!(h.app.is_loading());
        h.pump();
        let queries = h.source.queries.lock().unwrap();
        assert!(queries.last().unwrap().contains("order-by=oldest"));
    }

    #[test]
    fn closing_unchanged_settings_does_not_reload() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();

        h.app.select(Category::Settings);
        h.app.back();
        assert!(!h.app.is_loading());
    }

    #[test]
    fn back_with_nothing_open_quits() {
        let mut h = Harness::new();
        h.app.shell.toggle_drawer();
        h.app.back();
        assert!(!h.app.quit);
        h.app.back();
        assert!(h.app.quit);
    }

    #[test]
    fn failed_load_shows_error_and_empty_state() {
        let mut h = Harness::new();
        h.app.settings = Settings::new(crate::settings::OrderBy::Newest, 13);
        h.app.start();
        h.pump();

        assert!(h.app.items.is_none());
        assert_eq!(h.app.status, "Error: fake: unlucky");
        assert!(h.app.rows(Utc::now()).is_empty());
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn search_fetches_once_and_replaces_list() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();
        assert_eq!(h.app.item_count(), 3);

        h.app.search("climate change");
        assert_eq!(h.app.shell.title(), "Search: climate change");
        assert_eq!(h.app.status, "Loading Search: climate change…");
        assert!(h.app.items.is_none());
        h.pump();

        assert_eq!(h.app.item_count(), 1);
        assert_eq!(h.app.selected_item().unwrap().headline, "Search hit");
        let queries = h.source.queries.lock().unwrap();
        assert_eq!(queries.len(), 2, "one fetch for the search");
        assert!(queries[1].contains("q=climate+change"));
    }

    #[test]
    fn search_keeps_category_section_and_refresh_repeats_it() {
        let mut h = Harness::new();
        h.app.select(Category::Sports);
        h.pump();

        h.app.search("f1");
        h.pump();
        h.app.refresh();
        h.pump();

        let queries = h.source.queries.lock().unwrap();
        assert_eq!(queries.len(), 3);
        for query in &queries[1..] {
            assert!(query.contains("section=sport") && query.contains("q=f1"), "{query}");
        }
    }

    #[test]
    fn selecting_a_category_ends_the_search() {
        let mut h = Harness::new();
        h.app.search("f1");
        h.pump();

        h.app.select(Category::Culture);
        h.pump();

        assert_eq!(h.app.shell.title(), "Culture");
        assert_eq!(h.app.item_count(), 3);
        let queries = h.source.queries.lock().unwrap();
        assert!(!queries.last().unwrap().contains("q="));
    }

    #[test]
    fn blank_search_reloads_plain_category() {
        let mut h = Harness::new();
        h.app.search("f1");
        h.pump();

        h.app.search("   ");
        h.pump();

        assert_eq!(h.app.shell.title(), "Home");
        assert_eq!(h.app.item_count(), 3);
    }

    #[test]
    fn prompt_edits_then_submits() {
        let mut h = Harness::new();
        h.app.open_search_prompt();
        for c in "brexiy".chars() {
            h.app.push_search_char(c);
        }
        h.app.pop_search_char();
        h.app.push_search_char('t');
        h.app.submit_search();

        assert!(h.app.search_prompt.is_none());
        assert_eq!(h.app.shell.title(), "Search: brexit");
        h.pump();
        assert_eq!(h.app.item_count(), 1);
    }

    // -- rendering -----------------------------------------------------------

    #[test]
    fn rows_bind_every_item() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();

        assert_eq!(h.app.rows(Utc::now()).len(), 3);
    }

    // -- list navigation -----------------------------------------------------

    #[test]
    fn select_next_on_empty_is_noop() {
        let mut h = Harness::new();
        h.app.select_next();
        h.app.select_previous();
        h.app.select_first();
        h.app.select_last();
        assert!(h.app.list_state.selected().is_none());
    }

    #[test]
    fn selection_moves_and_clamps() {
        let mut h = Harness::new();
        h.app.start();
        h.pump();

        h.app.select_next();
        assert_eq!(h.app.list_state.selected(), Some(1));
        h.app.select_last();
        h.app.select_next();
        assert_eq!(h.app.list_state.selected(), Some(2));
        assert_eq!(h.app.selected_item().unwrap().id, "3");

        h.app.show_link();
        assert_eq!(h.app.status, "3", "falls back to the id without a web url");

        h.app.select_first();
        h.app.select_previous();
        assert_eq!(h.app.list_state.selected(), Some(0));
    }
}
