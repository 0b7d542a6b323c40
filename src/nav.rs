//! Navigation shell: which category is showing and which overlay is open.
//!
//! The shell owns exactly one piece of "current" state, the selected content
//! category, and changes it only through [`Shell::select`].  Startup goes
//! through the same setter, so the title and drawer behave the same way on
//! launch as on a user pick.

use tracing::info;

/// Entries of the navigation drawer, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Home,
    Culture,
    Education,
    Fashion,
    LifeStyle,
    Politics,
    Sports,
    Technology,
    Settings,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Home,
        Category::Culture,
        Category::Education,
        Category::Fashion,
        Category::LifeStyle,
        Category::Politics,
        Category::Sports,
        Category::Technology,
        Category::Settings,
    ];

    /// Title shown in the top bar and the drawer.
    pub fn title(self) -> &'static str {
        match self {
            Category::Home => "Home",
            Category::Culture => "Culture",
            Category::Education => "Education",
            Category::Fashion => "Fashion",
            Category::LifeStyle => "Life & Style",
            Category::Politics => "Politics",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
            Category::Settings => "Settings",
        }
    }

    /// Content API section this category filters on.
    pub fn section_id(self) -> Option<&'static str> {
        match self {
            Category::Home | Category::Settings => None,
            Category::Culture => Some("culture"),
            Category::Education => Some("education"),
            Category::Fashion => Some("fashion"),
            Category::LifeStyle => Some("lifeandstyle"),
            Category::Politics => Some("politics"),
            Category::Sports => Some("sport"),
            Category::Technology => Some("technology"),
        }
    }

    /// Whether every article in this category belongs to one section, in
    /// which case rows don't repeat the section label.
    pub fn is_section(self) -> bool {
        self.section_id().is_some()
    }

    /// Settings opens a panel instead of an article list.
    pub fn has_content(self) -> bool {
        self != Category::Settings
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

/// What a drawer pick asked the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Show this category's articles.
    Content(Category),
    /// Open the settings panel.
    Settings,
}

/// Outcome of a back action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    /// An overlay was closed.
    Handled,
    /// Nothing was open; the caller should fall through to default handling.
    Default,
}

#[derive(Debug)]
pub struct Shell {
    current: Category,
    title: String,
    pub drawer_open: bool,
    drawer_cursor: usize,
    pub settings_open: bool,
}

impl Shell {
    /// A shell with the first category selected.
    pub fn new() -> Self {
        let mut shell = Self {
            current: Category::ALL[0],
            title: String::new(),
            drawer_open: false,
            drawer_cursor: 0,
            settings_open: false,
        };
        shell.select(Category::ALL[0]);
        shell
    }

    pub fn current(&self) -> Category {
        self.current
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn drawer_cursor(&self) -> usize {
        self.drawer_cursor
    }

    /// Select a drawer entry.  Always closes the drawer.
    pub fn select(&mut self, category: Category) -> Selection {
        self.drawer_open = false;
        self.drawer_cursor = category.index();

        if !category.has_content() {
            info!("opening settings");
            self.settings_open = true;
            return Selection::Settings;
        }

        info!(category = category.title(), "category selected");
        self.current = category;
        self.title = category.title().to_string();
        Selection::Content(category)
    }

    /// Title the current list as search results for `term`.  The category
    /// stays selected; its section still narrows the results.
    pub fn show_search(&mut self, term: &str) {
        self.drawer_open = false;
        self.title = format!("Search: {term}");
    }

    /// Select whatever the drawer cursor is on.
    pub fn select_at_cursor(&mut self) -> Selection {
        let category = Category::from_index(self.drawer_cursor).unwrap_or(self.current);
        self.select(category)
    }

    /// Close the innermost open overlay, if any.
    pub fn back(&mut self) -> Back {
        if self.settings_open {
            self.settings_open = false;
            Back::Handled
        } else if self.drawer_open {
            self.drawer_open = false;
            Back::Handled
        } else {
            Back::Default
        }
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
        if self.drawer_open {
            self.drawer_cursor = self.current.index();
        }
    }

    pub fn cursor_down(&mut self) {
        self.drawer_cursor = (self.drawer_cursor + 1).min(Category::ALL.len() - 1);
    }

    pub fn cursor_up(&mut self) {
        self.drawer_cursor = self.drawer_cursor.saturating_sub(1);
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
