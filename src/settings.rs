//! User-adjustable query settings.
//!
//! These are the knobs exposed on the settings panel.  Changing them does not
//! touch the current list; the app reloads the selected category once the
//! panel is closed.

use std::fmt;

use clap::ValueEnum;

/// Smallest and largest page size the content API accepts.
pub const PAGE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// Sort order requested from the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderBy {
    Newest,
    Oldest,
    Relevance,
}

impl OrderBy {
    /// Value of the `order-by` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            OrderBy::Newest => "newest",
            OrderBy::Oldest => "oldest",
            OrderBy::Relevance => "relevance",
        }
    }

    pub fn next(self) -> Self {
        match self {
            OrderBy::Newest => OrderBy::Oldest,
            OrderBy::Oldest => OrderBy::Relevance,
            OrderBy::Relevance => OrderBy::Newest,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub order_by: OrderBy,
    pub page_size: u32,
}

impl Settings {
    pub fn new(order_by: OrderBy, page_size: u32) -> Self {
        Self {
            order_by,
            page_size: page_size.clamp(*PAGE_SIZE_RANGE.start(), *PAGE_SIZE_RANGE.end()),
        }
    }

    pub fn cycle_order(&mut self) {
        self.order_by = self.order_by.next();
    }

    pub fn grow_page(&mut self) {
        self.page_size = (self.page_size + 1).min(*PAGE_SIZE_RANGE.end());
    }

    pub fn shrink_page(&mut self) {
        self.page_size = self.page_size.saturating_sub(1).max(*PAGE_SIZE_RANGE.start());
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(OrderBy::Newest, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_cycles_through_every_value() {
        let mut settings = Settings::default();
        assert_eq!(settings.order_by, OrderBy::Newest);
        settings.cycle_order();
        assert_eq!(settings.order_by, OrderBy::Oldest);
        settings.cycle_order();
        assert_eq!(settings.order_by, OrderBy::Relevance);
        settings.cycle_order();
        assert_eq!(settings.order_by, OrderBy::Newest);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(Settings::new(OrderBy::Newest, 0).page_size, 1);
        assert_eq!(Settings::new(OrderBy::Newest, 500).page_size, 50);

        let mut settings = Settings::new(OrderBy::Newest, 50);
        settings.grow_page();
        assert_eq!(settings.page_size, 50);

        let mut settings = Settings::new(OrderBy::Newest, 1);
        settings.shrink_page();
        assert_eq!(settings.page_size, 1);
    }
}
