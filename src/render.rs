//! List row rendering.
//!
//! Each visible row owns a [`RowSlot`]: the bound, ready-to-draw state for
//! one article.  Slots live in a [`SlotPool`] and are re-bound in place every
//! frame, so a row never rebuilds its strings from scratch unless the item
//! under it changed.
//!
//! ## For contributors
//!
//! Binding ([`RowRenderer::bind`]) decides *what* is shown; turning a slot
//! into ratatui lines ([`RowSlot::to_list_item`]) decides *how*.  Keep
//! visibility rules in the former so they stay testable without a terminal.

use chrono::{DateTime, Utc};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use tracing::warn;

use crate::source::NewsItem;
use crate::thumbs::{ImageLoader, ThumbState};
use crate::time_fmt::{self, TIME_UNAVAILABLE};

/// How a row element takes part in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Not drawn, but its space is kept so columns stay aligned.
    Hidden,
    /// Not drawn and takes no space.
    Collapsed,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// A text element of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub visibility: Visibility,
}

impl TextField {
    fn show(&mut self, text: &str) {
        self.visibility = Visibility::Visible;
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thumbnail {
    pub uri: Option<String>,
    pub state: Option<ThumbState>,
    pub visibility: Visibility,
}

/// Bound render state for one reusable row.
#[derive(Debug, Clone, Default)]
pub struct RowSlot {
    pub section: TextField,
    pub headline: TextField,
    pub thumbnail: Thumbnail,
    /// Gap between the thumbnail and the text; shown and hidden with it.
    pub spacer: Visibility,
    pub time: TextField,
    pub author: TextField,
    /// Position this slot was last bound to.
    pub bound: Option<usize>,
}

/// Width reserved for the section label, hidden or not.
const SECTION_WIDTH: usize = 14;

impl RowSlot {
    /// Lay out the bound state as a two-line list entry.
    pub fn to_list_item(&self) -> ListItem<'static> {
        let mut top = Vec::new();

        if self.thumbnail.visibility.is_visible() {
            top.push(Span::styled(
                thumb_marker(self.thumbnail.state),
                Style::default().fg(Color::Magenta),
            ));
        }
        if self.spacer.is_visible() {
            top.push(Span::raw(" "));
        }
        match self.section.visibility {
            Visibility::Visible => top.push(Span::styled(
                format!(
                    "{:<width$}",
                    truncate(&self.section.text, SECTION_WIDTH - 1),
                    width = SECTION_WIDTH
                ),
                Style::default().fg(Color::Cyan),
            )),
            Visibility::Hidden => top.push(Span::raw(" ".repeat(SECTION_WIDTH))),
            Visibility::Collapsed => {}
        }
        top.push(Span::styled(
            self.headline.text.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

        let mut bottom = vec![Span::styled(
            self.time.text.clone(),
            Style::default().fg(Color::DarkGray),
        )];
        if self.author.visibility.is_visible() {
            bottom.push(Span::raw("  ·  "));
            bottom.push(Span::styled(
                self.author.text.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }

        let indent = if self.thumbnail.visibility.is_visible() { "      " } else { "" };
        bottom.insert(0, Span::raw(indent));

        ListItem::new(vec![Line::from(top), Line::from(bottom)])
    }
}

fn thumb_marker(state: Option<ThumbState>) -> String {
    match state {
        Some(ThumbState::Ready { .. }) => "[img]".into(),
        Some(ThumbState::Failed) => "[ x ]".into(),
        Some(ThumbState::Loading) | None => "[ … ]".into(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Binds articles into row slots.
#[derive(Debug, Clone, Copy)]
pub struct RowRenderer {
    /// Every item comes from one section, so labels are redundant.
    pub single_section: bool,
}

impl RowRenderer {
    pub fn new(single_section: bool) -> Self {
        Self { single_section }
    }

    /// Populate `slot` for the item at `position`.
    pub fn bind(
        &self,
        item: &NewsItem,
        position: usize,
        slot: &mut RowSlot,
        images: &dyn ImageLoader,
        now: DateTime<Utc>,
    ) {
        if self.single_section {
            slot.section.set_visibility(Visibility::Hidden);
        } else {
            slot.section.show(item.section.as_deref().unwrap_or_default());
        }

        slot.headline.show(&item.headline);

        match &item.thumbnail {
            Some(uri) => {
                slot.thumbnail.visibility = Visibility::Visible;
                slot.spacer = Visibility::Visible;
                slot.thumbnail.state = Some(images.request(uri));
                if slot.thumbnail.uri.as_deref() != Some(uri.as_str()) {
                    slot.thumbnail.uri = Some(uri.clone());
                }
            }
            None => {
                slot.thumbnail.visibility = Visibility::Collapsed;
                slot.spacer = Visibility::Collapsed;
                slot.thumbnail.uri = None;
                slot.thumbnail.state = None;
            }
        }

        match time_fmt::format_relative(&item.published, now) {
            Ok(relative) => slot.time.show(&relative),
            Err(e) => {
                // Only log the first time this slot sees the bad value.
                if slot.bound != Some(position) {
                    warn!(id = %item.id, error = %e, "unparseable publication time");
                }
                slot.time.show(TIME_UNAVAILABLE);
            }
        }

        match &item.author {
            Some(author) => slot.author.show(author),
            None => slot.author.set_visibility(Visibility::Collapsed),
        }

        slot.bound = Some(position);
    }
}

/// Reusable row slots, indexed by row position.
#[derive(Debug, Default)]
pub struct SlotPool {
    slots: Vec<RowSlot>,
    created: usize,
}

impl SlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot for `index`, created on first use.
    pub fn slot(&mut self, index: usize) -> &mut RowSlot {
        while self.slots.len() <= index {
            self.slots.push(RowSlot::default());
            self.created += 1;
        }
        &mut self.slots[index]
    }

    /// Bind every item and return the slots in order.
    pub fn bind_all(
        &mut self,
        renderer: RowRenderer,
        items: &[NewsItem],
        images: &dyn ImageLoader,
        now: DateTime<Utc>,
    ) -> &[RowSlot] {
        for (position, item) in items.iter().enumerate() {
            renderer.bind(item, position, self.slot(position), images, now);
        }
        &self.slots[..items.len()]
    }

    /// Number of slots ever allocated.
    #[cfg(test)]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Mark every slot unbound, keeping the allocations for the next list.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.bound = None;
        }
    }
}
