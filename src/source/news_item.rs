//! The article record shared by sources, the loader, and the renderer.
//!
//! `NewsItem` is built once by a [`NewsSource`](super::NewsSource) and is
//! then only read.  A whole `Vec<NewsItem>` is replaced when a new load
//! lands; individual items are never edited in place.
//!
//! ## For contributors
//!
//! Optional fields map to optional pieces of the list row: a missing
//! `thumbnail` collapses the image column and a missing `author` collapses
//! the byline.  Keep them `Option` rather than defaulting to empty strings
//! so the renderer can tell "absent" from "blank".

/// One article, normalised from the content API.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewsItem {
    /// Stable content id (e.g. `sport/2017/sep/13/some-story`).
    pub id: String,

    /// Section label such as "Sport".  Absent for some content types.
    pub section: Option<String>,

    /// Headline, shown verbatim.
    pub headline: String,

    /// Thumbnail image URI.
    pub thumbnail: Option<String>,

    /// Publication time as sent by the API, `YYYY-MM-DDThh:mm:ssZ`.
    ///
    /// Kept as text; [`crate::time_fmt`] parses it at render time so that a
    /// bad value degrades one row instead of failing the whole load.
    pub published: String,

    /// Byline, taken from the first contributor tag.
    pub author: Option<String>,

    /// Link to the article on the web.
    pub url: Option<String>,
}

impl NewsItem {
    /// An item with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        headline: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            section: None,
            headline: headline.into(),
            thumbnail: None,
            published: published.into(),
            author: None,
            url: None,
        }
    }

    #[cfg(test)]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    #[cfg(test)]
    pub fn with_thumbnail(mut self, uri: impl Into<String>) -> Self {
        self.thumbnail = Some(uri.into());
        self
    }

    #[cfg(test)]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_leaves_optional_fields_empty() {
        let item = NewsItem::new("a", "Headline", "2017-09-13T18:04:29Z");
        assert_eq!(item.headline, "Headline");
        assert!(item.section.is_none());
        assert!(item.thumbnail.is_none());
        assert!(item.author.is_none());
        assert!(item.url.is_none());
    }

    #[test]
    fn builders_fill_optional_fields() {
        let item = NewsItem::new("a", "Headline", "2017-09-13T18:04:29Z")
            .with_section("Sport")
            .with_thumbnail("https://img.example/1.jpg")
            .with_author("Jane Doe");

        assert_eq!(item.section.as_deref(), Some("Sport"));
        assert_eq!(item.thumbnail.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(item.author.as_deref(), Some("Jane Doe"));
    }
}
