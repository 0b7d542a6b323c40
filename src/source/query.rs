//! Query descriptors.
//!
//! A [`Query`] is the full request URL for one load.  Sources treat it as
//! opaque; only [`Query::build`] knows how categories, search terms and
//! settings map onto the content API's parameters.

use std::fmt;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::nav::Category;
use crate::settings::Settings;

/// Fields requested alongside each result.
const SHOW_FIELDS: &str = "thumbnail,headline";

/// Tags requested alongside each result; the first contributor is the byline.
const SHOW_TAGS: &str = "contributor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Build the search URL for `category`, narrowed to `search` when given.
    ///
    /// Returns `None` for categories that have no content list (Settings).
    pub fn build(
        endpoint: &str,
        api_key: &str,
        category: Category,
        search: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Self>> {
        if !category.has_content() {
            return Ok(None);
        }

        let page_size = settings.page_size.to_string();
        let mut params = vec![
            ("api-key", api_key),
            ("show-fields", SHOW_FIELDS),
            ("show-tags", SHOW_TAGS),
            ("order-by", settings.order_by.as_param()),
            ("page-size", page_size.as_str()),
        ];
        if let Some(section) = category.section_id() {
            params.push(("section", section));
        }
        if let Some(term) = search {
            params.push(("q", term));
        }

        let url = Url::parse_with_params(endpoint, &params)
            .with_context(|| format!("invalid endpoint {endpoint:?}"))?;
        Ok(Some(Self(url.into())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
