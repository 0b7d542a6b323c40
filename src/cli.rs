//! Command-line configuration.
//!
//! Every option can also come from the environment, which is the usual way
//! to pass the API key.

use std::path::PathBuf;

use clap::Parser;

use crate::settings::{OrderBy, Settings};

pub const DEFAULT_ENDPOINT: &str = "https://content.guardianapis.com/search";

/// A terminal news reader for the Guardian content API.
///
/// ```sh
/// # Uses the public "test" key
/// newsdrawer
///
/// # Your own key, oldest first, ten per page
/// GUARDIAN_API_KEY=... newsdrawer --order-by oldest --page-size 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Config {
    /// Guardian content API key
    #[arg(long, env = "GUARDIAN_API_KEY", default_value = "test", hide_env_values = true)]
    pub api_key: String,

    /// Search endpoint
    #[arg(long, env = "GUARDIAN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Articles per page (1-50)
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,

    /// Sort order
    #[arg(long, value_enum, default_value_t = OrderBy::Newest)]
    pub order_by: OrderBy,

    /// Where to write logs; the terminal itself is taken by the UI
    #[arg(long, env = "NEWSDRAWER_LOG", default_value = "newsdrawer.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// Initial settings-panel values.
    pub fn settings(&self) -> Settings {
        Settings::new(self.order_by, self.page_size)
    }
}
