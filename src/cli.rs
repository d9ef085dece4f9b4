//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the WikiNews importer.
///
/// # Examples
///
/// ```sh
/// # Import the last 5 days of articles
/// wikinews_import -o ./records
///
/// # Import two weeks from a different wiki
/// wikinews_import -o ./records --days 14 --base-url https://en.wikinews.org
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for imported article records
    #[arg(short, long)]
    pub output_dir: String,

    /// How many daily listings to walk back through, starting today
    #[arg(short, long, default_value_t = 5)]
    pub days: u32,

    /// Base URL of the wiki to import from
    #[arg(long, env = "WIKINEWS_BASE_URL", default_value = "https://en.wikinews.org")]
    pub base_url: String,
}
