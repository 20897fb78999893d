pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::fetcher::parallel::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "runnel", version)]
#[command(about = "A command-line feed reader", long_about = None)]
pub struct Cli {
    /// Number of parallel workers for fetching feeds
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, global = true)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; browsing the cache when none was given.
    pub fn subcommand(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Read)
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Browse cached items and read one in the pager
    #[command(visible_alias = "r")]
    Read,
    /// Pick cached items and open their links in the browser
    #[command(visible_alias = "o")]
    Open,
    /// Fetch every subscribed feed and replace the cache
    #[command(visible_alias = "u")]
    Update,
    /// Subscribe to a feed
    #[command(visible_alias = "a")]
    Add {
        /// URL of the feed to add
        url: String,
    },
    /// Edit the subscription list in an editor
    #[command(visible_alias = "e")]
    Edit {
        /// Editor command used to open the list
        #[arg(short, long, env = "EDITOR", default_value = "vim")]
        editor: String,
    },
    /// Subscribe to every feed in an OPML file
    Import {
        /// Path to the OPML file
        path: PathBuf,
    },
    /// Print the subscribed feed URLs
    List,
}
