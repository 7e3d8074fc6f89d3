//! CLI module for Virtuosa.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Virtuosa - playlists from your own music library, by voice
///
/// Scans a local music collection, indexes its metadata for semantic search,
/// and asks a language model to assemble playlists from spoken or typed requests.
#[derive(Parser, Debug)]
#[command(name = "virtuosa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the music library directory
    #[arg(short, long, global = true, env = "VIRTUOSA_MUSIC_DIR")]
    pub library: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the music library and report what was found
    Scan {
        /// Also list every skipped file with its reason
        #[arg(long)]
        skipped: bool,
    },

    /// Search the library by description
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Generate a playlist from a text description
    Generate {
        /// What the playlist should sound like
        description: String,

        /// Save the playlist to the playlist collection
        #[arg(short, long)]
        save: bool,
    },

    /// Generate a playlist from a recorded voice request
    Voice {
        /// Audio file with the spoken request
        audio: String,

        /// Save the playlist to the playlist collection
        #[arg(short, long)]
        save: bool,
    },

    /// List saved playlists
    Playlists,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
