//! CLI output formatting utilities.

use crate::playlist::Playlist;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one search hit.
    pub fn search_result(title: &str, artist: &str, genre: &str, score: f32, filepath: &str) {
        println!(
            "\n{} {} - {} [{}] (score: {:.2})",
            style(">>").green(),
            style(artist).bold(),
            style(title).bold(),
            style(genre).cyan(),
            score
        );
        println!("   {}", style(content_preview(filepath, 120)).dim());
    }

    /// Print a playlist with its tracks.
    pub fn playlist(playlist: &Playlist) {
        Output::header(&playlist.name);
        Output::kv("Request", &playlist.description);
        Output::kv("Created", &playlist.created_at.format("%Y-%m-%d %H:%M").to_string());
        Output::kv("Id", &playlist.id.to_string());
        println!();
        for (i, track) in playlist.tracks.iter().enumerate() {
            println!(
                "  {:>2}. {} - {}",
                i + 1,
                style(&track.artist).bold(),
                track.title
            );
            println!("      {}", style(&track.filepath).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format duration in seconds to a human-readable string.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let head: String = content.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
