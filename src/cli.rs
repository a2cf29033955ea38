use crate::config::{API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::tui::theme::Theme;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tubegist")]
#[command(about = "Download video transcripts, summarize them and chat about the summary")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: GlobalOptions,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// API key for the completion service
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible completion API
    #[arg(long, env = "TUBEGIST_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// Model used for summaries and chat
    #[arg(long, env = "TUBEGIST_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Preferred transcript languages (comma-separated)
    #[arg(short, long, default_value = "en", global = true)]
    pub languages: String,

    /// Per-request timeout in seconds, 0 waits forever
    #[arg(long, default_value_t = 120, global = true)]
    pub timeout_secs: u64,

    /// Color theme for the TUI
    #[arg(long, value_enum, default_value_t = Theme::Light, global = true)]
    pub theme: Theme,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a transcript and print it
    Get {
        /// Video URL or video ID
        video: String,

        /// Print segments with timing as JSON
        #[arg(long)]
        json: bool,

        /// Prefix each line with its time range
        #[arg(long, conflicts_with = "json")]
        timestamps: bool,
    },

    /// Download a transcript and print a bullet-point summary
    Summarize {
        /// Video URL or video ID
        video: String,

        /// Print the summary as HTML
        #[arg(long)]
        html: bool,
    },

    /// Summarize a video, then chat about it on stdin
    Chat {
        /// Video URL or video ID
        video: String,

        /// Chat about the raw transcript instead of a summary
        #[arg(long)]
        no_summary: bool,
    },

    /// Open TUI interface
    Tui,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["tubegist"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.options.theme, Theme::Light);
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["tubegist", "summarize", "abc", "--theme", "cafe", "--html"])
            .expect("parse");
        assert_eq!(cli.options.theme, Theme::Cafe);
        assert!(matches!(cli.command, Some(Commands::Summarize { html: true, .. })));
    }

    #[test]
    fn json_and_timestamps_conflict() {
        assert!(Cli::try_parse_from(["tubegist", "get", "abc", "--json", "--timestamps"]).is_err());
    }
}
