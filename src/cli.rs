use clap::{Parser, Subcommand};
use portfolio_site::config::{API_BASE_URL, DEFAULT_GITHUB_USERNAME};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio-site")]
#[command(about = "Preview the portfolio page components outside the browser")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch repositories and print the rendered card markup
    Repos {
        /// GitHub user whose repositories are listed
        #[arg(long, env = "GITHUB_USERNAME", default_value = DEFAULT_GITHUB_USERNAME)]
        username: String,

        /// GitHub API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
        api_base: String,

        /// Request timeout in seconds (none by default)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Extra attempts after a network or server failure
        #[arg(long, default_value_t = 0)]
        retries: u32,

        /// Show the generic failure message for every error, including rate limits
        #[arg(long)]
        generic_errors: bool,

        /// Write the markup to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run the particle background against an in-memory canvas
    Particles {
        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        #[arg(long, default_value_t = 720.0)]
        height: f64,

        /// Number of frames to render
        #[arg(long, default_value_t = 60)]
        frames: u32,

        /// Seed for particle placement (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// Primary colour as #rrggbb, as the page's --color-primary would supply it
        #[arg(long)]
        primary_color: Option<String>,
    },
}
