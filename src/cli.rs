use clap::{Parser, Subcommand};

/// GitDash — OAuth-backed GitLab activity dashboard backend
#[derive(Parser)]
#[command(name = "gitdash", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard server
    Serve {
        /// Port to bind
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}
