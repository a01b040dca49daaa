use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cinegen")]
#[command(author, version, about = "Guided AI movie generation")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a movie: script, scene images, then video
    Create {
        /// Movie title
        #[arg(long)]
        title: String,

        /// Genre, e.g. "Sci-Fi"
        #[arg(long)]
        genre: String,

        /// What the movie is about
        #[arg(long)]
        description: String,

        /// Visual style, e.g. "Cinematic"
        #[arg(long)]
        style: String,

        /// Number of scenes (defaults to the configured scene count)
        #[arg(short = 'n', long)]
        scenes: Option<u32>,

        /// Retry failed scene images this many times before composing
        #[arg(long, default_value = "0")]
        retries: u32,

        /// Stop after the images stage
        #[arg(long)]
        no_video: bool,

        /// Also render a poster once the video is ready
        #[arg(long)]
        poster: bool,

        /// Print the final run as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse previously generated movies
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List movies
    List {
        /// Case-insensitive match on title, genre or style
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, completed or in-progress
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Show one movie in detail
    Show {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a movie
    Delete { id: String },
}
