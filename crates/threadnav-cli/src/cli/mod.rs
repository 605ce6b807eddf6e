use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{
    EntryAddArgs, EntryArgs, EntryCommand, NavigatorArgs, NavigatorCommand, OutlineArgs,
    ServeArgs,
};

#[derive(Debug, Parser)]
#[command(name = "threadnav")]
#[command(about = "Outline navigator for long-running chat threads", version)]
pub struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding config and environment.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Serve(ServeArgs),
    Outline(OutlineArgs),
    Navigator(NavigatorArgs),
    Entry(EntryArgs),
}
