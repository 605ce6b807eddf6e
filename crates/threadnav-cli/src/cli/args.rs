use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address, e.g. `127.0.0.1:8080`.
    #[arg(long)]
    pub addr: Option<String>,
}

#[derive(Debug, Args)]
pub struct OutlineArgs {
    /// Markdown file to outline, or `-` for stdin.
    pub source: PathBuf,
    #[arg(long, default_value = "preview")]
    pub assistant_message_id: String,
}

#[derive(Debug, Args)]
pub struct NavigatorArgs {
    #[command(subcommand)]
    pub command: NavigatorCommand,
}

#[derive(Debug, Subcommand)]
pub enum NavigatorCommand {
    Create {
        chat_id: String,
        #[arg(default_value = "")]
        title: String,
    },
    Show {
        chat_id: String,
    },
}

#[derive(Debug, Args)]
pub struct EntryArgs {
    #[command(subcommand)]
    pub command: EntryCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntryCommand {
    Add(EntryAddArgs),
}

#[derive(Debug, Args)]
pub struct EntryAddArgs {
    pub chat_id: String,
    #[arg(long)]
    pub assistant_message_id: String,
    #[arg(long, default_value = "")]
    pub user_message_id: String,
    /// Reply markdown file, or `-` for stdin.
    pub source: PathBuf,
    /// Create the chat's navigator if it does not exist yet.
    #[arg(long, default_value_t = false)]
    pub create_navigator: bool,
}
