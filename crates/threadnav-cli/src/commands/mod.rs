use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use threadnav_core::models::NavSection;
use threadnav_core::outline::extract_outline;
use threadnav_core::{NavConfig, NavEntry, NavigationService, SqliteNavigationStore};

use crate::cli::{
    Cli, Commands, EntryAddArgs, EntryCommand, NavigatorCommand, OutlineArgs,
};

mod support;


use self::support::{print_json, read_source};

const OUTLINE_NAVIGATOR_ID: &str = "preview";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutlineOutput {
    entry_label: String,
    sections: Vec<NavSection>,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.db.as_deref())?;

    match cli.command {
        Commands::Serve(args) => {
            let mut server = config.server.clone();
            if let Some(addr) = args.addr {
                server.addr = addr;
            }
            let service = open_service(&config)?;
            threadnav_web::serve_web(service, &server)
        }
        Commands::Outline(args) => print_json(&outline_source(&args)?),
        Commands::Navigator(args) => {
            let service = open_service(&config)?;
            match args.command {
                NavigatorCommand::Create { chat_id, title } => {
                    print_json(&service.create_navigator(&chat_id, &title)?)
                }
                NavigatorCommand::Show { chat_id } => print_json(&service.get_navigator(&chat_id)?),
            }
        }
        Commands::Entry(args) => {
            let service = open_service(&config)?;
            match args.command {
                EntryCommand::Add(args) => print_json(&add_entry(&service, &args)?),
            }
        }
    }
}

fn resolve_config(config_path: Option<&Path>, db_override: Option<&Path>) -> Result<NavConfig> {
    let mut config = NavConfig::load(config_path).context("failed to load configuration")?;
    if let Some(db) = db_override {
        config.storage.database_path = db.to_path_buf();
    }
    Ok(config)
}

fn open_service(config: &NavConfig) -> Result<NavigationService<SqliteNavigationStore>> {
    let path = &config.storage.database_path;
    let store = SqliteNavigationStore::open(path)
        .with_context(|| format!("failed to open navigation store at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "navigation store opened");
    Ok(NavigationService::new(store))
}

fn outline_source(args: &OutlineArgs) -> Result<OutlineOutput> {
    let markdown = read_source(&args.source)?;
    let outline = extract_outline(&markdown, OUTLINE_NAVIGATOR_ID, &args.assistant_message_id);
    Ok(OutlineOutput {
        entry_label: outline.entry_label,
        sections: outline.sections,
    })
}

fn add_entry(
    service: &NavigationService<SqliteNavigationStore>,
    args: &EntryAddArgs,
) -> Result<NavEntry> {
    let reply = read_source(&args.source)?;
    if args.create_navigator {
        service.ensure_navigator(&args.chat_id, "")?;
    }
    let entry = service.add_entry_for_chat(
        &args.chat_id,
        &args.assistant_message_id,
        &args.user_message_id,
        &reply,
    )?;
    Ok(entry)
}
