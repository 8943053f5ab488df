//! Subcommands and their handlers.
//!
//! Handlers write to any `io::Write` and ask questions through [`Confirm`],
//! so they run the same against a terminal or a test buffer.

use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};
use clientfolio_core::{
    clipboard_text, distribution, folder_breakdown, folder_text, highlight, ClientKind,
    ClientfolioConfig, FolderId, FolderStore, NewClient, SearchQuery, Segment, SnapshotBackend,
};

use crate::error::CliError;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, delete, and inspect folders
    #[command(subcommand)]
    Folder(FolderCommand),

    /// Add, delete, promote, and copy clients
    #[command(subcommand)]
    Client(ClientCommand),

    /// Select clients by id across all folders and delete them together
    BulkDelete {
        #[arg(required = true, value_name = "CLIENT")]
        clients: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show matching clients per folder with matches in [brackets]
    Search { query: String },

    /// Dashboard totals, distribution, and recent clients
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum FolderCommand {
    Create { name: String },
    Delete {
        /// Folder id or name
        folder: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    List,
    Show {
        /// Folder id or name
        folder: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    Add(AddClientArgs),
    Delete {
        folder: String,
        client: String,
        #[arg(long)]
        kind: ClientKind,
    },
    /// Move a potential client to the end of the active list
    Promote { folder: String, client: String },
    /// Print the clipboard block for a client
    Copy { client: String },
}

#[derive(Args, Debug)]
pub struct AddClientArgs {
    /// Folder id or name
    pub folder: String,

    #[arg(long, default_value = "potential")]
    pub kind: ClientKind,

    #[arg(long)]
    pub business: String,

    #[arg(long)]
    pub contact: String,

    #[arg(long)]
    pub problem: String,
}

/// Yes/no questions put to the user before destructive commands.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on stderr and reads the answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{question} [y/N] ")?;
        stderr.flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

pub fn execute<B: SnapshotBackend>(
    command: Command,
    store: &mut FolderStore<B>,
    config: &ClientfolioConfig,
    out: &mut impl Write,
    confirm: &mut impl Confirm,
) -> Result<(), CliError> {
    match command {
        Command::Folder(cmd) => folder_command(cmd, store, out, confirm),
        Command::Client(cmd) => client_command(cmd, store, out),
        Command::BulkDelete { clients, yes } => bulk_delete(&clients, yes, store, out, confirm),
        Command::Search { query } => print_search(store, &SearchQuery::new(query), out),
        Command::Stats => print_stats(store, config.analytics.recent_limit, out),
    }
}

fn folder_command<B: SnapshotBackend>(
    cmd: FolderCommand,
    store: &mut FolderStore<B>,
    out: &mut impl Write,
    confirm: &mut impl Confirm,
) -> Result<(), CliError> {
    match cmd {
        FolderCommand::Create { name } => {
            let id = store.create_folder(&name)?;
            writeln!(out, "{id}")?;
        }
        FolderCommand::Delete { folder, yes } => {
            let id = resolve_folder(store, &folder)?;
            let impact = store.deletion_impact(&id).unwrap_or(0);
            if impact > 0 && !yes {
                let question = format!(
                    "This folder contains {impact} client(s). Are you sure you want to delete it?"
                );
                if !confirm.confirm(&question)? {
                    writeln!(out, "Cancelled")?;
                    return Ok(());
                }
            }
            store.delete_folder(&id);
        }
        FolderCommand::List => {
            if store.folders().is_empty() {
                writeln!(out, "No folders yet")?;
            }
            for folder in store.folders() {
                writeln!(
                    out,
                    "{}  {} ({} active, {} potential)",
                    folder.id,
                    folder.name,
                    folder.active_clients.len(),
                    folder.potential_clients.len()
                )?;
            }
        }
        FolderCommand::Show { folder } => {
            let id = resolve_folder(store, &folder)?;
            if let Some(folder) = store.folder(&id) {
                write!(out, "{}", folder_text(folder))?;
            }
        }
    }
    Ok(())
}

fn client_command<B: SnapshotBackend>(
    cmd: ClientCommand,
    store: &mut FolderStore<B>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match cmd {
        ClientCommand::Add(args) => {
            let folder_id = resolve_folder(store, &args.folder)?;
            let input = NewClient::new(args.business, args.contact, args.problem);
            let client_id = store.add_client(&folder_id, args.kind, &input)?;
            writeln!(out, "{client_id}")?;
        }
        ClientCommand::Delete {
            folder,
            client,
            kind,
        } => {
            let folder_id = resolve_folder(store, &folder)?;
            if !store.delete_client(&folder_id, &client, kind) {
                return Err(CliError::ClientNotFound(client));
            }
        }
        ClientCommand::Promote { folder, client } => {
            let folder_id = resolve_folder(store, &folder)?;
            if !store.promote_client(&folder_id, &client) {
                return Err(CliError::ClientNotFound(client));
            }
        }
        ClientCommand::Copy { client } => {
            let (_, _, found) = store
                .find_client(&client)
                .ok_or_else(|| CliError::ClientNotFound(client.clone()))?;
            writeln!(out, "{}", clipboard_text(found))?;
        }
    }
    Ok(())
}

fn bulk_delete<B: SnapshotBackend>(
    clients: &[String],
    yes: bool,
    store: &mut FolderStore<B>,
    out: &mut impl Write,
    confirm: &mut impl Confirm,
) -> Result<(), CliError> {
    store.clear_selection();
    for id in clients {
        if !store.is_selected(id) {
            store.toggle_selection(id);
        }
    }
    let count = store.selection().len();
    if !yes {
        let question = format!("Are you sure you want to delete {count} selected client(s)?");
        if !confirm.confirm(&question)? {
            store.clear_selection();
            writeln!(out, "Cancelled")?;
            return Ok(());
        }
    }
    if store.delete_selected() == 0 {
        writeln!(out, "No matching clients")?;
    }
    Ok(())
}

fn print_search<B: SnapshotBackend>(
    store: &FolderStore<B>,
    query: &SearchQuery,
    out: &mut impl Write,
) -> Result<(), CliError> {
    for view in store.search(query) {
        writeln!(out, "{} ({} matches)", view.folder.name, view.match_count())?;
        for kind in [ClientKind::Active, ClientKind::Potential] {
            for client in view.clients(kind) {
                writeln!(
                    out,
                    "  [{}] {}  {}",
                    kind,
                    marked(&client.business_name, query),
                    client.id
                )?;
                writeln!(out, "      {}", marked(&client.contact_details, query))?;
                writeln!(out, "      {}", marked(&client.problem_description, query))?;
            }
        }
    }
    Ok(())
}

/// Wrap each match in brackets.
fn marked(text: &str, query: &SearchQuery) -> String {
    highlight(text, query)
        .iter()
        .map(|segment| match segment {
            Segment::Match(s) => format!("[{s}]"),
            Segment::Plain(s) => s.to_string(),
        })
        .collect()
}

fn print_stats<B: SnapshotBackend>(
    store: &FolderStore<B>,
    recent_limit: usize,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let a = store.analytics();
    writeln!(out, "Folders:                 {}", a.folder_count)?;
    writeln!(out, "Total clients:           {}", a.total_clients)?;
    writeln!(out, "Active clients:          {}", a.total_active)?;
    writeln!(out, "Potential clients:       {}", a.total_potential)?;
    writeln!(out, "Conversion rate:         {}%", a.conversion_rate)?;
    writeln!(out, "Avg clients per folder:  {}", a.avg_clients_per_folder)?;
    writeln!(out, "Most populated folder:   {}", a.most_populated_label())?;

    let dist = distribution(store.folders());
    writeln!(out, "\nDistribution: {} active / {} potential", dist.active, dist.potential)?;

    let breakdown = folder_breakdown(store.folders());
    if !breakdown.is_empty() {
        writeln!(out, "\nBy folder:")?;
        for row in breakdown {
            writeln!(out, "  {:<18} {:>3} active {:>3} potential", row.label, row.active, row.potential)?;
        }
    }

    let recent = store.recent_clients(recent_limit);
    if !recent.is_empty() {
        writeln!(out, "\nRecent clients:")?;
        for client in recent {
            writeln!(
                out,
                "  {}  {}",
                client.added_at.format("%Y-%m-%d %H:%M"),
                client.business_name
            )?;
        }
    }
    Ok(())
}

/// Accept a folder id, or a name that matches exactly one folder
/// case-insensitively.
fn resolve_folder<B: SnapshotBackend>(
    store: &FolderStore<B>,
    key: &str,
) -> Result<FolderId, CliError> {
    if let Some(folder) = store.folder(key) {
        return Ok(folder.id.clone());
    }
    let wanted = key.trim().to_lowercase();
    let mut named = store
        .folders()
        .iter()
        .filter(|f| f.name.to_lowercase() == wanted);
    match (named.next(), named.next()) {
        (Some(folder), None) => Ok(folder.id.clone()),
        (Some(_), Some(_)) => Err(CliError::AmbiguousFolder(key.to_string())),
        (None, _) => Err(CliError::FolderNotFound(key.to_string())),
    }
}
