use anyhow::Context;
use clap::{Parser, Subcommand};
use gala_client::{ClientConfig, HttpClient};
use gala_seating::{SeatingBoard, SeatingState, TableDetailEditor, setup_environment};
use shared::models::Role;
use std::sync::Arc;

/// Seating board for one event, driven from the command line
#[derive(Debug, Parser)]
#[command(name = "gala-seating", version, about)]
struct Cli {
    /// Event to open
    #[arg(short, long, env = "GALA_EVENT_ID")]
    event: i64,

    /// Role used for capability checks
    #[arg(long, default_value = "event_coordinator", value_parser = parse_role)]
    role: Role,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print tables and the unassigned pool
    Show,
    /// Seat a guest at a table
    Assign { guest_id: i64, table_number: u32 },
    /// Move a guest back to the unassigned pool
    Unassign { guest_id: i64 },
    /// Edit a table's capacity, name or captain
    Customize {
        table_number: u32,
        /// New capacity; empty string restores the event default
        #[arg(long)]
        capacity: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_captain")]
        captain: Option<i64>,
        #[arg(long)]
        clear_captain: bool,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown role '{s}'"))
}

fn print_board(state: &SeatingState) {
    for table in state.table_summaries() {
        println!(
            "{:<24} {:>2}/{:<2}{}",
            table.label,
            table.occupancy,
            table.capacity,
            if table.is_full { "  FULL" } else { "" }
        );
        for guest in state.guests_at(table.table_number).unwrap_or_default() {
            let captain = if table.captain_id == Some(guest.id) { " *" } else { "" };
            println!("    [{}] {}{}", guest.id, guest.display_label(), captain);
        }
    }
    println!("Unassigned ({})", state.unassigned().len());
    for guest in state.unassigned() {
        println!("    [{}] {}", guest.id, guest.display_label());
    }
}

fn apply_edits(
    editor: &mut TableDetailEditor,
    capacity: Option<String>,
    name: Option<String>,
    captain: Option<i64>,
    clear_captain: bool,
) {
    if let Some(capacity) = capacity {
        editor.set_capacity(capacity);
    }
    if let Some(name) = name {
        editor.set_name(name);
    }
    if captain.is_some() {
        editor.set_captain(captain);
    }
    if clear_captain {
        editor.clear_captain();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = setup_environment();
    let cli = Cli::parse();

    let client = HttpClient::new(&ClientConfig::from_env()).context("building HTTP client")?;
    let board = SeatingBoard::new(Arc::new(client), cli.role, config);

    let seating = board
        .open_event(cli.event)
        .await
        .with_context(|| format!("opening event {}", cli.event))?;
    tracing::info!(
        event_id = seating.event_id,
        tables = seating.table_count,
        "Event opened"
    );

    match cli.command {
        Command::Show => {}
        Command::Assign {
            guest_id,
            table_number,
        } => {
            let report = board.assign_guest_to_table(guest_id, table_number).await?;
            println!("{:?}: {:?}", report.kind, report.phase);
        }
        Command::Unassign { guest_id } => {
            let report = board.remove_guest_from_table(guest_id).await?;
            println!("{:?}: {:?}", report.kind, report.phase);
        }
        Command::Customize {
            table_number,
            capacity,
            name,
            captain,
            clear_captain,
        } => {
            let mut editor = board.table_editor(table_number)?;
            apply_edits(&mut editor, capacity, name, captain, clear_captain);
            if let Err(errors) = editor.validate() {
                for e in &errors {
                    eprintln!("{}: {}", e.field, e.message);
                }
                anyhow::bail!("table {} not updated", table_number);
            }
            let report = editor.submit(&board).await?;
            println!("{:?}: {:?}", report.kind, report.phase);
        }
    }

    board.with_state(print_board);
    board.teardown();
    Ok(())
}
