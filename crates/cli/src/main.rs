use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_auth::{Actor, Role};
use stockroom_core::ItemId;
use stockroom_infra::{JsonFileStateStore, LedgerConfig, PersistentLedger};
use stockroom_inventory::{Destination, StockInRequest, StockOutRequest, UsageRequest};

#[derive(Parser)]
#[command(name = "stockroom", about = "Restaurant stock ledger", version)]
struct Cli {
    #[arg(long, global = true, env = "STOCKROOM_ACTOR", default_value = "admin", help = "Who is performing the operation")]
    actor: String,
    #[arg(
        long,
        global = true,
        env = "STOCKROOM_ROLE",
        help = "Role of the actor: admin, stock-keeper, chef or barista; required for changes"
    )]
    role: Option<Role>,
    #[arg(long, global = true, help = "Ledger state file; overrides STOCKROOM_STATE_PATH")]
    state: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive a delivery.
    StockIn(StockInArgs),
    /// Withdraw stock for the kitchen or bar.
    StockOut(StockOutArgs),
    /// Record how much of a withdrawal was consumed.
    LogUsage(LogUsageArgs),
    /// All catalog items.
    List,
    /// Items at or below their minimum stock level.
    Alerts,
    /// Catalog totals.
    Summary,
    /// Journal records, newest first.
    History(HistoryArgs),
}

#[derive(Args)]
struct StockInArgs {
    #[arg(long, help = "Item name")]
    name: String,
    #[arg(long, help = "Package size, e.g. 1kg")]
    size: String,
    #[arg(long, help = "Units received")]
    quantity: i64,
    #[arg(long, help = "Supplier name")]
    supplier: String,
    #[arg(long, help = "Total cost of the delivery")]
    cost: Decimal,
    #[arg(long, default_value_t = 0, help = "Alert threshold")]
    min_stock: i64,
}

#[derive(Args)]
struct StockOutArgs {
    #[arg(long, help = "Item identifier")]
    item: ItemId,
    #[arg(long, help = "Units withdrawn")]
    quantity: i64,
    #[arg(long, help = "Person taking the stock")]
    taker: String,
    #[arg(long, default_value = "kitchen", help = "kitchen, bar or a free-form label")]
    destination: Destination,
}

#[derive(Args)]
struct LogUsageArgs {
    #[arg(long, help = "Item identifier")]
    item: ItemId,
    #[arg(long, help = "Units taken")]
    taken: i64,
    #[arg(long, help = "Units actually used")]
    used: i64,
    #[arg(long, help = "Units the user says are left; must match taken - used")]
    remaining: Option<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    In,
    Out,
    Usage,
}

#[derive(Args)]
struct HistoryArgs {
    #[arg(long, value_enum, default_value_t = RecordKind::Out, help = "Which records to list")]
    kind: RecordKind,
    #[arg(long, help = "Show every record for one item, in sequence order")]
    item: Option<ItemId>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LedgerConfig::from_env().context("invalid configuration")?;
    if let Some(path) = cli.state {
        config.state_path = path;
    }
    stockroom_observability::init_with(config.log_format);

    let store = JsonFileStateStore::new(&config.state_path);
    let host = PersistentLedger::open(store, config.restock_policy)
        .with_context(|| format!("failed to open ledger at {}", config.state_path.display()))?;
    let identity = cli.actor;
    let role = cli.role;

    match cli.command {
        Commands::StockIn(args) => {
            let actor = session_actor(identity, role)?;
            let item = host.stock_in(
                &actor,
                StockInRequest {
                    name: args.name,
                    size: args.size,
                    quantity: args.quantity,
                    supplier: args.supplier,
                    total_cost: args.cost,
                    min_stock_level: args.min_stock,
                    occurred_at: Utc::now(),
                },
            )?;
            print_json(&item)
        }
        Commands::StockOut(args) => {
            let actor = session_actor(identity, role)?;
            let outcome = host.stock_out(
                &actor,
                StockOutRequest {
                    item_id: args.item,
                    quantity: args.quantity,
                    taker: args.taker,
                    destination: args.destination,
                    occurred_at: Utc::now(),
                },
            )?;
            print_json(&outcome)
        }
        Commands::LogUsage(args) => {
            let actor = session_actor(identity, role)?;
            let record = host.log_usage(
                &actor,
                UsageRequest {
                    item_id: args.item,
                    quantity_taken: args.taken,
                    quantity_used: args.used,
                    claimed_remaining: args.remaining,
                    occurred_at: Utc::now(),
                },
            )?;
            print_json(&record)
        }
        Commands::List => print_json(&host.ledger().list()),
        Commands::Alerts => print_json(&host.ledger().low_stock_alerts()),
        Commands::Summary => print_json(&host.ledger().summary()),
        Commands::History(args) => {
            let ledger = host.ledger();
            match (args.item, args.kind) {
                (Some(item_id), _) => print_json(&ledger.history_for(item_id)),
                (None, RecordKind::In) => print_json(&ledger.stock_in_records()),
                (None, RecordKind::Out) => print_json(&ledger.stock_out_records()),
                (None, RecordKind::Usage) => print_json(&ledger.usage_records()),
            }
        }
    }
}

/// Mutations never fall back to a default role.
fn session_actor(identity: String, role: Option<Role>) -> Result<Actor> {
    let role = role.context("a role is required: pass --role or set STOCKROOM_ROLE")?;
    Ok(Actor::new(identity, role))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
