use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use smartpark::{
    sort_by_field, FileCache, KeyValueCache, LastResult, ParkingStats, ParkingStore, Slot,
    SlotChanges, SlotFilter, SlotId, SortDirection, SortField, DEFAULT_CACHE_KEY,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "smartpark",
    about = "SmartPark: manage parking slots from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding the slot cache
    #[arg(long, global = true, default_value = ".smartpark")]
    data_dir: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List slots
    List {
        /// all, available, occupied, ev or covered
        #[arg(short, long, default_value = "all")]
        filter: SlotFilter,
        /// slotNo, isCovered, isEVCharging or isOccupied
        #[arg(short, long, default_value = "slotNo")]
        sort_by: SortField,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Show one slot by id or slot number
    Show { slot: String },
    /// Add a slot
    Add {
        /// Slot number, 1-6 characters
        slot_no: String,
        #[arg(long)]
        covered: bool,
        #[arg(long)]
        ev: bool,
    },
    /// Park a vehicle in the best matching free slot
    Park {
        /// Vehicle needs EV charging
        #[arg(long)]
        ev: bool,
        /// Vehicle needs a covered spot
        #[arg(long)]
        covered: bool,
    },
    /// Free an occupied slot
    Free { slot: String },
    /// Change a slot's features
    Update {
        slot: String,
        #[arg(long)]
        covered: Option<bool>,
        #[arg(long)]
        ev: Option<bool>,
    },
    /// Delete a slot
    Delete { slot: String },
    /// Occupancy statistics
    Stats,
    /// Discard saved slots and start again from the demo lot
    Reset,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smartpark=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cache = FileCache::open(&cli.data_dir)
        .with_context(|| format!("opening slot cache at {}", cli.data_dir.display()))?;

    if matches!(cli.command, Commands::Reset) {
        cache
            .remove(DEFAULT_CACHE_KEY)
            .context("removing saved slots")?;
    }

    let mut store = ParkingStore::with_cache(cache);
    let out = Output { json: cli.json };

    let ok = match cli.command {
        Commands::List {
            filter,
            sort_by,
            desc,
        } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let slots = sort_by_field(&store.filtered(filter), sort_by, direction);
            out.slots(&slots, store.slots().len());
            true
        }
        Commands::Show { slot } => match resolve(&store, &slot) {
            Some(id) => {
                if let Some(found) = store.get(&id) {
                    out.slot(found);
                }
                true
            }
            None => out.not_found(&slot),
        },
        Commands::Add {
            slot_no,
            covered,
            ev,
        } => {
            let outcome = store.add_slot(&slot_no, covered, ev);
            out.message(outcome.ok, &outcome.message);
            outcome.ok
        }
        Commands::Park { ev, covered } => {
            store.park_vehicle(ev, covered);
            out.result(store.last_result())
        }
        Commands::Free { slot } => match resolve(&store, &slot) {
            Some(id) => {
                store.remove_vehicle(&id);
                out.result(store.last_result())
            }
            None => out.not_found(&slot),
        },
        Commands::Update { slot, covered, ev } => {
            let changes = SlotChanges {
                is_covered: covered,
                is_ev_charging: ev,
            };
            if changes.is_empty() {
                out.message(false, "Nothing to update: pass --covered and/or --ev.");
                false
            } else {
                match resolve(&store, &slot) {
                    Some(id) => {
                        store.update_slot(&id, changes);
                        out.result(store.last_result())
                    }
                    None => out.not_found(&slot),
                }
            }
        }
        Commands::Delete { slot } => match resolve(&store, &slot) {
            Some(id) => {
                let slot_no = store.get(&id).map(|s| s.slot_no.clone()).unwrap_or_default();
                store.delete_slot(&id);
                out.message(true, &format!("Slot {slot_no} deleted."));
                true
            }
            None => out.not_found(&slot),
        },
        Commands::Stats => {
            out.stats(&store.stats());
            true
        }
        Commands::Reset => {
            out.message(true, "Lot reset to the demo slots.");
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Accept either a slot id or a slot number.
fn resolve(store: &ParkingStore, arg: &str) -> Option<SlotId> {
    let id = SlotId::from(arg);
    store
        .get(&id)
        .or_else(|| store.find_by_slot_no(arg))
        .map(|s| s.id.clone())
}

struct Output {
    json: bool,
}

impl Output {
    fn slots(&self, slots: &[Slot], total: usize) {
        if self.json {
            println!("{}", json!(slots));
            return;
        }
        println!("{:<8}{:<9}{:<5}{:<10}ID", "SLOT", "COVERED", "EV", "STATUS");
        for slot in slots {
            println!(
                "{:<8}{:<9}{:<5}{:<10}{}",
                slot.slot_no,
                yes_no(slot.is_covered),
                yes_no(slot.is_ev_charging),
                status(slot),
                slot.id
            );
        }
        println!("Showing {} of {} slots", slots.len(), total);
    }

    fn slot(&self, slot: &Slot) {
        if self.json {
            println!("{}", json!(slot));
        } else {
            println!("Slot {} ({})", slot.slot_no, slot.id);
            println!("  covered:  {}", yes_no(slot.is_covered));
            println!("  ev:       {}", yes_no(slot.is_ev_charging));
            println!("  status:   {}", status(slot));
        }
    }

    fn stats(&self, stats: &ParkingStats) {
        if self.json {
            println!("{}", json!(stats));
        } else {
            println!("total:      {}", stats.total);
            println!("occupied:   {}", stats.occupied);
            println!("available:  {}", stats.available);
            println!("ev slots:   {}", stats.ev_slots);
            println!("covered:    {}", stats.covered_slots);
            println!("occupancy:  {}%", stats.occupancy_rate);
        }
    }

    /// Print a last-result. Returns false for error results.
    fn result(&self, result: Option<&LastResult>) -> bool {
        let Some(result) = result else {
            return true;
        };
        let ok = result.kind != smartpark::ResultKind::Error;
        if self.json {
            println!("{}", json!(result));
        } else if ok {
            println!("{}", result.message);
        } else {
            eprintln!("{}", result.message);
        }
        ok
    }

    fn message(&self, ok: bool, message: &str) {
        if self.json {
            println!("{}", json!({ "ok": ok, "message": message }));
        } else if ok {
            println!("{message}");
        } else {
            eprintln!("{message}");
        }
    }

    fn not_found(&self, arg: &str) -> bool {
        self.message(false, &format!("No slot matches \"{arg}\"."));
        false
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn status(slot: &Slot) -> &'static str {
    if slot.is_occupied {
        "occupied"
    } else {
        "free"
    }
}
