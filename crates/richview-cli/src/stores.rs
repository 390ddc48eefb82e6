use anyhow::Context;
use clap::Subcommand;
use richview_core::{AppConfig, Store, StoreDirectory};

/// Sub-commands available under `stores`.
#[derive(Debug, Subcommand)]
pub enum StoreCommands {
    /// List stores, optionally filtered by name, address, or city
    List {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Show the single closest store to a coordinate
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// List every store ordered by distance from a coordinate
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Show one store by id
    Show { id: String },
}

pub(crate) fn run(config: &AppConfig, command: &StoreCommands) -> anyhow::Result<()> {
    let directory = richview_core::load_stores(&config.stores_path)
        .with_context(|| format!("loading stores from {}", config.stores_path.display()))?;
    run_with(&directory, command)
}

fn run_with(directory: &StoreDirectory, command: &StoreCommands) -> anyhow::Result<()> {
    match command {
        StoreCommands::List { query } => {
            let matches = directory.search(query);
            if matches.is_empty() {
                println!("no stores match '{query}'");
            }
            for store in matches {
                print_store(store, None);
            }
        }
        StoreCommands::Nearest { lat, lng } => {
            let (store, distance) = directory
                .nearest(*lat, *lng)
                .ok_or_else(|| anyhow::anyhow!("store list is empty"))?;
            print_store(store, Some(distance));
        }
        StoreCommands::Nearby { lat, lng } => {
            for (store, distance) in directory.sorted_by_distance(*lat, *lng) {
                print_store(store, Some(distance));
            }
        }
        StoreCommands::Show { id } => {
            let store = directory
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("store '{id}' not found"))?;
            print_store(store, None);
            println!("  phone: {}", store.phone);
            println!("  hours: {}", store.hours);
        }
    }
    Ok(())
}

fn print_store(store: &Store, distance_km: Option<f64>) {
    match distance_km {
        Some(d) => println!("{:<16} {:<36} {:<10} {d:>8.1} km", store.id, store.name, store.city),
        None => println!("{:<16} {:<36} {}", store.id, store.name, store.address),
    }
}
