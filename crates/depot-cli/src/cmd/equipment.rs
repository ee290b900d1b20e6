use super::{connect, load_config};
use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use depot_core::backend::InventoryBackend;
use depot_core::inventory::NewEquipment;
use std::path::Path;

#[derive(Subcommand)]
pub enum EquipmentSubcommand {
    /// List registered equipment
    List,
    /// Register a piece of equipment
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        serial: String,
        #[arg(long)]
        category: String,
        /// Supplier id
        #[arg(long)]
        supplier: Option<u64>,
        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        purchase_date: Option<NaiveDate>,
        #[arg(long)]
        unit_cost: Option<f64>,
    },
}

pub fn run(
    root: &Path,
    api_url: Option<&str>,
    subcmd: EquipmentSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        EquipmentSubcommand::List => list(root, api_url, json),
        EquipmentSubcommand::Register {
            name,
            serial,
            category,
            supplier,
            purchase_date,
            unit_cost,
        } => register(
            root,
            api_url,
            NewEquipment {
                name,
                serial_number: serial,
                category,
                supplier_id: supplier,
                purchase_date,
                unit_cost,
            },
            json,
        ),
    }
}

fn list(root: &Path, api_url: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load_config(root, api_url)?;
    let items = connect(&config)?
        .list_equipment()
        .context("failed to list equipment")?;

    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No equipment registered.");
        return Ok(());
    }
    let rows = items
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.serial_number.clone(),
                e.name.clone(),
                e.category.clone(),
                or_dash(e.supplier_id),
                or_dash(e.purchase_date),
                or_dash(e.unit_cost.map(|c| format!("{c:.2}"))),
            ]
        })
        .collect();
    print_table(
        &["ID", "SERIAL", "NAME", "CATEGORY", "SUPPLIER", "PURCHASED", "UNIT COST"],
        rows,
    );
    Ok(())
}

fn register(
    root: &Path,
    api_url: Option<&str>,
    form: NewEquipment,
    json: bool,
) -> anyhow::Result<()> {
    // Invalid forms never reach the backend.
    let form = form.validate()?;
    let config = load_config(root, api_url)?;
    let created = connect(&config)?
        .create_equipment(&form)
        .context("failed to register equipment")?;

    if json {
        print_json(&created)?;
    } else {
        println!(
            "Registered equipment [{}]: {} ({})",
            created.id, created.name, created.serial_number
        );
    }
    Ok(())
}
