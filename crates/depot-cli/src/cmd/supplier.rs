use super::{connect, load_config};
use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use depot_core::backend::InventoryBackend;
use depot_core::inventory::NewSupplier;
use std::path::Path;

#[derive(Subcommand)]
pub enum SupplierSubcommand {
    /// List suppliers
    List,
    /// Register a supplier
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Contact person
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

pub fn run(
    root: &Path,
    api_url: Option<&str>,
    subcmd: SupplierSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        SupplierSubcommand::List => list(root, api_url, json),
        SupplierSubcommand::Register {
            name,
            email,
            contact,
            phone,
            address,
        } => register(
            root,
            api_url,
            NewSupplier {
                name,
                contact_name: contact,
                email,
                phone,
                address,
            },
            json,
        ),
    }
}

fn list(root: &Path, api_url: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load_config(root, api_url)?;
    let suppliers = connect(&config)?
        .list_suppliers()
        .context("failed to list suppliers")?;

    if json {
        return print_json(&suppliers);
    }
    if suppliers.is_empty() {
        println!("No suppliers registered.");
        return Ok(());
    }
    let rows = suppliers
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                or_dash(s.contact_name.as_deref()),
                s.email.clone(),
                or_dash(s.phone.as_deref()),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "CONTACT", "EMAIL", "PHONE"], rows);
    Ok(())
}

fn register(
    root: &Path,
    api_url: Option<&str>,
    form: NewSupplier,
    json: bool,
) -> anyhow::Result<()> {
    let form = form.validate()?;
    let config = load_config(root, api_url)?;
    let created = connect(&config)?
        .create_supplier(&form)
        .context("failed to register supplier")?;

    if json {
        print_json(&created)?;
    } else {
        println!("Registered supplier [{}]: {}", created.id, created.name);
    }
    Ok(())
}
