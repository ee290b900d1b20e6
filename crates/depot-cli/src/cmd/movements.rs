use super::{connect, load_config};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use depot_core::mutator::{StatusMutator, TransitionRequest};
use depot_core::screen::{MovementsScreen, TransitionOutcome};
use depot_core::table::MovementColumn;
use depot_core::types::{ActionKind, SortDirection, TypeFilter};
use depot_core::view::TableRender;
use std::path::Path;

#[derive(Subcommand)]
pub enum MovementsSubcommand {
    /// List movement requests
    List {
        /// Match against id, locations and people (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Movement type: install, swap, retrieve or all
        #[arg(long = "type", value_name = "TYPE")]
        movement_type: Option<String>,
        /// Only requests dated on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Hide a column (repeatable)
        #[arg(long = "hide", value_name = "COLUMN")]
        hide: Vec<String>,
        /// Sort by a column
        #[arg(long, value_name = "COLUMN")]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Mark a pending request completed
    Complete { id: u64 },
    /// Decline a pending request
    Decline { id: u64 },
}

pub fn run(
    root: &Path,
    api_url: Option<&str>,
    subcmd: MovementsSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        MovementsSubcommand::List {
            search,
            movement_type,
            date,
            hide,
            sort,
            desc,
        } => list(
            root,
            api_url,
            ListOptions {
                search,
                movement_type,
                date,
                hide,
                sort,
                desc,
            },
            json,
        ),
        MovementsSubcommand::Complete { id } => {
            transition(root, api_url, id, ActionKind::Complete, json)
        }
        MovementsSubcommand::Decline { id } => {
            transition(root, api_url, id, ActionKind::Decline, json)
        }
    }
}

struct ListOptions {
    search: Option<String>,
    movement_type: Option<String>,
    date: Option<String>,
    hide: Vec<String>,
    sort: Option<String>,
    desc: bool,
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, api_url: Option<&str>, opts: ListOptions, json: bool) -> anyhow::Result<()> {
    let config = load_config(root, api_url)?;
    let mut screen = MovementsScreen::from_config(&config.dashboard);

    // Bad flags fail before any request is made.
    {
        let view = screen.view_mut();
        if let Some(search) = opts.search {
            view.set_search(search);
        }
        if let Some(raw) = &opts.movement_type {
            view.set_type_filter(raw.parse::<TypeFilter>()?);
        }
        if let Some(raw) = &opts.date {
            view.set_date_filter(raw)?;
        }
        for key in &opts.hide {
            let column: MovementColumn = key.parse()?;
            view.set_column_visible(column, false)?;
        }
        if let Some(key) = &opts.sort {
            let column: MovementColumn = key.parse()?;
            let direction = if opts.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            view.set_sort(column, direction)?;
        }
    }

    let backend = connect(&config)?;
    screen.load(&backend)?;

    if json {
        return print_json(&screen.snapshot());
    }

    match screen.view_mut().render() {
        TableRender::Rows { columns, rows } => {
            let headers: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
            let show_actions = columns.iter().any(|c| c.column == MovementColumn::Actions);
            let table = rows
                .into_iter()
                .map(|row| {
                    let mut cells: Vec<String> = row.cells.into_iter().map(|c| c.value).collect();
                    if show_actions {
                        let actions: Vec<&str> = row.actions.iter().map(|a| a.kind.as_str()).collect();
                        cells.push(actions.join(", "));
                    }
                    cells
                })
                .collect();
            print_table(&headers, table);
        }
        TableRender::Empty {
            message, can_reset, ..
        } => {
            println!("{message}");
            if can_reset {
                println!("(drop --search, --type or --date to see everything)");
            }
        }
        TableRender::Loading { .. } => println!("Loading..."),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// complete / decline
// ---------------------------------------------------------------------------

fn transition(
    root: &Path,
    api_url: Option<&str>,
    id: u64,
    action: ActionKind,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root, api_url)?;
    let backend = connect(&config)?;
    let mut screen = MovementsScreen::from_config(&config.dashboard);
    screen.load(&backend)?;

    let mutator = StatusMutator::new(&backend, config.dashboard.movement_date_on_transition);
    let outcome = mutator
        .transition(&mut screen, TransitionRequest::from_action(id, action))
        .with_context(|| format!("could not {action} movement {id}"))?;

    match outcome {
        TransitionOutcome::Applied(movement) => {
            if json {
                print_json(&movement)?;
            } else {
                println!("Movement {} is now {}", movement.id, movement.status);
            }
        }
        TransitionOutcome::Stale => {
            // A single-threaded caller never reloads mid-call.
            anyhow::bail!("movement {id} was reloaded while the update ran");
        }
    }
    Ok(())
}
