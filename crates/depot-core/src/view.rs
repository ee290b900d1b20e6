//! The movements table: filtering, column visibility, sorting and the
//! render model handed to whichever presentation layer draws it.
//!
//! `DataView` owns the records it displays but never edits them through the
//! filters. Every filter, sort or data change invalidates a cached row list;
//! the list is rebuilt lazily on the next `rows()` / `render()` call and
//! reused until something relevant changes again.

use crate::error::{DepotError, Result};
use crate::filter::{parse_date_filter, MovementFilter};
use crate::movement::Movement;
use crate::table::{ActionDescriptor, ColumnDescriptor, MovementColumn};
use crate::types::{ActionKind, SortDirection, TypeFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Placeholder rows drawn while the collection is loading.
pub const SKELETON_ROWS: usize = 5;

pub const EMPTY_MESSAGE: &str = "No movement requests match the current filters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: MovementColumn,
    pub direction: SortDirection,
}

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    pub column: MovementColumn,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub id: u64,
    pub cells: Vec<RenderedCell>,
    pub actions: Vec<ActionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableRender {
    Loading {
        columns: Vec<ColumnDescriptor>,
        skeleton_rows: usize,
    },
    Empty {
        columns: Vec<ColumnDescriptor>,
        message: String,
        can_reset: bool,
    },
    Rows {
        columns: Vec<ColumnDescriptor>,
        rows: Vec<RenderedRow>,
    },
}

impl TableRender {
    pub fn columns(&self) -> &[ColumnDescriptor] {
        match self {
            TableRender::Loading { columns, .. }
            | TableRender::Empty { columns, .. }
            | TableRender::Rows { columns, .. } => columns,
        }
    }
}

// ---------------------------------------------------------------------------
// DataView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct RowCacheKey {
    filter: MovementFilter,
    sort: Option<SortState>,
    revision: u64,
}

#[derive(Debug)]
pub struct DataView {
    records: Vec<Movement>,
    columns: Vec<ColumnDescriptor>,
    actions: Vec<ActionDescriptor>,
    loading: bool,
    filter: MovementFilter,
    sort: Option<SortState>,
    visible: BTreeMap<MovementColumn, bool>,
    revision: u64,
    cache: Option<(RowCacheKey, Arc<Vec<usize>>)>,
    recomputes: u64,
}

impl DataView {
    pub fn new(columns: Vec<ColumnDescriptor>, actions: Vec<ActionDescriptor>) -> Self {
        let visible = columns.iter().map(|c| (c.column, true)).collect();
        Self {
            records: Vec::new(),
            columns,
            actions,
            loading: false,
            filter: MovementFilter::default(),
            sort: None,
            visible,
            revision: 0,
            cache: None,
            recomputes: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Data
    // -----------------------------------------------------------------------

    pub fn records(&self) -> &[Movement] {
        &self.records
    }

    pub fn record(&self, id: u64) -> Option<&Movement> {
        self.records.iter().find(|m| m.id == id)
    }

    pub fn set_records(&mut self, records: Vec<Movement>) {
        self.records = records;
        self.revision += 1;
    }

    /// Swap in a newer copy of one record. Returns false if no record has its id.
    pub fn replace_record(&mut self, updated: Movement) -> bool {
        match self.records.iter_mut().find(|m| m.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    pub fn filter(&self) -> &MovementFilter {
        &self.filter
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
    }

    pub fn set_type_filter(&mut self, movement_type: TypeFilter) {
        self.filter.movement_type = movement_type;
    }

    /// Set the date filter from its ISO text form; empty input clears it.
    pub fn set_date_filter(&mut self, raw: &str) -> Result<()> {
        self.filter.date = parse_date_filter(raw)?;
        Ok(())
    }

    /// Replace all three filters at once.
    pub fn set_filter(&mut self, filter: MovementFilter) {
        self.filter = filter;
    }

    /// Reset search, type and date filters in one step.
    pub fn reset_filters(&mut self) {
        self.filter = MovementFilter::default();
    }

    // -----------------------------------------------------------------------
    // Columns
    // -----------------------------------------------------------------------

    pub fn is_visible(&self, column: MovementColumn) -> bool {
        self.visible.get(&column).copied().unwrap_or(false)
    }

    pub fn visible_columns(&self) -> &BTreeMap<MovementColumn, bool> {
        &self.visible
    }

    /// Flip one column's visibility. Returns the new state.
    pub fn toggle_column(&mut self, column: MovementColumn) -> Result<bool> {
        let flag = self
            .visible
            .get_mut(&column)
            .ok_or_else(|| DepotError::InvalidColumn(column.to_string()))?;
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn toggle_column_key(&mut self, key: &str) -> Result<bool> {
        let column: MovementColumn = key.parse()?;
        self.toggle_column(column)
    }

    pub fn set_column_visible(&mut self, column: MovementColumn, visible: bool) -> Result<()> {
        let flag = self
            .visible
            .get_mut(&column)
            .ok_or_else(|| DepotError::InvalidColumn(column.to_string()))?;
        *flag = visible;
        Ok(())
    }

    /// Hide every listed column; the rest keep their current state.
    pub fn hide_columns(&mut self, hidden: &[MovementColumn]) {
        for (column, visible) in self.visible.iter_mut() {
            if hidden.contains(column) {
                *visible = false;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Sorting
    // -----------------------------------------------------------------------

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Sort by `column`; picking the active column again flips the direction.
    pub fn sort_by(&mut self, column: MovementColumn) -> Result<SortState> {
        let descriptor = self
            .columns
            .iter()
            .find(|c| c.column == column)
            .ok_or_else(|| DepotError::InvalidColumn(column.to_string()))?;
        if !descriptor.sortable {
            return Err(DepotError::NotSortable(column.to_string()));
        }
        let next = match self.sort {
            Some(current) if current.column == column => SortState {
                column,
                direction: current.direction.flipped(),
            },
            _ => SortState {
                column,
                direction: SortDirection::Asc,
            },
        };
        self.sort = Some(next);
        Ok(next)
    }

    pub fn set_sort(&mut self, column: MovementColumn, direction: SortDirection) -> Result<()> {
        self.sort_by(column)?;
        self.sort = Some(SortState { column, direction });
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    // -----------------------------------------------------------------------
    // Derived rows
    // -----------------------------------------------------------------------

    /// Indices of the records that pass the filters, in display order.
    pub fn rows(&mut self) -> Arc<Vec<usize>> {
        let key = RowCacheKey {
            filter: self.filter.clone(),
            sort: self.sort,
            revision: self.revision,
        };
        if let Some((cached_key, rows)) = &self.cache {
            if *cached_key == key {
                return Arc::clone(rows);
            }
        }

        let mut rows = self.filter.apply(&self.records);
        if let Some(sort) = self.sort {
            let records = &self.records;
            rows.sort_by(|&a, &b| {
                let ord = sort.column.compare(&records[a], &records[b]);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        self.recomputes += 1;
        debug!(
            total = self.records.len(),
            shown = rows.len(),
            "recomputed movement rows"
        );

        let rows = Arc::new(rows);
        self.cache = Some((key, Arc::clone(&rows)));
        rows
    }

    /// The filtered records themselves, in display order.
    pub fn visible_records(&mut self) -> Vec<&Movement> {
        let rows = self.rows();
        rows.iter().map(|&i| &self.records[i]).collect()
    }

    /// How many times the row list has been rebuilt.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn render(&mut self) -> TableRender {
        let columns: Vec<ColumnDescriptor> = self
            .columns
            .iter()
            .filter(|c| self.is_visible(c.column))
            .cloned()
            .collect();

        if self.loading {
            return TableRender::Loading {
                columns,
                skeleton_rows: SKELETON_ROWS,
            };
        }

        let rows = self.rows();
        if rows.is_empty() {
            return TableRender::Empty {
                columns,
                message: EMPTY_MESSAGE.to_string(),
                can_reset: !self.filter.is_default(),
            };
        }

        let show_actions = self.is_visible(MovementColumn::Actions);
        let rendered = rows
            .iter()
            .map(|&i| {
                let m = &self.records[i];
                RenderedRow {
                    id: m.id,
                    cells: columns
                        .iter()
                        .filter(|c| c.column != MovementColumn::Actions)
                        .map(|c| RenderedCell {
                            column: c.column,
                            value: c.column.cell(m),
                        })
                        .collect(),
                    actions: if show_actions {
                        self.actions_for(m)
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect();

        TableRender::Rows {
            columns,
            rows: rendered,
        }
    }

    /// Actions offered on a record: transitions exist only out of `pending`.
    pub fn actions_for(&self, m: &Movement) -> Vec<ActionDescriptor> {
        self.actions
            .iter()
            .filter(|a| m.status.can_transition_to(a.kind.target_status()))
            .cloned()
            .collect()
    }

    pub fn offers(&self, m: &Movement, kind: ActionKind) -> bool {
        self.actions_for(m).iter().any(|a| a.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
