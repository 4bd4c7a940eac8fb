//! Datatable query parameters and result envelope
//!
//! List views load their rows lazily through the legacy DataTables
//! protocol: the browser sends `sSearch`, `iDisplayStart`, `iDisplayLength`,
//! `iSortCol_0` and `sSortDir_0`, and expects `sEcho`, `iTotalRecords`,
//! `iTotalDisplayRecords` and `aaData` back.
//!
//! # Example
//! ```text
//! GET /proposals/datatable?sSearch=acme&iDisplayStart=10&iDisplayLength=10
//! GET /proposals/datatable?entity_states=active,archived&iSortCol_0=2&sSortDir_0=asc
//! ```

use serde::Serialize;

use crate::core::input::RequestInput;
use crate::core::state::EntityState;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parsed datatable request
#[derive(Debug, Clone)]
pub struct TableQuery {
    /// Free-text search term
    pub search: Option<String>,

    /// Echo token returned untouched
    pub echo: u64,

    /// Row offset
    pub start: usize,

    /// Page size, `None` for "all rows"
    pub length: Option<usize>,

    /// Index of the sort column
    pub sort_column: Option<usize>,

    pub sort_direction: SortDirection,

    /// Entity states to include
    pub states: Vec<EntityState>,
}

impl TableQuery {
    /// Read the query from request input
    ///
    /// `page_size` applies when `iDisplayLength` is missing, `max_page_size`
    /// clamps explicit values. `iDisplayLength=-1` requests every row.
    pub fn from_input(input: &RequestInput, page_size: usize, max_page_size: usize) -> Self {
        let max_page_size = max_page_size.max(1);
        let length = match input
            .get_str("iDisplayLength")
            .and_then(|s| s.parse::<i64>().ok())
        {
            Some(-1) => None,
            Some(n) => Some((n.max(1) as usize).min(max_page_size)),
            None => Some(page_size.clamp(1, max_page_size)),
        };

        let sort_direction = match input.get_str("sSortDir_0").as_deref() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        Self {
            search: input.get_str("sSearch"),
            echo: parse_or(input, "sEcho", 0),
            start: parse_or(input, "iDisplayStart", 0),
            length,
            sort_column: input.get_str("iSortCol_0").and_then(|s| s.parse().ok()),
            sort_direction,
            states: EntityState::parse_list(input.get_str("entity_states").as_deref()),
        }
    }

    /// Slice one page out of already sorted rows
    pub fn paginate<T>(&self, rows: Vec<T>) -> Vec<T> {
        let rows = rows.into_iter().skip(self.start);
        match self.length {
            Some(length) => rows.take(length).collect(),
            None => rows.collect(),
        }
    }
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: None,
            echo: 0,
            start: 0,
            length: Some(10),
            sort_column: None,
            sort_direction: SortDirection::Desc,
            states: vec![EntityState::Active],
        }
    }
}

fn parse_or<T: std::str::FromStr>(input: &RequestInput, key: &str, default: T) -> T {
    input
        .get_str(key)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Datatable response envelope
#[derive(Debug, Clone, Serialize)]
pub struct TableResult {
    #[serde(rename = "sEcho")]
    pub echo: u64,

    /// Rows visible to the requester before searching
    #[serde(rename = "iTotalRecords")]
    pub total_records: usize,

    /// Rows matching the search
    #[serde(rename = "iTotalDisplayRecords")]
    pub total_display_records: usize,

    /// One page of rendered cells
    #[serde(rename = "aaData")]
    pub data: Vec<Vec<String>>,
}
