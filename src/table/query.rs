//! # Query Engine
//!
//! Five fixed lookup shapes over a loaded [`Table`]. Every lookup is a
//! top-to-bottom scan with exact, case-sensitive string equality; result
//! order follows row order and duplicates are kept.
//!
//! `execute()` is a pure function of `(table, query)`. The "all rosters"
//! shapes run one community scan per community found, so they are
//! O(communities × rows) and flagged as slow via [`Query::is_slow`].

use std::fmt;

use log::debug;

use super::{Table, TableError};

pub const NAME_COLUMN: &str = "Name";
pub const COMMUNITY_COLUMN: &str = "Community Name";
pub const EMAIL_COLUMN: &str = "Email Address";

/// A single lookup request, built once when the user submits the query form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Row indices where `Name` equals the value.
    RowsByName(String),
    /// `Community Name` of every row whose `Name` equals the value.
    CommunitiesByName(String),
    /// Values of `column` on every row whose `Community Name` equals `community`.
    RosterColumnByCommunity { community: String, column: String },
    /// For each community of the named person, that community's `Name` column.
    AllRosterNamesByName(String),
    /// For each community of the named person, that community's `Email Address` column.
    AllRosterEmailsByName(String),
}

impl Query {
    /// The user-supplied search string this query carries.
    pub fn search_text(&self) -> &str {
        match self {
            Query::RowsByName(name)
            | Query::CommunitiesByName(name)
            | Query::AllRosterNamesByName(name)
            | Query::AllRosterEmailsByName(name) => name,
            Query::RosterColumnByCommunity { community, .. } => community,
        }
    }

    /// True for the shapes that rescan the table once per community.
    pub fn is_slow(&self) -> bool {
        matches!(
            self,
            Query::AllRosterNamesByName(_) | Query::AllRosterEmailsByName(_)
        )
    }

    pub fn describe(&self) -> String {
        match self {
            Query::RowsByName(name) => format!("Rows for '{name}'"),
            Query::CommunitiesByName(name) => format!("Communities for '{name}'"),
            Query::RosterColumnByCommunity { community, column } => {
                format!("{column} for community '{community}'")
            }
            Query::AllRosterNamesByName(name) => format!("All roster names for '{name}'"),
            Query::AllRosterEmailsByName(name) => format!("All roster emails for '{name}'"),
        }
    }
}

/// The fixed options offered by the query form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    CommunitiesByName,
    RosterNamesByCommunity,
    RosterEmailsByCommunity,
    AllRosterNamesByName,
    AllRosterEmailsByName,
    RowsByName,
}

impl QueryKind {
    pub const ALL: [QueryKind; 6] = [
        QueryKind::CommunitiesByName,
        QueryKind::RosterNamesByCommunity,
        QueryKind::RosterEmailsByCommunity,
        QueryKind::AllRosterNamesByName,
        QueryKind::AllRosterEmailsByName,
        QueryKind::RowsByName,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            QueryKind::CommunitiesByName => "Communities for a name",
            QueryKind::RosterNamesByCommunity => "Roster names for a community",
            QueryKind::RosterEmailsByCommunity => "Roster emails for a community",
            QueryKind::AllRosterNamesByName => "All roster names for a name (slow)",
            QueryKind::AllRosterEmailsByName => "All roster emails for a name (slow)",
            QueryKind::RowsByName => "Spreadsheet rows for a name",
        }
    }

    pub fn build(self, search: String) -> Query {
        match self {
            QueryKind::CommunitiesByName => Query::CommunitiesByName(search),
            QueryKind::RosterNamesByCommunity => Query::RosterColumnByCommunity {
                community: search,
                column: NAME_COLUMN.to_string(),
            },
            QueryKind::RosterEmailsByCommunity => Query::RosterColumnByCommunity {
                community: search,
                column: EMAIL_COLUMN.to_string(),
            },
            QueryKind::AllRosterNamesByName => Query::AllRosterNamesByName(search),
            QueryKind::AllRosterEmailsByName => Query::AllRosterEmailsByName(search),
            QueryKind::RowsByName => Query::RowsByName(search),
        }
    }
}

/// Result shape depends on the query; flat and nested results are logged differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Rows(Vec<usize>),
    Flat(Vec<String>),
    Nested(Vec<Vec<String>>),
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        match self {
            QueryResult::Rows(rows) => rows.is_empty(),
            QueryResult::Flat(values) => values.is_empty(),
            QueryResult::Nested(groups) => groups.is_empty(),
        }
    }
}

/// Why a query could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The loaded table lacks a column the query references.
    UnknownColumn(String),
    /// No table has been loaded yet, or a load is still in flight.
    NoTableLoaded,
    /// Another query is already running.
    Busy,
    /// The worker running the query died before reporting back.
    Aborted(String),
}

impl QueryError {
    /// Fixed, short text for the activity log.
    pub fn reason(&self) -> String {
        match self {
            QueryError::UnknownColumn(name) => format!("Unknown column '{name}'"),
            QueryError::NoTableLoaded => "No table loaded".to_string(),
            QueryError::Busy => "A query is already running".to_string(),
            QueryError::Aborted(_) => "Query aborted".to_string(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownColumn(name) => write!(f, "unknown column '{name}'"),
            QueryError::NoTableLoaded => write!(f, "no table loaded"),
            QueryError::Busy => write!(f, "query already in flight"),
            QueryError::Aborted(detail) => write!(f, "query aborted: {detail}"),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<TableError> for QueryError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::UnknownColumn(name) => QueryError::UnknownColumn(name),
            // Build-time errors never come out of lookups on a built table
            other => QueryError::Aborted(other.to_string()),
        }
    }
}

/// Indices of rows whose `column` cell equals `value`, in row order.
pub fn find_row_indices(table: &Table, column: &str, value: &str) -> Result<Vec<usize>, TableError> {
    let cells = table.column(column)?;
    Ok(cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| **cell == value)
        .map(|(index, _)| index)
        .collect())
}

fn gather(table: &Table, column: &str, indices: &[usize]) -> Result<Vec<String>, TableError> {
    let cells = table.column(column)?;
    Ok(indices.iter().map(|&i| cells[i].to_string()).collect())
}

fn communities_by_name(table: &Table, name: &str) -> Result<Vec<String>, TableError> {
    let indices = find_row_indices(table, NAME_COLUMN, name)?;
    gather(table, COMMUNITY_COLUMN, &indices)
}

fn roster_column(table: &Table, community: &str, column: &str) -> Result<Vec<String>, TableError> {
    let indices = find_row_indices(table, COMMUNITY_COLUMN, community)?;
    gather(table, column, &indices)
}

fn all_rosters(table: &Table, name: &str, column: &str) -> Result<Vec<Vec<String>>, TableError> {
    // Referenced column must exist even when the person has no communities.
    table.column_index(column)?;
    communities_by_name(table, name)?
        .iter()
        .map(|community| roster_column(table, community, column))
        .collect()
}

/// Run a query against a table. Pure; calling twice yields identical results.
pub fn execute(table: &Table, query: &Query) -> Result<QueryResult, QueryError> {
    debug!("Executing query: {:?}", query);
    let result = match query {
        Query::RowsByName(name) => QueryResult::Rows(find_row_indices(table, NAME_COLUMN, name)?),
        Query::CommunitiesByName(name) => QueryResult::Flat(communities_by_name(table, name)?),
        Query::RosterColumnByCommunity { community, column } => {
            table.column_index(column)?;
            QueryResult::Flat(roster_column(table, community, column)?)
        }
        Query::AllRosterNamesByName(name) => {
            QueryResult::Nested(all_rosters(table, name, NAME_COLUMN)?)
        }
        Query::AllRosterEmailsByName(name) => {
            QueryResult::Nested(all_rosters(table, name, EMAIL_COLUMN)?)
        }
    };
    Ok(result)
}
