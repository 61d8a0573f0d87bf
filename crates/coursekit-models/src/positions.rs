//! Reorder requests for pages and modules.
//!
//! A reorder batch lists sibling ids in their new order. Each entry may carry
//! an explicit `position`; without one, the entry's index in the batch is
//! used. Batches are validated as a whole before anything is written:
//! an id may appear only once and positions must not be negative.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ids::{ModuleId, PageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PagePositionUpdate {
    pub id: PageId,
    pub position: Option<i32>,
    /// New parent. Omitted means "keep the current parent".
    #[serde(default)]
    pub parent_id: Option<PageId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModulePositionUpdate {
    pub id: ModuleId,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReorderResponse {
    pub updated: u64,
}

/// Entry with its effective position resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition<Id> {
    pub id: Id,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    DuplicateId(String),
    NegativePosition { id: String, position: i32 },
    TooMany(usize),
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "Duplicate id in reorder request: {}", id),
            Self::NegativePosition { id, position } => {
                write!(f, "Position for {} must be >= 0, got {}", id, position)
            }
            Self::TooMany(len) => write!(f, "Reorder request has {} entries; the limit is {}", len, MAX_BATCH),
        }
    }
}

impl std::error::Error for PositionError {}

/// Upper bound on a single reorder batch.
pub const MAX_BATCH: usize = 10_000;

fn resolve<Id>(
    entries: impl ExactSizeIterator<Item = (Id, Option<i32>)>,
) -> Result<Vec<ResolvedPosition<Id>>, PositionError>
where
    Id: Copy + Eq + Hash + fmt::Display,
{
    if entries.len() > MAX_BATCH {
        return Err(PositionError::TooMany(entries.len()));
    }

    let mut seen = HashSet::with_capacity(entries.len());
    let mut resolved = Vec::with_capacity(entries.len());

    for (index, (id, position)) in entries.enumerate() {
        if !seen.insert(id) {
            return Err(PositionError::DuplicateId(id.to_string()));
        }
        let position = match position {
            Some(p) if p < 0 => {
                return Err(PositionError::NegativePosition {
                    id: id.to_string(),
                    position: p,
                });
            }
            Some(p) => p,
            None => i32::try_from(index).map_err(|_| PositionError::TooMany(index))?,
        };
        resolved.push(ResolvedPosition { id, position });
    }

    Ok(resolved)
}

pub fn resolve_page_positions(
    updates: &[PagePositionUpdate],
) -> Result<Vec<ResolvedPosition<PageId>>, PositionError> {
    resolve(updates.iter().map(|u| (u.id, u.position)))
}

pub fn resolve_module_positions(
    updates: &[ModulePositionUpdate],
) -> Result<Vec<ResolvedPosition<ModuleId>>, PositionError> {
    resolve(updates.iter().map(|u| (u.id, u.position)))
}
