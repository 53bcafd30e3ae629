//! Read-side projection of the board.
//!
//! Filters derive the visible subset; they never touch task data and
//! are not persisted.

use std::str::FromStr;

use super::{Status, Task};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Only the done column's contents.
    Completed,
    /// Everything except the done column's contents.
    Pending,
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            other => Err(ValidationError::unknown_variant("filter", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub tag: Option<String>,
}

impl TaskFilter {
    pub fn admits(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Completed => task.status == Status::Done,
            StatusFilter::Pending => task.status != Status::Done,
        };
        let tag_ok = self
            .tag
            .as_ref()
            .map_or(true, |tag| task.tags.iter().any(|t| t == tag));
        status_ok && tag_ok
    }

    pub fn is_default(&self) -> bool {
        self.status == StatusFilter::All && self.tag.is_none()
    }
}
