//! Task board: columned tasks with monotonically assigned ids.
//!
//! The board is one aggregate -- tasks plus the id counter -- persisted
//! whole after every mutation. Ids are never reused. Moving a task
//! between columns replaces the original drag-and-drop gesture.

mod filter;

pub use filter::{StatusFilter, TaskFilter};

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::unknown_variant("priority", other)),
        }
    }
}

/// Board column a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// Column display order.
    pub const COLUMNS: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn column_name(&self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Status::Todo),
            "inprogress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(ValidationError::unknown_variant("status", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    pub status: Status,
    #[serde(default)]
    pub pomodoros: u32,
}

/// The board aggregate. `last_id >= max(task id)` always holds; deleting
/// a task never rewinds the counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBoard {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub last_id: u64,
}

/// Split comma-separated tag input into distinct, trimmed, non-empty
/// tags, preserving first-seen order.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

impl TaskBoard {
    /// Append a task to the To Do column. An empty title (after
    /// trimming) is a no-op. Returns the new task's id.
    pub fn add_task(
        &mut self,
        title: &str,
        priority: Priority,
        tags_input: &str,
        due: Option<NaiveDate>,
    ) -> Option<u64> {
        let title = title.trim();
        if title.is_empty() {
            debug!("empty task title, ignoring");
            return None;
        }
        self.last_id += 1;
        let id = self.last_id;
        self.tasks.push(Task {
            id,
            title: title.to_string(),
            priority,
            tags: parse_tags(tags_input),
            due,
            status: Status::Todo,
            pomodoros: 0,
        });
        Some(id)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove the matching task. Unknown ids are a no-op.
    pub fn delete_task(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Replace a task's title with the trimmed input. Unknown ids and
    /// empty input (a cancelled prompt) are a no-op.
    pub fn rename_task(&mut self, id: u64, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(task) => {
                task.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Count one more completed pomodoro against a task.
    pub fn increment_pomodoro(&mut self, id: u64) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.pomodoros += 1;
                true
            }
            None => false,
        }
    }

    /// Reassign a task to another column. Unknown ids and moves to the
    /// task's current column are a no-op; returns whether anything
    /// changed.
    pub fn move_task(&mut self, id: u64, status: Status) -> bool {
        match self.get_mut(id) {
            Some(task) if task.status != status => {
                debug!(id, from = ?task.status, to = ?status, "task moved");
                task.status = status;
                true
            }
            _ => false,
        }
    }

    /// Every distinct non-empty tag on the board, sorted for stable
    /// display in the filter bar.
    pub fn tag_universe(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .tasks
            .iter()
            .flat_map(|t| t.tags.iter())
            .filter(|t| !t.is_empty())
            .cloned()
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Tasks admitted by the filter, in insertion order.
    pub fn visible(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.admits(t)).collect()
    }

    /// The filtered contents of one column.
    pub fn column(&self, status: Status, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == status && filter.admits(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(titles: &[&str]) -> TaskBoard {
        let mut board = TaskBoard::default();
        for title in titles {
            board.add_task(title, Priority::Medium, "", None);
        }
        board
    }

    #[test]
    fn add_task_assigns_monotonic_ids() {
        let mut board = board_with(&["a", "b"]);
        assert_eq!(board.last_id, 2);

        board.delete_task(2);
        let id = board.add_task("c", Priority::Low, "", None);
        assert_eq!(id, Some(3));
        assert_eq!(board.last_id, 3);
        // ids are never reused
        assert!(board.get(2).is_none());
    }

    #[test]
    fn add_task_sets_initial_fields() {
        let mut board = TaskBoard::default();
        let id = board
            .add_task("X", Priority::High, "a,b", None)
            .unwrap();
        let task = board.get(id).unwrap();
        assert_eq!(task.title, "X");
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.pomodoros, 0);
        assert_eq!(task.tags, vec!["a", "b"]);
        assert_eq!(task.due, None);
        assert_eq!(task.id, board.last_id);
    }

    #[test]
    fn add_task_with_empty_title_is_noop() {
        let mut board = TaskBoard::default();
        assert!(board.add_task("", Priority::High, "", None).is_none());
        assert!(board.add_task("   ", Priority::High, "", None).is_none());
        assert!(board.tasks.is_empty());
        assert_eq!(board.last_id, 0);
    }

    #[test]
    fn add_task_trims_title() {
        let mut board = TaskBoard::default();
        let id = board.add_task("  roof  ", Priority::Low, "", None).unwrap();
        assert_eq!(board.get(id).unwrap().title, "roof");
    }

    #[test]
    fn parse_tags_trims_and_dedupes() {
        assert_eq!(parse_tags("a,b"), vec!["a", "b"]);
        assert_eq!(parse_tags(" a , b ,, a "), vec!["a", "b"]);
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn delete_task_removes_exactly_that_task() {
        let mut board = board_with(&["a", "b", "c"]);
        assert!(board.delete_task(2));
        assert_eq!(
            board.tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut board = board_with(&["a"]);
        assert!(!board.delete_task(99));
        assert_eq!(board.tasks.len(), 1);
    }

    #[test]
    fn rename_trims_and_ignores_empty() {
        let mut board = board_with(&["a"]);
        assert!(board.rename_task(1, "  new title "));
        assert_eq!(board.get(1).unwrap().title, "new title");

        assert!(!board.rename_task(1, "   "));
        assert_eq!(board.get(1).unwrap().title, "new title");
        assert!(!board.rename_task(99, "x"));
    }

    #[test]
    fn increment_pomodoro_counts_up() {
        let mut board = board_with(&["a"]);
        assert!(board.increment_pomodoro(1));
        assert!(board.increment_pomodoro(1));
        assert_eq!(board.get(1).unwrap().pomodoros, 2);
        assert!(!board.increment_pomodoro(99));
    }

    #[test]
    fn move_task_to_same_column_is_noop() {
        let mut board = board_with(&["a"]);
        assert!(!board.move_task(1, Status::Todo));
        assert!(board.move_task(1, Status::Done));
        assert!(!board.move_task(1, Status::Done));
        assert_eq!(board.get(1).unwrap().status, Status::Done);
    }

    #[test]
    fn tag_universe_is_sorted_and_distinct() {
        let mut board = TaskBoard::default();
        board.add_task("a", Priority::Low, "urgent,home", None);
        board.add_task("b", Priority::Low, "home,yard", None);
        assert_eq!(board.tag_universe(), vec!["home", "urgent", "yard"]);
    }

    #[test]
    fn board_serializes_with_original_field_names() {
        let mut board = TaskBoard::default();
        board.add_task("X", Priority::High, "a", None);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["lastId"], 1);
        assert_eq!(json["tasks"][0]["status"], "todo");
        assert_eq!(json["tasks"][0]["priority"], "high");
        assert_eq!(json["tasks"][0]["pomodoros"], 0);
        assert_eq!(json["tasks"][0]["due"], serde_json::Value::Null);

        let back: TaskBoard = serde_json::from_value(json).unwrap();
        assert_eq!(back.last_id, 1);
        assert_eq!(back.tasks[0].tags, vec!["a"]);
    }

    #[test]
    fn status_parse_accepts_column_ids() {
        assert_eq!("todo".parse::<Status>().unwrap(), Status::Todo);
        assert_eq!("inprogress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("done".parse::<Status>().unwrap(), Status::Done);
        assert!("doing".parse::<Status>().is_err());
    }
}
