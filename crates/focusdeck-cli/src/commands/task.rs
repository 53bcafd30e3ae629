//! Task board commands.

use chrono::NaiveDate;
use clap::Subcommand;
use focusdeck_core::{Priority, Status};

use crate::render;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the To Do column
    Add {
        /// Task title
        title: String,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List the board, column by column
    List {
        /// Status filter: all, completed or pending
        #[arg(long, default_value = "all")]
        status: String,
        /// Keep only tasks carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Print the raw board as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a task
    Edit {
        /// Task ID
        id: u64,
        /// New title
        title: String,
    },
    /// Move a task to another column: todo, inprogress or done
    Move {
        /// Task ID
        id: u64,
        /// Target column
        column: String,
    },
    /// Count a completed pomodoro against a task
    Pomodoro {
        /// Task ID
        id: u64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: u64,
    },
    /// List every distinct tag on the board
    Tags,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = super::load_app()?;

    match action {
        TaskAction::Add {
            title,
            priority,
            tags,
            due,
        } => {
            let priority: Priority = priority.parse()?;
            let due = match due {
                Some(d) => Some(d.parse::<NaiveDate>()?),
                None => None,
            };
            match app.add_task(&title, priority, &tags, due)? {
                Some(id) => println!("Task added: #{id}"),
                None => println!("nothing to add (empty title)"),
            }
        }
        TaskAction::List { status, tag, json } => {
            app.set_status_filter(status.parse()?);
            app.set_tag_filter(tag);
            if json {
                println!("{}", serde_json::to_string_pretty(app.board())?);
            } else {
                render::board(&app);
            }
        }
        TaskAction::Edit { id, title } => {
            if app.rename_task(id, &title)? {
                println!("Task #{id} renamed");
            } else {
                println!("Task #{id} unchanged");
            }
        }
        TaskAction::Move { id, column } => {
            let status: Status = column.parse()?;
            match app.move_task(id, status)? {
                Some(event) => {
                    println!("Task #{id} moved to {}", status.column_name());
                    render::event(&event);
                }
                None => println!("Task #{id} unchanged"),
            }
        }
        TaskAction::Pomodoro { id } => {
            if app.increment_pomodoro(id)? {
                let count = app.board().get(id).map(|t| t.pomodoros).unwrap_or(0);
                println!("Task #{id} pomodoros: {count}");
            } else {
                println!("no such task: #{id}");
            }
        }
        TaskAction::Delete { id } => {
            if app.delete_task(id)? {
                println!("Task #{id} deleted");
            } else {
                println!("no such task: #{id}");
            }
        }
        TaskAction::Tags => {
            for tag in app.board().tag_universe() {
                println!("{tag}");
            }
        }
    }
    Ok(())
}
