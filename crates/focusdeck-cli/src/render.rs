//! Full-view renderers.
//!
//! Every view is regenerated from current state in full after each
//! mutation -- nothing is patched incrementally, so a view can never
//! diverge from the state it was drawn from.

use std::io::Write;

use focusdeck_core::timer::{TimerPhase, TimerSnapshot};
use focusdeck_core::{App, DailyStats, Event, Status, StatusFilter, Task};

const GAUGE_WIDTH: usize = 24;

/// All four views at once, the session's opening screen.
pub fn dashboard(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    auth(app);
    timer(app);
    board(app);
    analytics(app)?;
    Ok(())
}

pub fn auth(app: &App) {
    match app.user() {
        Some(user) => println!("Welcome, {} (theme: {})", user.username, app.theme()),
        None => println!(
            "Not logged in -- `login <username>` to track stats (theme: {})",
            app.theme()
        ),
    }
}

pub fn timer(app: &App) {
    let snap = app.timer().snapshot();
    println!();
    println!("Pomodoro Timer");
    println!(
        "  [{}] {}  {}",
        gauge(&snap),
        snap.display,
        phase_name(snap.phase)
    );
    let presets = app
        .timer()
        .presets()
        .iter()
        .map(|p| format!("{} {}m", p.label, p.minutes))
        .collect::<Vec<_>>()
        .join(", ");
    println!("  presets: {presets}");
}

/// Compact per-tick timer line, redrawn in place.
pub fn timer_line(app: &App) {
    let snap = app.timer().snapshot();
    print!(
        "\r  [{}] {}  {}   ",
        gauge(&snap),
        snap.display,
        phase_name(snap.phase)
    );
    let _ = std::io::stdout().flush();
}

pub fn board(app: &App) {
    let board = app.board();
    let filter = app.filter();
    println!();
    println!("Task Board");
    let tag_note = filter
        .tag
        .as_deref()
        .map(|t| format!(" + tag '{t}'"))
        .unwrap_or_default();
    println!("  filter: {}{}", filter_name(filter.status), tag_note);
    let tags = board.tag_universe();
    if !tags.is_empty() {
        println!("  tags: {}", tags.join(", "));
    }
    for status in Status::COLUMNS {
        println!("  {}", status.column_name());
        let tasks = board.column(status, filter);
        if tasks.is_empty() {
            println!("    (empty)");
        }
        for task in tasks {
            println!("    {}", task_line(task));
        }
    }
}

pub fn analytics(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("Productivity Analytics");
    if app.user().is_none() {
        println!("  Login to see your stats.");
        return Ok(());
    }
    // re-read the ledger so writes from other processes show up
    app.refresh_analytics()?;
    println!("  Today:     {}", stats_line(&app.today_totals()));
    println!("  This Week: {}", stats_line(&app.weekly_totals()));
    Ok(())
}

pub fn event(event: &Event) {
    match event {
        Event::PomodoroCompleted { duration_min, .. } => {
            println!("  * pomodoro complete ({duration_min} min)");
        }
        Event::TaskCompleted { task_id, .. } => {
            println!("  * task #{task_id} completed");
        }
        _ => {}
    }
}

pub fn help() {
    println!();
    println!("commands:");
    println!("  start | pause | reset | preset work|short|long | custom <minutes> | status");
    println!("  add <title> [#tag,tag] [!low|medium|high] [@YYYY-MM-DD]");
    println!("  edit <id> | move <id> todo|inprogress|done | pomo <id> | del <id>");
    println!("  filter all|completed|pending | filter tag <tag> | filter clear | tags | board");
    println!("  login <username> | logout | stats | theme | help | quit");
}

fn gauge(snap: &TimerSnapshot) -> String {
    let (dash, gap) = snap.dash_array;
    let filled = ((dash / (dash + gap)) * GAUGE_WIDTH as f64).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}

fn phase_name(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Idle => "idle",
        TimerPhase::Running => "running",
        TimerPhase::Paused => "paused",
        TimerPhase::Finished => "finished",
    }
}

fn filter_name(status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::All => "all",
        StatusFilter::Completed => "completed",
        StatusFilter::Pending => "pending",
    }
}

fn task_line(task: &Task) -> String {
    let mut line = format!("#{} {} [{}]", task.id, task.title, task.priority.as_str());
    if !task.tags.is_empty() {
        line.push_str(&format!(" tags: {}", task.tags.join(",")));
    }
    if let Some(due) = task.due {
        line.push_str(&format!(" due: {due}"));
    }
    if task.pomodoros > 0 {
        line.push_str(&format!(" pomodoros: {}", task.pomodoros));
    }
    line
}

fn stats_line(stats: &DailyStats) -> String {
    format!(
        "{} pomodoros, {} min spent, {} tasks done",
        stats.pomodoros, stats.time, stats.tasks
    )
}
