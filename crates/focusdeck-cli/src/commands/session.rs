//! Interactive dashboard session.
//!
//! A single-threaded cooperative event loop on a current-thread
//! runtime: stdin commands and the 1-second countdown tick interleave
//! through `select!`, and nothing blocks. At most one recurring ticker
//! exists at a time -- every timer transition cancels it before arming
//! a new one -- and the timer itself lives only as long as the session.

use std::io::Write;
use std::time::Duration;

use focusdeck_core::{App, Priority, Status, StatusFilter, TimerPhase};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::render;

const TICK_PERIOD: Duration = Duration::from_secs(1);

type InputLines = Lines<BufReader<Stdin>>;

enum Input {
    Tick,
    Command(String),
    Eof,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let app = super::load_app()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(app))
}

async fn event_loop(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    render::dashboard(&mut app)?;
    render::help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Interval> = None;

    loop {
        let input = tokio::select! {
            _ = next_tick(&mut ticker) => Input::Tick,
            line = lines.next_line() => match line? {
                Some(line) => Input::Command(line),
                None => Input::Eof,
            },
        };

        match input {
            Input::Tick => match app.timer_tick()? {
                Some(event) => {
                    // countdown finished; the recurring tick dies with it
                    ticker = None;
                    println!();
                    render::timer(&app);
                    render::event(&event);
                    render::analytics(&mut app)?;
                }
                None => render::timer_line(&app),
            },
            Input::Command(line) => {
                if !dispatch(&mut app, &mut ticker, &mut lines, line.trim()).await? {
                    break;
                }
            }
            Input::Eof => break,
        }
    }
    Ok(())
}

/// Resolves on the next recurring tick; never resolves while no ticker
/// is armed.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Cancel-before-start: drop any armed ticker, then arm a fresh one
/// only while the countdown is running.
fn sync_ticker(app: &App, ticker: &mut Option<Interval>) {
    *ticker = None;
    if app.timer().phase() == TimerPhase::Running {
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        *ticker = Some(interval);
    }
}

/// Handle one command line. Returns `false` when the session ends.
async fn dispatch(
    app: &mut App,
    ticker: &mut Option<Interval>,
    lines: &mut InputLines,
    line: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (command, rest) = split_command(line);
    match command {
        "" => {}

        // timer
        "start" | "pause" | "toggle" => {
            app.timer_toggle();
            sync_ticker(app, ticker);
            render::timer(app);
        }
        "reset" => {
            app.timer_reset();
            sync_ticker(app, ticker);
            render::timer(app);
        }
        "preset" => {
            match preset_index(rest) {
                Some(index) => {
                    app.timer_select_preset(index);
                }
                None => debug!(rest, "unrecognized preset, ignoring"),
            }
            sync_ticker(app, ticker);
            render::timer(app);
        }
        "custom" => {
            // out-of-range or unparseable minutes are silently ignored
            if let Ok(minutes) = rest.parse::<u32>() {
                app.timer_set_custom(minutes);
            }
            sync_ticker(app, ticker);
            render::timer(app);
        }
        "status" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&app.timer().snapshot())?
            );
        }

        // task board
        "add" => {
            let new_task = parse_add(rest);
            app.add_task(
                &new_task.title,
                new_task.priority,
                &new_task.tags,
                new_task.due,
            )?;
            render::board(app);
        }
        "edit" => {
            if let Ok(id) = rest.parse::<u64>() {
                if let Some(title) = prompt_line(lines, "new title: ").await? {
                    app.rename_task(id, &title)?;
                }
            }
            render::board(app);
        }
        "move" => {
            let mut words = rest.split_whitespace();
            let id = words.next().and_then(|w| w.parse::<u64>().ok());
            let status = words.next().and_then(|w| w.parse::<Status>().ok());
            if let (Some(id), Some(status)) = (id, status) {
                if let Some(event) = app.move_task(id, status)? {
                    render::event(&event);
                }
            }
            render::board(app);
        }
        "pomo" | "pomodoro" => {
            if let Ok(id) = rest.parse::<u64>() {
                app.increment_pomodoro(id)?;
            }
            render::board(app);
        }
        "del" | "delete" => {
            if let Ok(id) = rest.parse::<u64>() {
                app.delete_task(id)?;
            }
            render::board(app);
        }
        "tags" => {
            let tags = app.board().tag_universe();
            if tags.is_empty() {
                println!("no tags yet");
            } else {
                println!("{}", tags.join(", "));
            }
        }
        "board" | "ls" => render::board(app),

        // filter (read-side only, never persisted)
        "filter" => {
            let mut words = rest.split_whitespace();
            match words.next() {
                Some("tag") => {
                    app.set_tag_filter(words.next().map(str::to_string));
                }
                Some("clear") => {
                    app.set_status_filter(StatusFilter::All);
                    app.set_tag_filter(None);
                }
                Some(word) => {
                    if let Ok(status) = word.parse::<StatusFilter>() {
                        app.set_status_filter(status);
                    }
                }
                None => {}
            }
            render::board(app);
        }

        // auth + analytics + theme
        "login" => {
            app.login(rest)?;
            render::auth(app);
            render::analytics(app)?;
        }
        "logout" => {
            app.logout()?;
            render::auth(app);
            render::analytics(app)?;
        }
        "stats" => render::analytics(app)?,
        "theme" => {
            let theme = app.toggle_theme()?;
            println!("theme: {theme}");
        }

        "help" => render::help(),
        "quit" | "exit" | "q" => return Ok(false),
        other => println!("unknown command '{other}' -- `help` lists commands"),
    }
    Ok(true)
}

/// One-line interactive prompt. EOF or an empty line cancels.
async fn prompt_line(
    lines: &mut InputLines,
    prompt: &str,
) -> Result<Option<String>, std::io::Error> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    match lines.next_line().await? {
        Some(line) if !line.trim().is_empty() => Ok(Some(line)),
        _ => Ok(None),
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

fn preset_index(word: &str) -> Option<usize> {
    match word {
        "work" => Some(0),
        "short" => Some(1),
        "long" => Some(2),
        other => other.parse().ok(),
    }
}

struct NewTask {
    title: String,
    priority: Priority,
    tags: String,
    due: Option<chrono::NaiveDate>,
}

/// Parse `add` arguments: plain words form the title, `#a,b` sets tags,
/// `!high` sets the priority, `@YYYY-MM-DD` sets the due date.
/// Malformed markers are ignored.
fn parse_add(rest: &str) -> NewTask {
    let mut new_task = NewTask {
        title: String::new(),
        priority: Priority::Medium,
        tags: String::new(),
        due: None,
    };
    let mut title_words = Vec::new();
    for word in rest.split_whitespace() {
        if let Some(tags) = word.strip_prefix('#') {
            new_task.tags = tags.to_string();
        } else if let Some(priority) = word.strip_prefix('!') {
            if let Ok(priority) = priority.parse() {
                new_task.priority = priority;
            }
        } else if let Some(due) = word.strip_prefix('@') {
            new_task.due = due.parse().ok();
        } else {
            title_words.push(word);
        }
    }
    new_task.title = title_words.join(" ");
    new_task
}
