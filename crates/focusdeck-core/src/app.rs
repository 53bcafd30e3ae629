//! Shared application state.
//!
//! One `App` value owns every engine plus the injected store handle;
//! frontends call methods on it instead of closing over shared
//! variables. Every mutation follows the same loop: mutate in memory,
//! persist the owning aggregate whole, publish events, and let the
//! caller re-render from state.
//!
//! Completion events are published explicitly at the mutation site that
//! causes them; the analytics ledger subscribes here and drops events
//! while no user is logged in.

use chrono::{Local, NaiveDate, Timelike, Utc};
use tracing::debug;

use crate::analytics::{local_today, Analytics, DailyStats};
use crate::board::{Priority, Status, StatusFilter, TaskBoard, TaskFilter};
use crate::error::StoreError;
use crate::events::Event;
use crate::store::{keys, Config, Store};
use crate::theme::Theme;
use crate::timer::TimerEngine;
use crate::user::User;

pub struct App {
    store: Store,
    user: Option<User>,
    timer: TimerEngine,
    board: TaskBoard,
    filter: TaskFilter,
    analytics: Analytics,
    theme: Theme,
}

impl App {
    /// Load the persisted aggregates through the given store handle.
    ///
    /// Timer state is deliberately not persisted: each App starts on
    /// the first preset. Board, analytics, user and theme are loaded,
    /// falling back to empty aggregates on missing or corrupt records.
    pub fn new(store: Store, config: &Config) -> Result<Self, StoreError> {
        let user = store.load_or_default::<Option<User>>(keys::USER)?;
        let board = store.load_or_default::<TaskBoard>(keys::KANBAN)?;
        let analytics = store.load_or_default::<Analytics>(keys::ANALYTICS)?;
        let theme = store
            .load_or_default::<Option<Theme>>(keys::THEME)?
            .or(config.ui.default_theme)
            .unwrap_or_else(|| Theme::for_hour(Local::now().hour()));
        let timer = TimerEngine::new(
            config.preset_table().to_vec(),
            config.timer.custom_range(),
        );
        Ok(Self {
            store,
            user,
            timer,
            board,
            filter: TaskFilter::default(),
            analytics,
            theme,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Today's counters. Only meaningful to display while logged in.
    pub fn today_totals(&self) -> DailyStats {
        self.analytics.day(self.today())
    }

    /// Counters summed over the trailing 7-day window ending today.
    pub fn weekly_totals(&self) -> DailyStats {
        self.analytics.weekly_totals(self.today())
    }

    fn today(&self) -> NaiveDate {
        local_today()
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Log in. Empty input (after trimming) is a no-op and leaves any
    /// current user in place. Returns whether a user is now logged in.
    pub fn login(&mut self, input: &str) -> Result<bool, StoreError> {
        let Some(user) = User::from_login(input) else {
            return Ok(self.user.is_some());
        };
        self.store.save(keys::USER, &user)?;
        self.user = Some(user);
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.user = None;
        self.store.remove(keys::USER)
    }

    // ── Timer ────────────────────────────────────────────────────────
    //
    // Timer transitions persist nothing. The frontend owning the
    // recurring ticker must mirror the phase after each call: cancel
    // the ticker first, then start a new one only if the countdown is
    // running.

    pub fn timer_toggle(&mut self) -> Option<Event> {
        self.timer.toggle_start_pause()
    }

    pub fn timer_reset(&mut self) -> Option<Event> {
        self.timer.reset()
    }

    pub fn timer_select_preset(&mut self, index: usize) -> Option<Event> {
        self.timer.select_preset(index)
    }

    pub fn timer_set_custom(&mut self, minutes: u32) -> Option<Event> {
        self.timer.set_custom_duration(minutes)
    }

    /// Advance the countdown by one second. A completion is published
    /// to analytics and returned for display.
    pub fn timer_tick(&mut self) -> Result<Option<Event>, StoreError> {
        let event = self.timer.tick();
        if let Some(ref event) = event {
            self.publish(event)?;
        }
        Ok(event)
    }

    // ── Task board ───────────────────────────────────────────────────

    /// Add a task to the To Do column. Empty titles are a no-op; on
    /// success the board is persisted and the new id returned.
    pub fn add_task(
        &mut self,
        title: &str,
        priority: Priority,
        tags_input: &str,
        due: Option<NaiveDate>,
    ) -> Result<Option<u64>, StoreError> {
        let id = self.board.add_task(title, priority, tags_input, due);
        if id.is_some() {
            self.save_board()?;
        }
        Ok(id)
    }

    pub fn delete_task(&mut self, id: u64) -> Result<bool, StoreError> {
        let changed = self.board.delete_task(id);
        if changed {
            self.save_board()?;
        }
        Ok(changed)
    }

    pub fn rename_task(&mut self, id: u64, title: &str) -> Result<bool, StoreError> {
        let changed = self.board.rename_task(id, title);
        if changed {
            self.save_board()?;
        }
        Ok(changed)
    }

    pub fn increment_pomodoro(&mut self, id: u64) -> Result<bool, StoreError> {
        let changed = self.board.increment_pomodoro(id);
        if changed {
            self.save_board()?;
        }
        Ok(changed)
    }

    /// Reassign a task to another column. A move that lands a task in
    /// the done column is a completion and publishes `TaskCompleted` --
    /// once per transition into the column, so leaving and re-entering
    /// done counts again.
    pub fn move_task(&mut self, id: u64, status: Status) -> Result<Option<Event>, StoreError> {
        if !self.board.move_task(id, status) {
            return Ok(None);
        }
        self.save_board()?;
        if status != Status::Done {
            return Ok(None);
        }
        let event = Event::TaskCompleted {
            task_id: id,
            at: Utc::now(),
        };
        self.publish(&event)?;
        Ok(Some(event))
    }

    fn save_board(&self) -> Result<(), StoreError> {
        self.store.save(keys::KANBAN, &self.board)
    }

    // ── Filter (transient, never persisted) ──────────────────────────

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    pub fn set_tag_filter(&mut self, tag: Option<String>) {
        self.filter.tag = tag;
    }

    // ── Analytics ────────────────────────────────────────────────────

    /// Re-read the persisted ledger, picking up writes from other
    /// processes. Called before rendering the analytics view.
    pub fn refresh_analytics(&mut self) -> Result<(), StoreError> {
        self.analytics = self.store.load_or_default(keys::ANALYTICS)?;
        Ok(())
    }

    /// Apply a published event to the analytics ledger and persist it.
    /// Events are dropped, not queued, while logged out.
    fn publish(&mut self, event: &Event) -> Result<(), StoreError> {
        if self.user.is_none() {
            debug!(?event, "no user logged in, dropping event");
            return Ok(());
        }
        let today = self.today();
        match *event {
            Event::PomodoroCompleted { duration_min, .. } => {
                self.analytics.record_pomodoro(today, duration_min);
            }
            Event::TaskCompleted { .. } => {
                self.analytics.record_task_done(today);
            }
            _ => return Ok(()),
        }
        self.store.save(keys::ANALYTICS, &self.analytics)
    }

    // ── Theme ────────────────────────────────────────────────────────

    pub fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        self.set_theme(self.theme.toggle())?;
        Ok(self.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.theme = theme;
        self.store.save(keys::THEME, &self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Store::open_memory().unwrap(), &Config::default()).unwrap()
    }

    fn logged_in_app() -> App {
        let mut app = app();
        app.login("ada").unwrap();
        app
    }

    fn complete_countdown(app: &mut App) {
        app.timer_set_custom(1);
        app.timer_toggle();
        for _ in 0..60 {
            app.timer_tick().unwrap();
        }
    }

    #[test]
    fn logged_out_events_leave_analytics_untouched() {
        let mut app = app();
        app.add_task("x", Priority::Medium, "", None).unwrap();
        app.move_task(1, Status::Done).unwrap();
        complete_countdown(&mut app);

        assert_eq!(app.today_totals(), DailyStats::default());
        assert_eq!(app.weekly_totals(), DailyStats::default());
    }

    #[test]
    fn countdown_completion_records_pomodoro_and_minutes() {
        let mut app = logged_in_app();
        complete_countdown(&mut app);

        let today = app.today_totals();
        assert_eq!(today.pomodoros, 1);
        assert_eq!(today.time, 1);
        assert_eq!(today.tasks, 0);
    }

    #[test]
    fn move_to_done_emits_task_completed_once_per_transition() {
        let mut app = logged_in_app();
        app.add_task("x", Priority::Medium, "", None).unwrap();

        let event = app.move_task(1, Status::Done).unwrap();
        assert!(matches!(event, Some(Event::TaskCompleted { task_id: 1, .. })));
        assert_eq!(app.today_totals().tasks, 1);

        // already done: no move, no event
        assert!(app.move_task(1, Status::Done).unwrap().is_none());
        assert_eq!(app.today_totals().tasks, 1);

        // leaving and re-entering done counts again
        assert!(app.move_task(1, Status::InProgress).unwrap().is_none());
        let event = app.move_task(1, Status::Done).unwrap();
        assert!(matches!(event, Some(Event::TaskCompleted { .. })));
        assert_eq!(app.today_totals().tasks, 2);
    }

    #[test]
    fn move_off_done_emits_nothing() {
        let mut app = logged_in_app();
        app.add_task("x", Priority::Medium, "", None).unwrap();
        assert!(app.move_task(1, Status::InProgress).unwrap().is_none());
        assert_eq!(app.today_totals().tasks, 0);
    }

    #[test]
    fn empty_login_keeps_current_state() {
        let mut app = app();
        assert!(!app.login("   ").unwrap());
        assert!(app.user().is_none());

        app.login("ada").unwrap();
        assert!(app.login("").unwrap());
        assert_eq!(app.user().unwrap().username, "ada");
    }

    #[test]
    fn filter_changes_are_transient() {
        let mut app = app();
        app.set_status_filter(StatusFilter::Completed);
        app.set_tag_filter(Some("urgent".into()));
        assert!(!app.filter().is_default());
        // nothing persisted under a filter key: only the known records exist
        assert!(app.store.get_raw("filter").unwrap().is_none());
    }

    #[test]
    fn aggregates_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusdeck.db");
        let config = Config::default();

        {
            let mut app = App::new(Store::open_at(&path).unwrap(), &config).unwrap();
            app.login("ada").unwrap();
            app.add_task("persisted", Priority::High, "core", None).unwrap();
            app.move_task(1, Status::Done).unwrap();
            app.timer_set_custom(5);
            app.timer_toggle();
        }

        let app = App::new(Store::open_at(&path).unwrap(), &config).unwrap();
        assert_eq!(app.user().unwrap().username, "ada");
        assert_eq!(app.board().tasks.len(), 1);
        assert_eq!(app.board().get(1).unwrap().status, Status::Done);
        assert_eq!(app.today_totals().tasks, 1);
        // timer state does not survive: back to the first preset, idle
        assert_eq!(app.timer().preset_index(), Some(0));
        assert_eq!(app.timer().remaining_secs(), 25 * 60);
    }

    #[test]
    fn refresh_analytics_picks_up_external_writes() {
        let mut app = logged_in_app();
        let external = {
            let mut ledger = Analytics::default();
            ledger.record_task_done(local_today());
            ledger
        };
        app.store.save(keys::ANALYTICS, &external).unwrap();

        assert_eq!(app.today_totals().tasks, 0);
        app.refresh_analytics().unwrap();
        assert_eq!(app.today_totals().tasks, 1);
    }
}
