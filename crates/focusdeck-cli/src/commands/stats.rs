//! Analytics queries.
//!
//! Stats are only visible while logged in, mirroring the recording
//! gate.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's counters
    Today,
    /// Totals over the trailing 7 days
    Week,
    /// The full per-day ledger as JSON
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = super::load_app()?;
    if app.user().is_none() {
        println!("Login to see your stats.");
        return Ok(());
    }

    match action {
        StatsAction::Today => {
            println!("{}", serde_json::to_string_pretty(&app.today_totals())?);
        }
        StatsAction::Week => {
            println!("{}", serde_json::to_string_pretty(&app.weekly_totals())?);
        }
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(app.analytics())?);
        }
    }
    Ok(())
}
