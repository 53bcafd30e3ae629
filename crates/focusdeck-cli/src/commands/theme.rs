//! Display theme management.

use clap::Subcommand;
use focusdeck_core::Theme;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Show the current theme
    Show,
    /// Flip between sunrise and night
    Toggle,
    /// Set the theme explicitly
    Set {
        /// "sunrise" or "night"
        theme: String,
    },
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = super::load_app()?;

    match action {
        ThemeAction::Show => println!("{}", app.theme()),
        ThemeAction::Toggle => println!("{}", app.toggle_theme()?),
        ThemeAction::Set { theme } => {
            let theme: Theme = theme.parse()?;
            app.set_theme(theme)?;
            println!("{theme}");
        }
    }
    Ok(())
}
