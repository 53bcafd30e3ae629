//! Login and logout.
//!
//! The user record is a label gating analytics, not a credential.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with a username
    Login {
        /// Username (trimmed; must be non-empty)
        username: String,
    },
    /// Log out and forget the user record
    Logout,
    /// Show who is logged in
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = super::load_app()?;

    match action {
        AuthAction::Login { username } => {
            app.login(&username)?;
            match app.user() {
                Some(user) => println!("Welcome, {}", user.username),
                None => println!("login ignored (empty username)"),
            }
        }
        AuthAction::Logout => {
            app.logout()?;
            println!("Logged out");
        }
        AuthAction::Status => match app.user() {
            Some(user) => println!("Logged in as {}", user.username),
            None => println!("Not logged in"),
        },
    }
    Ok(())
}
