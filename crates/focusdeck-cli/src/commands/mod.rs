pub mod auth;
pub mod config;
pub mod session;
pub mod stats;
pub mod task;
pub mod theme;

use focusdeck_core::store::{Config, Store};
use focusdeck_core::App;

/// Open the store and load the application state, the way every
/// command starts.
pub fn load_app() -> Result<App, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = Store::open()?;
    Ok(App::new(store, &config)?)
}
