pub mod analytics;
pub mod app;
pub mod backend;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod session;
pub mod spelling;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
