pub mod app;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod seed;
pub mod state;
pub mod storage;
pub mod store;
pub mod table;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use dashboard::Dashboard;
pub use state::AppState;
pub use storage::{load_data, persist_data};
