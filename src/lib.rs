pub mod app;
pub mod backend;
pub mod clock;
pub mod config;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod notify;
pub mod session;
pub mod state;
pub mod tasks;
pub mod ui;

pub use app::router;
pub use backend::{AttendanceApi, HttpBackend};
pub use config::FormConfig;
pub use form::{AttendanceForm, FormView};
pub use state::{AppState, spawn_clock_ticker};
