mod app;
pub mod browser;
pub mod cli;
pub mod connections;
pub mod insights;
pub mod logging;
pub mod mutations;
pub mod pagination;

pub use app::{render_connections, render_list, App};

// Always expose testing module (integration tests need it)
pub mod testing;
