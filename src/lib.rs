pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod server;

pub use config::ServerConfig;
pub use server::{build_app, start_server, ServerState};
