pub mod main;
pub mod config;
pub mod handlers;
pub mod server;
pub mod state;
