pub mod auth;
pub mod cache;
pub mod cli;
pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod portal;
pub mod quotes;
pub mod server;
pub mod store;
pub mod uploads;

#[cfg(test)]
pub mod testing;
