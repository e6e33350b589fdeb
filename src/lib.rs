pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod services;
pub mod storage;

#[cfg(test)]
pub mod testing;
