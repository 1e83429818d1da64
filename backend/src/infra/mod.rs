pub mod config;
pub mod database;
pub mod logging;
pub mod placeholder;
pub mod terminal;
pub mod web;
