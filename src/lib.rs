pub mod app;
pub mod cli;
pub mod config;
pub mod leagues;
pub mod logging;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod storage;
pub mod utils;
pub mod web;
