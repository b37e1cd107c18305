pub mod board;
pub mod config;
pub mod errors;
pub mod logging;
pub mod server;
pub mod storage;
pub mod ui;
