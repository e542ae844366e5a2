pub mod config;
pub mod history;
pub mod predict;
pub mod schedule;
