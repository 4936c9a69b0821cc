pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod ui;

pub use error::{AppError, Result};
