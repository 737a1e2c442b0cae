//! Tasklist CLI - operator commands for database migrations and bootstrap.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
