pub mod activity;
pub mod community;
pub mod profile;
pub mod thread;
pub mod users;

use anyhow::{Context, Result};
use serde::Serialize;

/// Prints `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
