//! Report the state of the configured API key pool
//!
//! Usage:
//!   cargo run --bin keypool-status
//!
//! Reads the key pool from the environment (or `.env`), builds the rotator
//! and prints a masked summary followed by the JSON snapshot.

use anyhow::Context;
use keywheel_config::{AppConfig, LogFormat};
use keywheel_logging::{init_console_logging, init_logging};
use keywheel_rotator::init_key_rotator;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    match config.log_format {
        LogFormat::Json => init_logging("keypool-status", config.log_level()),
        LogFormat::Console => init_console_logging("keypool-status", config.log_level()),
    }

    let rotator = init_key_rotator(&config.key_pool);
    let snapshot = rotator.snapshot();

    println!("🔑 Key Pool Status");
    println!("{}", "=".repeat(50));
    println!("  Source variable: {}", config.key_pool.keys_var);
    println!("  Fallback variable: {}", config.key_pool.key_var);
    println!("  Keys: {}", snapshot.pool_size);
    println!("  ✅ Valid: {}", snapshot.valid_count);
    println!("  ❌ Invalid: {}", snapshot.invalid_count);
    if !rotator.has_configured_credential() {
        println!();
        println!("⚠️  No API key configured");
    }
    println!();

    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    println!("{}", json);

    Ok(())
}
