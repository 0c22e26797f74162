//! # Bot Configuration Module
//!
//! This module defines the configuration structure for the vCard bot,
//! including delivery pacing, the archive threshold, and validation strictness.

use std::env;

// Constants for bot configuration
pub const DEFAULT_SEND_DELAY_MS: u64 = 1500; // Pause between document sends to respect rate limits
pub const DEFAULT_ARCHIVE_THRESHOLD: usize = 500; // More documents than this are zipped into one archive
pub const MAX_CHUNK_SIZE: usize = 100_000;
pub const MAX_NUMBERS_PER_REQUEST: usize = 1_000_000;

/// Configuration structure for the vCard bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram user ID of the bot owner (always authorized, manages the whitelist)
    pub owner_id: i64,
    /// Use full international phone validation; lenient mode only rejects alphabetic lines
    pub strict_validation: bool,
    /// Delay between successive document sends in milliseconds
    pub send_delay_ms: u64,
    /// Document count above which output is bundled into a single zip archive
    pub archive_threshold: usize,
    /// Upper bound on accepted chunk sizes
    pub max_chunk_size: usize,
    /// Upper bound on the number of input lines accepted per request
    pub max_numbers_per_request: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            owner_id: 0,
            strict_validation: true,
            send_delay_ms: DEFAULT_SEND_DELAY_MS,
            archive_threshold: DEFAULT_ARCHIVE_THRESHOLD,
            max_chunk_size: MAX_CHUNK_SIZE,
            max_numbers_per_request: MAX_NUMBERS_PER_REQUEST,
        }
    }
}

impl BotConfig {
    /// Build a configuration from environment variables, falling back to defaults
    /// for anything unset or unparsable. `OWNER_ID` is required.
    pub fn from_env() -> anyhow::Result<Self> {
        let owner_id = env::var("OWNER_ID")
            .map_err(|_| anyhow::anyhow!("OWNER_ID must be set"))?
            .trim()
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("OWNER_ID must be a numeric Telegram user ID"))?;

        let mut config = Self {
            owner_id,
            ..Self::default()
        };

        if let Ok(value) = env::var("STRICT_VALIDATION") {
            config.strict_validation = !matches!(value.trim(), "0" | "false" | "no");
        }
        if let Ok(value) = env::var("SEND_DELAY_MS") {
            if let Ok(delay) = value.trim().parse() {
                config.send_delay_ms = delay;
            }
        }
        if let Ok(value) = env::var("ARCHIVE_THRESHOLD") {
            if let Ok(threshold) = value.trim().parse() {
                config.archive_threshold = threshold;
            }
        }

        Ok(config)
    }
}
