//! Minimal TOML reader for the logger configuration
//!
//! Handles only the subset the configuration file uses:
//! - a single `[logger]` section
//! - `key = value` pairs with integer or boolean values
//! - underscores as digit separators (`8_000`)
//! - comments (`# ...`), whole-line or trailing
//!
//! Keys that are absent keep their default value.

use core::fmt;

use super::types::*;

/// Configuration parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Section other than `[logger]`
    InvalidSection,
    /// Line is neither a header nor `key = value`
    MalformedLine,
    /// Key outside `[logger]` or not recognised
    UnknownKey,
    /// Value has the wrong type
    InvalidValue,
    /// Value parsed but lies outside its accepted range
    OutOfRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::InvalidSection => "invalid section",
            ConfigError::MalformedLine => "malformed line",
            ConfigError::UnknownKey => "unknown key",
            ConfigError::InvalidValue => "invalid value",
            ConfigError::OutOfRange => "value out of range",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Logger,
}

/// Parse a configuration document
pub fn parse_config(input: &str) -> Result<LoggerConfig, ConfigError> {
    let mut config = LoggerConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ConfigError::MalformedLine)?;
            section = match name.trim() {
                "logger" => Section::Logger,
                _ => return Err(ConfigError::InvalidSection),
            };
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::MalformedLine)?;
        if section != Section::Logger {
            return Err(ConfigError::UnknownKey);
        }
        apply_value(&mut config, key, value)?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(config: &mut LoggerConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "log_interval_ms" => config.log_interval_ms = parse_ranged(value, LOG_INTERVAL_RANGE)?,
        "max_fix_age_ms" => config.max_fix_age_ms = parse_ranged(value, MAX_FIX_AGE_RANGE)?,
        "watchdog_timeout_ms" => {
            config.watchdog_timeout_ms = parse_ranged(value, WATCHDOG_TIMEOUT_RANGE)?
        }
        "command_baud" => config.command_baud = parse_ranged(value, BAUD_RANGE)?,
        "gnss_baud" => config.gnss_baud = parse_ranged(value, BAUD_RANGE)?,
        "session_range" => config.session_range = parse_ranged(value, SESSION_RANGE_RANGE)?,
        "debug_on_boot" => config.debug_on_boot = parse_bool(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn parse_ranged(value: &str, (lo, hi): (u32, u32)) -> Result<u32, ConfigError> {
    let parsed = parse_u32(value)?;
    if (lo..=hi).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::OutOfRange)
    }
}

fn parse_u32(value: &str) -> Result<u32, ConfigError> {
    if value.starts_with('_') || value.ends_with('_') {
        return Err(ConfigError::InvalidValue);
    }

    let mut result: u32 = 0;
    let mut digits = 0;
    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ConfigError::InvalidValue)?;
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ConfigError::OutOfRange)?;
        digits += 1;
    }

    if digits == 0 {
        return Err(ConfigError::InvalidValue);
    }
    Ok(result)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}
