//! Build script for waymark-firmware
//!
//! - Sets up linker search paths and arguments for memory.x
//! - Validates logger.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Integer keys and their accepted ranges, mirrored from waymark-core
const INTEGER_KEYS: &[(&str, i64, i64)] = &[
    ("log_interval_ms", 10, 60_000),
    ("max_fix_age_ms", 1, 10_000),
    ("watchdog_timeout_ms", 1_000, 8_300),
    ("command_baud", 1_200, 921_600),
    ("gnss_baud", 1_200, 921_600),
    ("session_range", 1, 100_000),
];

const BOOL_KEYS: &[&str] = &["debug_on_boot"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate logger.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=logger.toml");

    let config_path = Path::new("logger.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: logger.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds logger.toml from the waymark-firmware       ║\n\
            ║  directory. Restore it to build.                                 ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read logger.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in logger.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_logger(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid logger configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=logger.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check the [logger] table against the keys the firmware parser accepts
fn validate_logger(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let table = match config.as_table() {
        Some(table) => table,
        None => return vec!["top level must be a table".to_string()],
    };

    for key in table.keys() {
        if key != "logger" {
            errors.push(format!("unknown section [{}]", key));
        }
    }

    let logger = match table.get("logger") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[logger] must be a table".to_string());
            return errors;
        }
        None => {
            errors.push("missing [logger] section".to_string());
            return errors;
        }
    };

    for (key, value) in logger {
        if let Some(&(_, min, max)) = INTEGER_KEYS.iter().find(|(name, _, _)| name == key) {
            match value {
                toml::Value::Integer(n) if (min..=max).contains(n) => {}
                toml::Value::Integer(_) => {
                    errors.push(format!("[logger] {} must be {}-{}", key, min, max));
                }
                _ => errors.push(format!("[logger] {} must be an integer", key)),
            }
        } else if BOOL_KEYS.contains(&key.as_str()) {
            if !value.is_bool() {
                errors.push(format!("[logger] {} must be true or false", key));
            }
        } else {
            errors.push(format!("[logger] unknown key '{}'", key));
        }
    }

    errors
}
