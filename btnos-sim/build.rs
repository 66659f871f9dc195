//! Build script for btnos-sim
//!
//! Validates the embedded device.toml at compile time so a broken default
//! configuration never makes it into the binary.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const KINDS: [&str; 3] = ["wifi", "imu", "doodle"];
const FORMATS: [&str; 2] = ["csv", "json"];

fn main() {
    validate_config();
}

/// Validate device.toml
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The simulator embeds a default device.toml configuration.       ║\n\
            ║  Please create one in the btnos-sim directory.                   ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
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
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_params(&config, &mut errors);
    validate_apps(&config, &mut errors);
    validate_networks(&config, &mut errors);
    report("Invalid device configuration", &errors);

    println!("cargo:warning=device.toml validated successfully");
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

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate the [params] table
fn validate_params(config: &toml::Value, errors: &mut Vec<String>) {
    let params = match config.get("params") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[params] must be a table".to_string());
            return;
        }
        None => return,
    };

    for (key, max) in [("imu_wait_ms", 1000), ("imu_size", 1000)] {
        if let Some(value) = params.get(key) {
            match value.as_integer() {
                Some(v) if (0..=max).contains(&v) => {}
                _ => errors.push(format!("[params] {} must be 0-{}", key, max)),
            }
        }
    }

    if let Some(format) = params.get("imu_log") {
        if !format.as_str().is_some_and(|f| FORMATS.contains(&f)) {
            errors.push("[params] imu_log must be 'csv' or 'json'".to_string());
        }
    }

    for (key, max) in [("essid", 32), ("password", 64), ("mount_dir", 48)] {
        if let Some(value) = params.get(key) {
            match value.as_str() {
                Some(s) if s.len() <= max => {}
                Some(_) => errors.push(format!("[params] {} longer than {} bytes", key, max)),
                None => errors.push(format!("[params] {} must be a string", key)),
            }
        }
    }
}

/// Validate the [[app]] entries
fn validate_apps(config: &toml::Value, errors: &mut Vec<String>) {
    let apps = match config.get("app") {
        Some(toml::Value::Array(a)) => a,
        Some(_) => {
            errors.push("app must be an array of tables ([[app]])".to_string());
            return;
        }
        None => {
            errors.push("Missing [[app]] section - at least one app is required".to_string());
            return;
        }
    };

    let mut slots = BTreeSet::new();

    for (i, app) in apps.iter().enumerate() {
        let app = match app.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("app {} must be a table", i));
                continue;
            }
        };

        match app.get("slot").and_then(|s| s.as_integer()) {
            Some(slot) if (1..=4).contains(&slot) => {
                if !slots.insert(slot) {
                    errors.push(format!("app {} reuses slot {}", i, slot));
                }
            }
            Some(_) => errors.push(format!("app {} slot must be 1-4", i)),
            None => errors.push(format!("app {} missing 'slot'", i)),
        }

        match app.get("kind").and_then(|k| k.as_str()) {
            Some(kind) if KINDS.contains(&kind) => {}
            Some(kind) => errors.push(format!("app {} has unknown kind '{}'", i, kind)),
            None => errors.push(format!("app {} missing 'kind'", i)),
        }

        if let Some(label) = app.get("label") {
            if !label.as_str().is_some_and(|l| l.len() <= 24) {
                errors.push(format!("app {} label must be a string of 24 bytes or less", i));
            }
        }

        if let Some(tasks) = app.get("tasks") {
            let Some(tasks) = tasks.as_array() else {
                errors.push(format!("app {} tasks must be an array", i));
                continue;
            };
            for (j, task) in tasks.iter().enumerate() {
                match task.get("key").and_then(|k| k.as_integer()) {
                    Some(key) if (5..=8).contains(&key) => {}
                    Some(_) => errors.push(format!("app {} task {} key must be 5-8", i, j)),
                    None => errors.push(format!("app {} task {} missing 'key'", i, j)),
                }
                if task.get("label").and_then(|l| l.as_str()).is_none() {
                    errors.push(format!("app {} task {} missing 'label'", i, j));
                }
            }
        }
    }
}

/// Validate the [[network]] entries
fn validate_networks(config: &toml::Value, errors: &mut Vec<String>) {
    let networks = match config.get("network") {
        Some(toml::Value::Array(n)) => n,
        Some(_) => {
            errors.push("network must be an array of tables ([[network]])".to_string());
            return;
        }
        None => return,
    };

    for (i, network) in networks.iter().enumerate() {
        if network.get("ssid").and_then(|s| s.as_str()).is_none() {
            errors.push(format!("network {} missing 'ssid'", i));
        }
        match network.get("rssi").and_then(|r| r.as_integer()) {
            Some(rssi) if (-128..=0).contains(&rssi) => {}
            _ => errors.push(format!("network {} rssi must be -128-0", i)),
        }
    }
}
