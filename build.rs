//! Build script for tuning preset validation
//!
//! This script runs at compile time and checks every preset JSON file against
//! the same limits `Tuning::validate` uses at runtime.

// Include the shared tuning limits
#[path = "src/tuning_limits.rs"]
mod tuning_limits;

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Validate a single preset file
fn validate_preset_file(path: &Path) -> Result<(), String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    if !value.is_object() {
        return Err(format!("{}: preset must be a JSON object", path.display()));
    }

    let fields = tuning_limits::flatten(&value);

    // Unknown keys are ignored at runtime, so only warn
    for (key, _) in &fields {
        if tuning_limits::find(key).is_none() {
            println!("cargo:warning={}: unknown key {}", path.display(), key);
        }
    }

    let errors = tuning_limits::violations(&fields);
    if errors.is_empty() {
        println!(
            "cargo:warning=✓ {} validated ({} values)",
            path.display(),
            fields.len()
        );
        Ok(())
    } else {
        Err(format!(
            "Preset '{}' has out-of-range values:\n  {}",
            path.display(),
            errors.join("\n  ")
        ))
    }
}

fn main() {
    let preset_dir = Path::new("presets");

    // Rerun if shared limits change
    println!("cargo:rerun-if-changed=src/tuning_limits.rs");

    if !preset_dir.exists() {
        println!("cargo:warning=Preset directory not found, skipping validation");
        return;
    }

    let mut has_errors = false;

    if let Ok(entries) = fs::read_dir(preset_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                println!("cargo:rerun-if-changed={}", path.display());

                if let Err(e) = validate_preset_file(&path) {
                    println!("cargo:warning=VALIDATION ERROR: {}", e);
                    has_errors = true;
                }
            }
        }
    }

    if has_errors {
        panic!("Tuning preset validation failed! Fix the values in presets/.");
    }

    println!("cargo:rerun-if-changed={}", preset_dir.display());
}
