//! Validate widget instance configuration files.
//! Used by CI to catch broken prompt lists before they reach a course.
//!
//! Usage:
//!   validate-rate-config <file.yaml|file.json>...
//!   validate-rate-config --dir <path>

use likert_rate::InstanceConfig;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("USAGE:\n    validate-rate-config <FILE>...\n    validate-rate-config --dir <PATH>");
        return Ok(());
    }

    let files = collect_files(&args)?;
    if files.is_empty() {
        anyhow::bail!("no .yaml, .yml or .json files found");
    }

    let mut errors = Vec::new();

    println!("=== Validating Instance Configs ===");
    for file in &files {
        print!("Validating {}... ", file.display());
        match InstanceConfig::from_path(file) {
            Ok(config) => println!(
                "✅ ({} prompt(s), shown to {}%)",
                config.prompt_count(),
                config.display_probability_percent
            ),
            Err(e) => {
                println!("❌");
                errors.push(format!("  {}: {}", file.display(), e));
            }
        }
    }

    // Summary
    println!("\n=== Summary ===");
    if errors.is_empty() {
        println!("✅ All {} config file(s) are valid!", files.len());
        Ok(())
    } else {
        println!("❌ Found {} validation error(s):\n", errors.len());
        for err in &errors {
            println!("{}", err);
        }
        std::process::exit(1);
    }
}

fn collect_files(args: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--dir" {
            let dir = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--dir needs a path"))?;
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if is_config_file(&path) {
                    files.push(path);
                }
            }
        } else {
            files.push(PathBuf::from(arg));
        }
    }
    files.sort();
    Ok(files)
}

fn is_config_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext, "yaml" | "yml" | "json"))
        .unwrap_or(false)
}
