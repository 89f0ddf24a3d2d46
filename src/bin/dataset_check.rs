use std::path::PathBuf;

use anyhow::{Context, Result};

use wc22_dashboard::config::DashboardConfig;
use wc22_dashboard::dataset::load_dataset;
use wc22_dashboard::derive::{dropdown_options, parse_percentage};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let data_path = parse_data_path_arg().unwrap_or_else(|| DashboardConfig::from_env().data_path);
    let dataset = load_dataset(&data_path)
        .with_context(|| format!("dataset check failed for {}", data_path.display()))?;

    println!("Dataset: {}", data_path.display());
    println!("Matches: {}", dataset.len());
    for opt in dropdown_options(&dataset) {
        println!("  [{:>2}] {}", opt.value, opt.label);
    }

    let mut issues = Vec::new();
    for (idx, m) in dataset.records().iter().enumerate() {
        let possession = [
            ("possession team1", m.possession1.as_str()),
            ("possession team2", m.possession2.as_str()),
            ("possession in contest", m.possession_contested.as_str()),
        ];
        let mut total = 0;
        let mut parsed_all = true;
        for (field, raw) in possession {
            match parse_percentage(field, raw) {
                Ok(v) => total += v,
                Err(err) => {
                    parsed_all = false;
                    issues.push(format!("row {idx} ({}): {err}", m.label()));
                }
            }
        }
        if parsed_all && total != 100 {
            issues.push(format!(
                "row {idx} ({}): possession sums to {total}%",
                m.label()
            ));
        }
        if m.passes_completed1 > m.passes1 || m.passes_completed2 > m.passes2 {
            issues.push(format!(
                "row {idx} ({}): completed passes exceed total passes",
                m.label()
            ));
        }
    }

    if issues.is_empty() {
        println!("No data-quality issues found");
    } else {
        println!("Data-quality issues: {}", issues.len());
        for issue in &issues {
            println!(" - {issue}");
        }
    }

    Ok(())
}

fn parse_data_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--data=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--data" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
