use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use scorebook::store::ledger::{BestRecord, TagBestRecord};

#[derive(Parser)]
#[command(
    name = "inspect-store",
    version,
    about = "Dump stored records and custom texts as pretty JSON"
)]
struct Cli {
    #[arg(short, long, help = "Store directory (defaults to the platform data dir)")]
    dir: Option<PathBuf>,

    #[arg(short, long, help = "Only show entries whose name contains this substring")]
    filter: Option<String>,
}

/// One-line summary for record bodies the library recognizes.
/// Tag records parse first: a plain record pattern also matches their body.
fn describe(value: &serde_json::Value) -> Option<String> {
    if let Ok(record) = serde_json::from_value::<TagBestRecord>(value.clone()) {
        return Some(format!(
            "tag {} best {:.2} wpm, set {}",
            record.tag_id, record.metrics.speed, record.timestamp
        ));
    }
    if let Ok(record) = serde_json::from_value::<BestRecord>(value.clone()) {
        return Some(format!(
            "best {:.2} wpm, set {}",
            record.metrics.speed, record.timestamp
        ));
    }
    None
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = match cli.dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("could not determine the platform data directory")?
            .join("scorebook"),
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("could not read store directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut shown = 0usize;
    for path in &paths {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        if let Some(filter) = &cli.filter
            && !name.contains(filter.as_str())
        {
            continue;
        }

        let bytes = fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        match describe(&value) {
            Some(summary) => println!("── {name}  ({summary})"),
            None => println!("── {name}"),
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        shown += 1;
    }

    if shown == 0 {
        println!("No entries in {}", dir.display());
    } else {
        println!("\n{shown} entries.");
    }
    Ok(())
}
