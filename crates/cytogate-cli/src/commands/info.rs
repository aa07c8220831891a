use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cytogate_core::io::FcsReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input FCS file
    pub file: PathBuf,

    /// Only list channel names, one per line
    #[arg(long)]
    pub list_channels: bool,

    /// Also print every TEXT keyword
    #[arg(long)]
    pub keywords: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = FcsReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let channels = reader.channel_names()?;

    if args.list_channels {
        for name in &channels {
            println!("{name}");
        }
        return Ok(());
    }

    println!("File:        {}", args.file.display());
    println!("Format:      {}", reader.header.version);
    println!("Events:      {}", reader.keyword("$TOT").unwrap_or("unknown").trim());
    println!("Channels:    {}", channels.len());
    println!("Data type:   {}", reader.keyword("$DATATYPE").unwrap_or("?").trim());
    println!("Byte order:  {}", reader.keyword("$BYTEORD").unwrap_or("?").trim());
    if let Some(cyt) = reader.keyword("$CYT") {
        println!("Cytometer:   {}", cyt.trim());
    }
    println!("Keywords:    {}", reader.keywords.len());
    println!();

    for (i, name) in channels.iter().enumerate() {
        let n = i + 1;
        let label = reader.keyword(&format!("$P{n}S")).unwrap_or("").trim();
        let range = reader.keyword(&format!("$P{n}R")).unwrap_or("?").trim();
        println!("  {n:>3}. {name:<16} range {range:<10} {label}");
    }

    if args.keywords {
        println!();
        for (key, value) in &reader.keywords {
            println!("  {key:<24} {value}");
        }
    }

    Ok(())
}
