//! Typelens CLI
//!
//! Offline front end for the recovery core: run the extractor on a literal
//! symbol string, resolve an address against a binary's symbol table, or
//! scan a binary for every erasure instantiation it contains.

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use colored::Colorize;

use typelens::host::symtab::BinarySymbolTable;
use typelens::recover::{recover_type, ErasurePattern};

/// Typelens: recover erased types from debug symbols
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Binary to load symbols from
    #[arg(short, long)]
    binary: Option<String>,

    /// Erasing-function address to resolve (hex with 0x prefix, or decimal)
    #[arg(short, long)]
    address: Option<String>,

    /// Run the extractor on a literal symbol string instead of a binary
    #[arg(short, long)]
    symbol: Option<String>,

    /// List every erasure instantiation found in the binary
    #[arg(long, default_value_t = false)]
    scan: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_address(text: &str) -> Result<u64> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| anyhow!("invalid address: {text}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    let pattern = ErasurePattern::mfunc();

    if let Some(symbol) = &args.symbol {
        match pattern.extract(symbol) {
            Some(type_name) => println!("{} {}", "recovered:".green(), type_name),
            None => println!("{}", "no erasure pattern in symbol".yellow()),
        }
        return Ok(());
    }

    let binary = args
        .binary
        .as_deref()
        .ok_or_else(|| anyhow!("either --symbol or --binary is required"))?;
    let symbols = BinarySymbolTable::from_file(binary)?;
    log::debug!("loaded symbol table from {binary}");

    if args.scan {
        let mut found = 0usize;
        for entry in symbols.symbols() {
            if let Some(type_name) = pattern.extract(&entry.name) {
                println!("{:#014x}  {}", entry.address, type_name.green());
                found += 1;
            }
        }
        println!("{found} erasure instantiation(s) in {binary}");
        return Ok(());
    }

    let Some(address) = &args.address else {
        bail!("--address (or --scan) is required with --binary");
    };
    let address = parse_address(address)?;

    match recover_type(&symbols, pattern, address) {
        Some(type_name) => println!("{} {}", "recovered:".green(), type_name),
        None => println!("{}", "unknown (no symbol or pattern mismatch)".yellow()),
    }

    Ok(())
}
