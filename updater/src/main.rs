// Licensed under the Apache-2.0 license

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hostfw_updater::arbiter::Mboxctl;
use hostfw_updater::flash::Pflash;
use hostfw_updater::inventory::FirmwareInventory;
use hostfw_updater::reset::FlashResetEngine;
use hostfw_updater::version::LineSplit;

#[derive(Parser)]
#[command(version, about = "Host firmware inventory manager", long_about = None)]
struct Cli {
    /// Path to the flash utility
    #[arg(long, env = "HOSTFW_PFLASH", default_value = "pflash")]
    pflash: PathBuf,

    /// Path to the flash-access daemon control tool
    #[arg(long, env = "HOSTFW_MBOXCTL", default_value = "mboxctl")]
    mboxctl: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the stored firmware version and its activation state
    Discover,
    /// Factory reset: clear every reprovision-flagged partition
    Reset,
    /// Clear the hardware guard records
    ClearGuard,
    /// Erase the stored firmware image
    Erase,
}

fn main() {
    let cli = Cli::parse();
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init();

    let result = match &cli.command {
        Commands::Discover => discover(&cli),
        Commands::Reset => reset(&cli),
        Commands::ClearGuard => clear_guard(&cli),
        Commands::Erase => erase(&cli),
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
}

fn discover(cli: &Cli) -> Result<()> {
    let mut inventory = FirmwareInventory::new(Pflash::new(cli.pflash.clone()), LineSplit);
    match inventory.discover() {
        Some(slot) => {
            println!(
                "{} {} ({:?})",
                slot.version.id, slot.version.version, slot.activation.status
            );
            if !slot.version.extended_version.is_empty() {
                println!("extended: {}", slot.version.extended_version);
            }
        }
        None => println!("No functional firmware version"),
    }
    Ok(())
}

fn reset(cli: &Cli) -> Result<()> {
    let engine = FlashResetEngine::new(
        Pflash::new(cli.pflash.clone()),
        Mboxctl::new(cli.mboxctl.clone()),
    );
    let outcomes = engine.reset()?;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("{}: cleared", outcome.name),
            Err(e) => println!("{}: failed ({})", outcome.name, e),
        }
    }
    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    if failed > 0 {
        bail!("{} of {} partitions failed to clear", failed, outcomes.len());
    }
    Ok(())
}

fn clear_guard(cli: &Cli) -> Result<()> {
    let engine = FlashResetEngine::new(
        Pflash::new(cli.pflash.clone()),
        Mboxctl::new(cli.mboxctl.clone()),
    );
    engine.clear_guard()
}

fn erase(cli: &Cli) -> Result<()> {
    let mut inventory = FirmwareInventory::new(Pflash::new(cli.pflash.clone()), LineSplit);
    inventory.discover();
    if !inventory.erase_current() {
        bail!("failed to erase the stored firmware image");
    }
    Ok(())
}
