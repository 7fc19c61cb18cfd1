//! Allocation Engine - Binary Entry Point
//!
//! Loads a configuration (or the built-in reference one), runs the
//! reference scenario and prints the realized allocation.
//!
//! ```bash
//! allocation-engine [config.json]
//! RUST_LOG=debug allocation-engine
//! ```

use std::error::Error;
use std::process::ExitCode;

use allocation_engine::types::rate::{decimal_to_fixed, from_fixed};
use allocation_engine::{AllocationHolder, Category, EngineConfig, SequentialIds};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::reference(),
    };

    println!("===========================================");
    println!("  Allocation Engine");
    println!("===========================================");
    println!();
    println!("Capacity: {}  Policy: {:?}", config.capacity, config.policy);

    let mut holder = config.holder()?;
    let mut ids = SequentialIds::new();

    let statutory = holder.insert_new(&mut ids, Category::Statutory, 500)?;
    holder.insert_new(&mut ids, Category::Duty, 500)?;
    holder.insert_new(&mut ids, Category::Other, 250)?;

    println!();
    println!("Initial allocation:");
    print_holder(&holder)?;

    holder.remove(statutory)?;

    println!();
    println!("After removing entry {}:", statutory);
    print_holder(&holder)?;

    Ok(())
}

fn print_holder(holder: &AllocationHolder) -> Result<(), Box<dyn Error>> {
    for entry in holder.entries() {
        println!(
            "  #{:<4} {}  requested {:>6}  assigned {:>6} @ {}",
            entry.id,
            entry.category,
            entry.requested,
            entry.assigned,
            render_rate(entry.rate),
        );
    }

    let summary = holder.summary()?;
    println!(
        "  assigned {}/{}  unallocated {}  starved {}  charge {}",
        summary.total_assigned,
        summary.capacity,
        summary.unallocated,
        summary.starved_count,
        summary.total_charge,
    );
    println!("  digest {}", summary.digest_hex());
    Ok(())
}

fn render_rate(rate: rust_decimal::Decimal) -> String {
    decimal_to_fixed(rate)
        .map(from_fixed)
        .unwrap_or_else(|| rate.to_string())
}
