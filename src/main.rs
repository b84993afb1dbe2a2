//! Paging VM - Main Entry Point
//!
//! Usage: paging-vm [OPTIONS] <ADDRESSES>
//!
//! Reads one virtual address per line, translates each through the TLB and
//! page table (faulting pages in from the backing store), prints the
//! physical address and stored value, then the run statistics.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use paging_vm::io::{open_address_file, run_stream, write_residency, write_summary};
use paging_vm::{BackingStore, DEFAULT_BACKING_STORE_PATH, DEFAULT_NUM_FRAMES, TLB_SIZE};
use paging_vm::{TlbPolicy, VmConfig, VmError, VmManager};

/// Command-line configuration
#[derive(Parser, Debug)]
#[command(name = "paging-vm")]
#[command(about = "Translates 16-bit virtual addresses through a simulated TLB and page table")]
#[command(version)]
struct Cli {
    /// File with one virtual address per line
    addresses: PathBuf,

    /// Page contents, read-only
    #[arg(short, long, default_value = DEFAULT_BACKING_STORE_PATH)]
    backing_store: PathBuf,

    /// Number of physical frames
    #[arg(short, long, default_value_t = DEFAULT_NUM_FRAMES)]
    frames: usize,

    /// Number of TLB entries
    #[arg(short, long, default_value_t = TLB_SIZE)]
    tlb_size: usize,

    /// TLB replacement policy
    #[arg(short, long, value_enum, default_value_t = TlbPolicy::Fifo)]
    policy: TlbPolicy,

    /// Print detailed translation information
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Run the translator and handle any errors
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main logic separated from main() for cleaner error handling
fn run(cli: &Cli) -> Result<(), VmError> {
    let config = VmConfig {
        num_frames: cli.frames,
        tlb_size: cli.tlb_size,
        tlb_policy: cli.policy,
    };

    let input = open_address_file(&cli.addresses).map_err(|source| VmError::Open {
        path: cli.addresses.clone(),
        source,
    })?;
    let store = BackingStore::open(&cli.backing_store).map_err(|source| VmError::Open {
        path: cli.backing_store.clone(),
        source,
    })?;

    let mut vm = VmManager::new(config, store)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_stream(&mut vm, input, &mut out)?;

    for rejected in &report.rejected {
        eprintln!("line {}: {}", rejected.line, rejected.error);
    }
    write_summary(&mut out, &report.stats)?;
    out.flush()?;

    if cli.verbose {
        write_residency(&mut io::stderr(), &vm)?;
    }

    Ok(())
}
