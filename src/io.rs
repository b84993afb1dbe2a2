use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, Write};
use std::path::Path;

use crate::error::{AddressError, VmError};
use crate::translation::LogicalAddress;
use crate::vm_manager::{Statistics, VmManager};

/// An input line that could not be turned into an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the address stream
    pub line: usize,
    pub error: AddressError,
}

/// Outcome of a full pass over an address stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub stats: Statistics,
    pub rejected: Vec<RejectedLine>,
}

pub fn open_address_file<P: AsRef<Path>>(path: P) -> io::Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Parse an address stream line by line. Blank lines are skipped; every
/// other line yields its line number and either an address or the reason it
/// was rejected.
pub fn parse_addresses<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = io::Result<(usize, Result<LogicalAddress, AddressError>)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok((index + 1, line.parse()))),
            Err(e) => Some(Err(e)),
        })
}

/// Translate every address of `input` in order, writing one result line per
/// address to `out`.
///
/// Bad lines are collected in the report and skipped. A translation error
/// (backing store failure, memory exhausted) ends the run.
pub fn run_stream<R, I, W>(
    vm: &mut VmManager<R>,
    input: I,
    out: &mut W,
) -> Result<RunReport, VmError>
where
    R: Read + Seek,
    I: BufRead,
    W: Write,
{
    let mut rejected = Vec::new();

    for item in parse_addresses(input) {
        let (line, parsed) = item?;
        match parsed {
            Ok(addr) => {
                let translation = vm.translate(addr)?;
                writeln!(out, "{}", translation)?;
            }
            Err(error) => {
                log::debug!("rejected line {}: {}", line, error);
                rejected.push(RejectedLine { line, error });
            }
        }
    }

    let stats = *vm.stats();
    log::info!(
        "translated {} addresses, {} rejected lines",
        stats.translated,
        rejected.len()
    );
    Ok(RunReport { stats, rejected })
}

pub fn write_summary<W: Write>(out: &mut W, stats: &Statistics) -> io::Result<()> {
    writeln!(out, "Number of Translated Addresses = {}", stats.translated)?;
    writeln!(out, "Page Faults = {}", stats.page_faults)?;
    writeln!(out, "Page Fault Rate = {:.3}", stats.page_fault_rate())?;
    writeln!(out, "TLB Hits = {}", stats.tlb_hits)?;
    writeln!(out, "TLB Hit Rate = {:.3}", stats.tlb_hit_rate())
}

/// Memory layout at the end of a run: frame usage, then one line per
/// resident page
pub fn write_residency<R, W>(out: &mut W, vm: &VmManager<R>) -> io::Result<()>
where
    R: Read + Seek,
    W: Write,
{
    writeln!(
        out,
        "Physical Memory = {} frames ({} bytes)",
        vm.memory().num_frames(),
        vm.config().memory_size()
    )?;
    writeln!(out, "Frames Used = {}", vm.frames_in_use())?;
    writeln!(out, "Frames Free = {}", vm.free_frames())?;
    for (page, frame) in vm.page_table().iter_resident() {
        writeln!(out, "  page {} -> frame {}", page, frame)?;
    }
    Ok(())
}
