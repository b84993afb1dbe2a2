//! The translator: owns the MMU state and runs the per-address lookup
//! protocol (TLB probe, page table probe, page fault, TLB update, resolve).

use std::io::{Read, Seek};

use crate::config::VmConfig;
use crate::constants::FRAME_SIZE;
use crate::error::{TranslationError, VmError};
use crate::memory::{BackingStore, FrameAllocator, PhysicalMemory};
use crate::page_table::PageTable;
use crate::tlb::TranslationCache;
use crate::translation::{Access, LogicalAddress, Translation};

/// End-of-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub translated: usize,
    pub page_faults: usize,
    pub tlb_hits: usize,
}

impl Statistics {
    pub fn page_fault_rate(&self) -> f64 {
        ratio(self.page_faults, self.translated)
    }

    pub fn tlb_hit_rate(&self) -> f64 {
        ratio(self.tlb_hits, self.translated)
    }

    pub fn tlb_misses(&self) -> usize {
        self.translated - self.tlb_hits
    }

    fn record(&mut self, access: Access) {
        self.translated += 1;
        match access {
            Access::TlbHit => self.tlb_hits += 1,
            Access::PageFault => self.page_faults += 1,
            Access::PageTableHit => {}
        }
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

pub struct VmManager<R> {
    config: VmConfig,
    page_table: PageTable,
    memory: PhysicalMemory,
    frames: FrameAllocator,
    tlb: Box<dyn TranslationCache>,
    store: BackingStore<R>,
    stats: Statistics,
}

impl<R: Read + Seek> VmManager<R> {
    pub fn new(config: VmConfig, store: BackingStore<R>) -> Result<Self, VmError> {
        config.validate()?;
        log::info!(
            "vm: {} frames, {}-entry {:?} TLB",
            config.num_frames,
            config.tlb_size,
            config.tlb_policy
        );
        Ok(VmManager {
            config,
            page_table: PageTable::new(),
            memory: PhysicalMemory::new(config.num_frames),
            frames: FrameAllocator::new(config.num_frames),
            tlb: config.tlb_policy.build(config.tlb_size),
            store,
            stats: Statistics::default(),
        })
    }

    /// Translate one logical address and read the byte it refers to.
    ///
    /// On error nothing is mutated: the page table, TLB, frame counter and
    /// statistics are exactly as they were before the call.
    pub fn translate(&mut self, addr: LogicalAddress) -> Result<Translation, TranslationError> {
        let page = addr.page();

        let (frame, access) = match self.tlb.probe(page) {
            Some(frame) => (frame, Access::TlbHit),
            None => {
                let resolved = match self.page_table.lookup(page).frame() {
                    Some(frame) => (frame, Access::PageTableHit),
                    None => (self.handle_page_fault(page)?, Access::PageFault),
                };
                self.tlb.admit(page, resolved.0);
                resolved
            }
        };
        self.stats.record(access);

        let offset = addr.offset();
        let translation = Translation {
            virtual_address: addr.raw(),
            physical_address: PhysicalMemory::frame_to_address(frame, offset),
            frame,
            value: self.memory.read_byte(frame, offset) as i8,
            access,
        };
        log::debug!("{} -> frame {} ({:?})", addr, frame, access);
        Ok(translation)
    }

    /// Load `page` from the backing store into the next free frame and map it
    fn handle_page_fault(&mut self, page: u8) -> Result<usize, TranslationError> {
        let frame = self.frames.peek()?;
        let mut contents = [0u8; FRAME_SIZE];
        self.store.read_page(page, &mut contents)?;
        self.frames.allocate()?;
        self.memory.write_frame(frame, &contents);
        self.page_table.bind(page, frame);
        log::debug!("page fault: page {} loaded into frame {}", page, frame);
        Ok(frame)
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn memory(&self) -> &PhysicalMemory {
        &self.memory
    }

    pub fn tlb(&self) -> &dyn TranslationCache {
        self.tlb.as_ref()
    }

    pub fn frames_in_use(&self) -> usize {
        self.frames.allocated()
    }

    pub fn free_frames(&self) -> usize {
        self.frames.free_count()
    }
}
