pub const OFFSET_BITS: u32 = 8;
pub const PAGE_BITS: u32 = 8;

pub const PAGE_SIZE: usize = 1 << OFFSET_BITS;
pub const NUM_PAGES: usize = 1 << PAGE_BITS;
pub const FRAME_SIZE: usize = PAGE_SIZE;

// 128 also works for the reduced-memory variant, see VmConfig
pub const DEFAULT_NUM_FRAMES: usize = 256;
pub const TLB_SIZE: usize = 16;

pub const OFFSET_MASK: u16 = (1 << OFFSET_BITS) - 1;
pub const PAGE_MASK: u16 = (1 << PAGE_BITS) - 1;
pub const PAGE_SHIFT: u32 = OFFSET_BITS;

/// Minimum backing store length: every page of the logical address space
pub const BACKING_STORE_SIZE: usize = NUM_PAGES * PAGE_SIZE;

pub const DEFAULT_BACKING_STORE_PATH: &str = "BACKING_STORE.bin";
