use crate::constants::*;

/// One slot of the page table. The frame number is only meaningful once
/// the page has been faulted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    frame: Option<usize>,
}

impl PageTableEntry {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.frame.is_some()
    }

    /// Frame holding the page, if it is resident
    #[inline]
    pub fn frame(&self) -> Option<usize> {
        self.frame
    }
}

/// Single-level page table covering the whole logical address space.
///
/// Entries start invalid and are bound once, on the first fault for their
/// page. Nothing is ever evicted.
pub struct PageTable {
    entries: [PageTableEntry; NUM_PAGES],
}

impl PageTable {
    pub fn new() -> Self {
        PageTable {
            entries: [PageTableEntry::default(); NUM_PAGES],
        }
    }

    #[inline]
    pub fn lookup(&self, page: u8) -> &PageTableEntry {
        &self.entries[page as usize]
    }

    /// Map `page` to `frame` and mark it valid
    ///
    /// # Panics
    /// If the page is already mapped. Pages fault at most once per run.
    pub fn bind(&mut self, page: u8, frame: usize) {
        let entry = &mut self.entries[page as usize];
        assert!(
            !entry.is_valid(),
            "page {} is already resident in frame {:?}",
            page,
            entry.frame
        );
        entry.frame = Some(frame);
    }

    /// Number of pages currently mapped
    pub fn resident_pages(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }

    pub fn iter_resident(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(page, e)| e.frame.map(|frame| (page as u8, frame)))
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}
