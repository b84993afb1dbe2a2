//! Translation lookaside buffer.
//!
//! The translator talks to the TLB only through [`TranslationCache`], so the
//! replacement policy can be swapped without touching the lookup protocol.
//!
//! [`RoundRobinTlb`] is the default. It overwrites slots strictly in insertion
//! order and ignores hits entirely, which makes it FIFO by slot. Older
//! versions of this simulator called the same mechanism "LRU"; it is not one.
//! [`LruTlb`] is the actual recency-ordered policy.

/// A cached page -> frame mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbEntry {
    pub page: u8,
    pub frame: usize,
}

pub trait TranslationCache {
    /// Look up `page`. Policies that track recency may record the access.
    fn probe(&mut self, page: u8) -> Option<usize>;

    /// Cache a mapping resolved through the page table, evicting per policy
    fn admit(&mut self, page: u8, frame: usize);

    /// Look up `page` without counting it as a use
    fn peek(&self, page: u8) -> Option<usize>;

    /// Live entries, in slot order
    fn entries(&self) -> Vec<TlbEntry>;

    fn capacity(&self) -> usize;

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed slots overwritten round-robin by a cursor
#[derive(Debug, Clone)]
pub struct RoundRobinTlb {
    slots: Vec<Option<TlbEntry>>,
    cursor: usize,
}

impl RoundRobinTlb {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "TLB needs at least one slot");
        RoundRobinTlb {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    /// Linear scan from slot 0; the first matching slot wins
    pub fn lookup(&self, page: u8) -> Option<usize> {
        self.slots
            .iter()
            .flatten()
            .find(|entry| entry.page == page)
            .map(|entry| entry.frame)
    }

    /// Overwrite `slot` unconditionally
    pub fn insert(&mut self, slot: usize, page: u8, frame: usize) {
        assert!(
            slot < self.slots.len(),
            "TLB slot {} out of range (capacity {})",
            slot,
            self.slots.len()
        );
        log::trace!("tlb slot {} <- page {} frame {}", slot, page, frame);
        self.slots[slot] = Some(TlbEntry { page, frame });
    }

    /// Slot the next admission will overwrite
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slot(&self, slot: usize) -> Option<TlbEntry> {
        self.slots.get(slot).copied().flatten()
    }
}

impl TranslationCache for RoundRobinTlb {
    fn probe(&mut self, page: u8) -> Option<usize> {
        self.lookup(page)
    }

    fn admit(&mut self, page: u8, frame: usize) {
        self.insert(self.cursor, page, frame);
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    fn peek(&self, page: u8) -> Option<usize> {
        self.lookup(page)
    }

    fn entries(&self) -> Vec<TlbEntry> {
        self.slots.iter().flatten().copied().collect()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Least-recently-used TLB. Each slot remembers the tick of its last use;
/// admission fills empty slots first, then replaces the stalest one.
#[derive(Debug, Clone)]
pub struct LruTlb {
    slots: Vec<Option<(TlbEntry, u64)>>,
    tick: u64,
}

impl LruTlb {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "TLB needs at least one slot");
        LruTlb {
            slots: vec![None; capacity],
            tick: 0,
        }
    }

    fn position(&self, page: u8) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some((entry, _)) if entry.page == page))
    }

    fn victim(&self) -> usize {
        if let Some(empty) = self.slots.iter().position(Option::is_none) {
            return empty;
        }
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|(_, used)| (i, used)))
            .min_by_key(|&(_, used)| used)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

impl TranslationCache for LruTlb {
    fn probe(&mut self, page: u8) -> Option<usize> {
        let i = self.position(page)?;
        let now = self.next_tick();
        let (entry, used) = self.slots[i].as_mut()?;
        *used = now;
        Some(entry.frame)
    }

    fn admit(&mut self, page: u8, frame: usize) {
        let slot = self.position(page).unwrap_or_else(|| self.victim());
        let now = self.next_tick();
        log::trace!("tlb slot {} <- page {} frame {}", slot, page, frame);
        self.slots[slot] = Some((TlbEntry { page, frame }, now));
    }

    fn peek(&self, page: u8) -> Option<usize> {
        self.position(page)
            .and_then(|i| self.slots[i])
            .map(|(entry, _)| entry.frame)
    }

    fn entries(&self) -> Vec<TlbEntry> {
        self.slots.iter().flatten().map(|(entry, _)| *entry).collect()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TLB_SIZE;

    // =========================================================================
    // Round-robin
    // =========================================================================

    #[test]
    fn test_starts_empty() {
        let tlb = RoundRobinTlb::new(TLB_SIZE);
        assert!(tlb.is_empty());
        assert_eq!(tlb.capacity(), TLB_SIZE);
        assert_eq!(tlb.cursor(), 0);
        // Page 255 must not match an empty slot
        assert_eq!(tlb.lookup(255), None);
        assert_eq!(tlb.lookup(0), None);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut tlb = RoundRobinTlb::new(4);
        tlb.insert(2, 9, 3);
        assert_eq!(tlb.lookup(9), Some(3));
        assert_eq!(tlb.slot(2), Some(TlbEntry { page: 9, frame: 3 }));
        assert_eq!(tlb.slot(0), None);

        tlb.insert(2, 10, 4);
        assert_eq!(tlb.lookup(9), None);
        assert_eq!(tlb.lookup(10), Some(4));
    }

    #[test]
    fn test_first_slot_wins_on_duplicates() {
        let mut tlb = RoundRobinTlb::new(4);
        tlb.insert(3, 5, 30);
        tlb.insert(1, 5, 10);
        assert_eq!(tlb.lookup(5), Some(10));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_insert_out_of_range_panics() {
        let mut tlb = RoundRobinTlb::new(4);
        tlb.insert(4, 1, 1);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut tlb = RoundRobinTlb::new(TLB_SIZE);
        for page in 0..=TLB_SIZE as u8 {
            tlb.admit(page, page as usize);
            assert!(tlb.len() <= TLB_SIZE);
        }

        // p16 landed in slot 0, evicting p0
        assert_eq!(tlb.slot(0), Some(TlbEntry { page: 16, frame: 16 }));
        assert_eq!(tlb.probe(0), None);
        for page in 1..TLB_SIZE as u8 {
            assert_eq!(tlb.probe(page), Some(page as usize));
        }
        assert_eq!(tlb.cursor(), 1);
    }

    #[test]
    fn test_hit_does_not_protect_entry_from_eviction() {
        // Despite the historical "LRU" name, hits do not promote entries
        let mut tlb = RoundRobinTlb::new(2);
        tlb.admit(1, 1);
        tlb.admit(2, 2);

        assert_eq!(tlb.probe(1), Some(1));
        assert_eq!(tlb.cursor(), 0);

        tlb.admit(3, 3);
        assert_eq!(tlb.peek(1), None);
        assert_eq!(tlb.peek(2), Some(2));
        assert_eq!(tlb.peek(3), Some(3));
    }

    // =========================================================================
    // LRU
    // =========================================================================

    #[test]
    fn test_lru_fills_empty_slots_first() {
        let mut tlb = LruTlb::new(3);
        tlb.admit(1, 10);
        tlb.admit(2, 20);
        tlb.admit(3, 30);
        assert_eq!(tlb.len(), 3);
        assert_eq!(
            tlb.entries(),
            vec![
                TlbEntry { page: 1, frame: 10 },
                TlbEntry { page: 2, frame: 20 },
                TlbEntry { page: 3, frame: 30 },
            ]
        );
    }

    #[test]
    fn test_lru_hit_protects_entry() {
        let mut tlb = LruTlb::new(2);
        tlb.admit(1, 1);
        tlb.admit(2, 2);

        assert_eq!(tlb.probe(1), Some(1));
        tlb.admit(3, 3);

        assert_eq!(tlb.peek(1), Some(1));
        assert_eq!(tlb.peek(2), None);
        assert_eq!(tlb.peek(3), Some(3));
    }

    #[test]
    fn test_lru_peek_does_not_refresh() {
        let mut tlb = LruTlb::new(2);
        tlb.admit(1, 1);
        tlb.admit(2, 2);

        assert_eq!(tlb.peek(1), Some(1));
        tlb.admit(3, 3);
        assert_eq!(tlb.peek(1), None);
    }

    #[test]
    fn test_lru_readmit_updates_in_place() {
        let mut tlb = LruTlb::new(2);
        tlb.admit(1, 1);
        tlb.admit(1, 7);
        assert_eq!(tlb.len(), 1);
        assert_eq!(tlb.peek(1), Some(7));
    }

    #[test]
    fn test_lru_capacity_invariant() {
        let mut tlb = LruTlb::new(TLB_SIZE);
        for page in 0..=u8::MAX {
            tlb.admit(page, page as usize);
            if page % 3 == 0 {
                tlb.probe(page / 2);
            }
            assert!(tlb.len() <= TLB_SIZE);
        }
        assert_eq!(tlb.len(), TLB_SIZE);
    }
}
