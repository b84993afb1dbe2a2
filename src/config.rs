use crate::constants::*;
use crate::error::VmError;
use crate::tlb::{LruTlb, RoundRobinTlb, TranslationCache};

/// TLB replacement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TlbPolicy {
    /// Overwrite slots in insertion order; hits do not reorder anything
    #[default]
    Fifo,
    /// Evict the least recently used entry
    Lru,
}

impl TlbPolicy {
    pub fn build(self, capacity: usize) -> Box<dyn TranslationCache> {
        match self {
            TlbPolicy::Fifo => Box::new(RoundRobinTlb::new(capacity)),
            TlbPolicy::Lru => Box::new(LruTlb::new(capacity)),
        }
    }
}

/// Sizing of the simulated MMU. Page and frame sizes are fixed by the
/// 16-bit address format; everything else is chosen per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    pub num_frames: usize,
    pub tlb_size: usize,
    pub tlb_policy: TlbPolicy,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            num_frames: DEFAULT_NUM_FRAMES,
            tlb_size: TLB_SIZE,
            tlb_policy: TlbPolicy::default(),
        }
    }
}

impl VmConfig {
    pub fn validate(&self) -> Result<(), VmError> {
        if self.num_frames == 0 {
            return Err(VmError::Config("physical memory needs at least one frame".into()));
        }
        if self.num_frames > NUM_PAGES {
            return Err(VmError::Config(format!(
                "{} frames exceeds the {} pages of the address space",
                self.num_frames, NUM_PAGES
            )));
        }
        if self.tlb_size == 0 {
            return Err(VmError::Config("TLB needs at least one entry".into()));
        }
        Ok(())
    }

    /// Size of physical memory in bytes
    pub fn memory_size(&self) -> usize {
        self.num_frames * FRAME_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VmConfig::default();
        assert_eq!(config.num_frames, 256);
        assert_eq!(config.tlb_size, 16);
        assert_eq!(config.tlb_policy, TlbPolicy::Fifo);
        assert_eq!(config.memory_size(), 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reduced_memory_is_valid() {
        let config = VmConfig { num_frames: 128, ..VmConfig::default() };
        assert!(config.validate().is_ok());
        assert_eq!(config.memory_size(), 32768);
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        for config in [
            VmConfig { num_frames: 0, ..VmConfig::default() },
            VmConfig { num_frames: NUM_PAGES + 1, ..VmConfig::default() },
            VmConfig { tlb_size: 0, ..VmConfig::default() },
        ] {
            assert!(matches!(config.validate(), Err(VmError::Config(_))), "{:?}", config);
        }
    }

    #[test]
    fn test_policy_builds_requested_capacity() {
        let fifo = TlbPolicy::Fifo.build(8);
        let lru = TlbPolicy::Lru.build(4);
        assert_eq!(fifo.capacity(), 8);
        assert_eq!(lru.capacity(), 4);
        assert!(fifo.is_empty());
    }
}
