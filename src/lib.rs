pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod page_table;
pub mod tlb;
pub mod translation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use config::{TlbPolicy, VmConfig};
pub use constants::*;
pub use error::{AddressError, TranslationError, VmError};
pub use memory::BackingStore;
pub use translation::{Access, LogicalAddress, Translation};
pub use vm_manager::{Statistics, VmManager};
