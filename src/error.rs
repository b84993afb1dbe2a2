//! Error types for address translation

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Per-line input errors. These are recoverable: the offending line is
/// reported and the stream continues.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AddressError {
    /// Address zero is rejected by the decomposition contract
    #[error("virtual address 0 is not a valid address")]
    Zero,

    #[error("virtual address {0} is outside the 16-bit address space")]
    OutOfRange(String),

    #[error("malformed virtual address: {0:?}")]
    Malformed(String),
}

/// Errors raised while resolving a translation. All of them are fatal to
/// the run.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("backing store access failed for page {page}: {source}")]
    BackingStore {
        page: u8,
        #[source]
        source: io::Error,
    },

    /// The store ended before a full frame could be read
    #[error("short read from backing store for page {page}")]
    ShortRead { page: u8 },

    #[error("physical memory exhausted: all {capacity} frames are in use")]
    FramesExhausted { capacity: usize },
}

/// Run-level error surfaced to the binary
#[derive(Debug, Error)]
pub enum VmError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An input file could not be opened
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_error_messages() {
        assert_eq!(
            AddressError::Zero.to_string(),
            "virtual address 0 is not a valid address"
        );
        assert_eq!(
            AddressError::OutOfRange("70000".into()).to_string(),
            "virtual address 70000 is outside the 16-bit address space"
        );
        assert!(AddressError::Malformed("abc".into()).to_string().contains("\"abc\""));
    }

    #[test]
    fn test_translation_error_converts_into_vm_error() {
        let err: VmError = TranslationError::FramesExhausted { capacity: 128 }.into();
        assert!(matches!(
            err,
            VmError::Translation(TranslationError::FramesExhausted { capacity: 128 })
        ));
        assert_eq!(
            err.to_string(),
            "physical memory exhausted: all 128 frames are in use"
        );
    }

    #[test]
    fn test_open_error_names_the_file() {
        let err = VmError::Open {
            path: PathBuf::from("BACKING_STORE.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot open BACKING_STORE.bin: no such file");
        assert!(!err.to_string().contains("configuration"));
    }

    #[test]
    fn test_backing_store_error_keeps_source() {
        use std::error::Error as _;

        let err = TranslationError::BackingStore {
            page: 7,
            source: io::Error::new(io::ErrorKind::Other, "disk gone"),
        };
        assert!(err.to_string().contains("page 7"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk gone".to_string()));
    }
}
