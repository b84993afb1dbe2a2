use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use crate::constants::*;
use crate::error::AddressError;

/// Represents the decomposed components of a 16-bit logical address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalAddress {
    raw: u16,
    page: u8,
    offset: u8,
}

impl LogicalAddress {
    /// Decompose a raw address into page number (high byte) and offset (low byte).
    ///
    /// Address zero is rejected rather than translated.
    pub fn from_raw(raw: u16) -> Result<Self, AddressError> {
        if raw == 0 {
            return Err(AddressError::Zero);
        }
        let page = ((raw >> PAGE_SHIFT) & PAGE_MASK) as u8;
        let offset = (raw & OFFSET_MASK) as u8;

        Ok(LogicalAddress { raw, page, offset })
    }

    #[inline]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    #[inline]
    pub fn page(&self) -> u8 {
        self.page
    }

    #[inline]
    pub fn offset(&self) -> u8 {
        self.offset
    }
}

impl FromStr for LogicalAddress {
    type Err = AddressError;

    /// Parse one line of the address stream as a base-10 integer
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let value: i64 = token.parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                AddressError::OutOfRange(token.to_string())
            }
            _ => AddressError::Malformed(token.to_string()),
        })?;
        let raw = u16::try_from(value).map_err(|_| AddressError::OutOfRange(token.to_string()))?;
        Self::from_raw(raw)
    }
}

impl std::fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Address: {} Page Number: {} Offset: {}",
            self.raw, self.page, self.offset
        )
    }
}

/// Which path of the lookup protocol resolved a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    TlbHit,
    /// TLB miss, page already resident
    PageTableHit,
    PageFault,
}

/// Result of a successful address translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub virtual_address: u16,
    pub physical_address: usize,
    pub frame: usize,
    /// The byte at the physical address, reported signed
    pub value: i8,
    pub access: Access,
}

impl Translation {
    /// Same (virtual, physical, value) triple, ignoring how it was resolved
    pub fn same_output(&self, other: &Translation) -> bool {
        self.virtual_address == other.virtual_address
            && self.physical_address == other.physical_address
            && self.value == other.value
    }
}

impl std::fmt::Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Virtual address: {} Physical address: {} Value: {}",
            self.virtual_address, self.physical_address, self.value
        )
    }
}
