use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::constants::*;
use crate::error::TranslationError;

pub type Frame = [u8; FRAME_SIZE];

pub struct PhysicalMemory {
    frames: Box<[Frame]>,
}

impl PhysicalMemory {
    /// Create a new physical memory of `num_frames` frames, all zeroed
    pub fn new(num_frames: usize) -> Self {
        let frames = vec![[0u8; FRAME_SIZE]; num_frames].into_boxed_slice();
        PhysicalMemory { frames }
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Read one byte from a frame
    #[inline]
    pub fn read_byte(&self, frame: usize, offset: u8) -> u8 {
        self.frames[frame][offset as usize]
    }

    /// Replace the whole contents of a frame
    pub fn write_frame(&mut self, frame: usize, bytes: &Frame) {
        self.frames[frame].copy_from_slice(bytes);
    }

    /// Calculate the physical address of an offset within a frame
    #[inline]
    pub fn frame_to_address(frame: usize, offset: u8) -> usize {
        frame * FRAME_SIZE + offset as usize
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_FRAMES)
    }
}

/// Hands out frames in order. Frames are never returned: pages stay
/// resident for the whole run.
#[derive(Debug, Clone)]
pub struct FrameAllocator {
    next: usize,
    capacity: usize,
}

impl FrameAllocator {
    pub fn new(capacity: usize) -> Self {
        FrameAllocator { next: 0, capacity }
    }

    /// The frame the next fault will fill, without claiming it
    pub fn peek(&self) -> Result<usize, TranslationError> {
        if self.next < self.capacity {
            Ok(self.next)
        } else {
            Err(TranslationError::FramesExhausted {
                capacity: self.capacity,
            })
        }
    }

    pub fn allocate(&mut self) -> Result<usize, TranslationError> {
        let frame = self.peek()?;
        self.next += 1;
        Ok(frame)
    }

    pub fn allocated(&self) -> usize {
        self.next
    }

    pub fn free_count(&self) -> usize {
        self.capacity - self.next
    }
}

/// Read-only source of page contents, addressed by `page * PAGE_SIZE`
pub struct BackingStore<R> {
    inner: R,
}

impl BackingStore<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(BackingStore::new(File::open(path)?))
    }
}

impl<R: Read + Seek> BackingStore<R> {
    pub fn new(inner: R) -> Self {
        BackingStore { inner }
    }

    /// Read an entire page into `frame`: one seek, then one exact read.
    ///
    /// A store that ends early yields `ShortRead`. `frame` may hold a partial
    /// page afterwards, so callers must not map it.
    pub fn read_page(&mut self, page: u8, frame: &mut Frame) -> Result<(), TranslationError> {
        let offset = (page as usize * PAGE_SIZE) as u64;
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|source| TranslationError::BackingStore { page, source })?;
        self.inner.read_exact(frame).map_err(|source| {
            if source.kind() == io::ErrorKind::UnexpectedEof {
                TranslationError::ShortRead { page }
            } else {
                TranslationError::BackingStore { page, source }
            }
        })
    }
}
