//! Sequential little-endian binary buffer.
//!
//! [`RamBuffer`] holds a byte vector and a read cursor. Reads decode fixed
//! width primitives at the cursor and advance it; writes append to the end.
//! The whole buffer can be loaded from or flushed to a file in one step,
//! which is how the diff file format moves between disk and memory.
//!
//! # Key Types
//!
//! - [`RamBuffer`] — the buffer itself
//! - [`BufferError`] / [`BufferResult`] — underrun and I/O errors

pub mod error;

pub use error::{BufferError, BufferResult};

use std::path::Path;

/// In-memory byte buffer with little-endian primitive access.
#[derive(Clone, Debug, Default)]
pub struct RamBuffer {
    data: Vec<u8>,
    pos: usize,
}

impl RamBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing bytes; the read cursor starts at the beginning.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// Load a file's entire contents into a fresh buffer.
    pub fn from_file(path: &Path) -> BufferResult<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Write the buffer's entire contents to a file.
    pub fn save(&self, path: &Path) -> BufferResult<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Total byte length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Borrow the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn take<const N: usize>(&mut self) -> BufferResult<[u8; N]> {
        if self.remaining() < N {
            return Err(BufferError::UnexpectedEof {
                needed: N,
                available: self.remaining(),
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> BufferResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_i16(&mut self) -> BufferResult<i16> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    pub fn read_u16(&mut self) -> BufferResult<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub fn read_i32(&mut self) -> BufferResult<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub fn read_f32(&mut self) -> BufferResult<f32> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }
}
