//! Multi-precision integer and fixed-size field codec.
//!
//! An MPI is encoded as a 2-byte big-endian bit count followed by the
//! magnitude bytes, most significant first, with no leading zero octets.

use crate::error::{Error, Result};
use std::fmt;
use zeroize::Zeroize;

/// An owned MPI magnitude, normalized (no leading zero bytes).
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct Mpi(Vec<u8>);

impl Mpi {
    /// Wraps raw magnitude bytes, stripping leading zeros.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self(bytes[start..].to_vec())
    }

    /// The magnitude bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of significant bits.
    pub fn bit_length(&self) -> usize {
        match self.0.first() {
            None => 0,
            Some(&first) => (self.0.len() - 1) * 8 + (8 - first.leading_zeros() as usize),
        }
    }

    /// Length of the magnitude in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends the wire encoding (bit count + magnitude) to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.bit_length() as u16).to_be_bytes());
        out.extend_from_slice(&self.0);
    }

    /// Returns the wire encoding.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.0.len());
        self.write(&mut out);
        out
    }

    /// The magnitude left-padded with zeros to `len` bytes.
    pub fn to_padded(&self, len: usize) -> Result<Vec<u8>> {
        left_pad(&self.0, len)
    }
}

impl fmt::Debug for Mpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mpi({} bits)", self.bit_length())
    }
}

impl From<Vec<u8>> for Mpi {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_slice(&bytes)
    }
}

/// Cursor over a wire buffer with bounds-checked reads.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unconsumed tail.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| Error::malformed("unexpected end of data"))?;
        self.pos += 1;
        Ok(b)
    }

    /// Reads a 2-byte big-endian integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a 4-byte big-endian integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| Error::malformed("unexpected end of data"))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// Reads an MPI: 2-byte bit count, then `ceil(bits/8)` magnitude bytes.
    pub fn read_mpi(&mut self) -> Result<Mpi> {
        let bits = self.read_u16()? as usize;
        let len = bits.div_ceil(8);
        let bytes = self.read_exact(len)?;
        Ok(Mpi::from_slice(bytes))
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

/// Prepends zeros so `bytes` occupies exactly `len` octets.
pub fn left_pad(bytes: &[u8], len: usize) -> Result<Vec<u8>> {
    if bytes.len() > len {
        return Err(Error::malformed(format!(
            "value of {} bytes does not fit in {} bytes",
            bytes.len(),
            len
        )));
    }
    let mut out = vec![0u8; len];
    out[len - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
