use crate::{SplashError, SplashResult};

/// A cursor over an immutable byte slice.
///
/// Byte-sized reads (`read_u8` and friends) always start at a byte boundary,
/// dropping any partially consumed byte first. Bit reads go LSB-first within
/// each byte, which is the DEFLATE bit order.
#[derive(Clone)]
pub struct BitSource<'b> {
  bytes: &'b [u8],
  pos: usize,
  bit_pos: u32,
}

impl core::fmt::Debug for BitSource<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("BitSource")
      .field("pos", &self.pos)
      .field("bit_pos", &self.bit_pos)
      .field("remaining", &self.remaining())
      .finish()
  }
}

impl<'b> BitSource<'b> {
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, pos: 0, bit_pos: 0 }
  }

  /// Byte position of the cursor (a partially read byte counts as unread).
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.pos
  }

  /// Whole bytes left after the cursor.
  #[inline]
  #[must_use]
  pub fn remaining(&self) -> usize {
    let partial = (self.bit_pos != 0) as usize;
    self.bytes.len().saturating_sub(self.pos + partial)
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  /// Discards any partially consumed byte.
  #[inline]
  pub fn align_to_byte(&mut self) {
    if self.bit_pos != 0 {
      self.bit_pos = 0;
      self.pos += 1;
    }
  }

  /// Takes the next `count` bytes as a sub-slice.
  pub fn read_slice(&mut self, count: usize) -> SplashResult<&'b [u8]> {
    self.align_to_byte();
    let end = self.pos.checked_add(count).ok_or(SplashError::UnexpectedEof)?;
    let out = self.bytes.get(self.pos..end).ok_or(SplashError::UnexpectedEof)?;
    self.pos = end;
    Ok(out)
  }

  #[inline]
  pub fn skip(&mut self, count: usize) -> SplashResult<()> {
    self.read_slice(count).map(|_| ())
  }

  #[inline]
  pub fn read_array<const N: usize>(&mut self) -> SplashResult<[u8; N]> {
    let s = self.read_slice(N)?;
    let mut a = [0_u8; N];
    a.copy_from_slice(s);
    Ok(a)
  }

  #[inline]
  pub fn read_u8(&mut self) -> SplashResult<u8> {
    self.read_array::<1>().map(|[b]| b)
  }

  #[inline]
  pub fn read_u16be(&mut self) -> SplashResult<u16> {
    self.read_array().map(u16::from_be_bytes)
  }

  #[inline]
  pub fn read_u32be(&mut self) -> SplashResult<u32> {
    self.read_array().map(u32::from_be_bytes)
  }

  #[inline]
  pub fn read_u16le(&mut self) -> SplashResult<u16> {
    self.read_array().map(u16::from_le_bytes)
  }

  #[inline]
  pub fn read_i16le(&mut self) -> SplashResult<i16> {
    self.read_array().map(i16::from_le_bytes)
  }

  /// Reads one bit, least significant bit of each byte first.
  #[inline]
  pub fn read_bit(&mut self) -> SplashResult<u32> {
    let byte = *self.bytes.get(self.pos).ok_or(SplashError::UnexpectedEof)?;
    let bit = (u32::from(byte) >> self.bit_pos) & 1;
    self.bit_pos += 1;
    if self.bit_pos == 8 {
      self.bit_pos = 0;
      self.pos += 1;
    }
    Ok(bit)
  }

  /// Reads `count` bits, the first bit read is the lowest bit of the output.
  ///
  /// * `count` must be 32 or less.
  pub fn read_bits(&mut self, count: u32) -> SplashResult<u32> {
    debug_assert!(count <= 32);
    let mut out = 0_u32;
    for i in 0..count {
      out |= self.read_bit()? << i;
    }
    Ok(out)
  }
}
