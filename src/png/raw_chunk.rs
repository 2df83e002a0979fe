use super::*;

/// Longest chunk data a PNG may declare.
pub const MAX_CHUNK_LEN: u32 = (1 << 31) - 1;

/// The four ASCII bytes naming a chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const acTL: Self = Self(*b"acTL");
  pub const fcTL: Self = Self(*b"fcTL");
  pub const fdAT: Self = Self(*b"fdAT");
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for b in self.0 {
      f.write_char(if b.is_ascii_graphic() { b as char } else { '?' })?;
    }
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'b> {
  pub chunk_ty: ChunkType,
  pub data: &'b [u8],
  /// The CRC written after the data. Nothing checks it.
  pub declared_crc: u32,
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> RawChunk<'b> {
  /// Reads one `{length, type, data, crc}` chunk.
  ///
  /// ## Failure
  /// * A length over [`MAX_CHUNK_LEN`] is `InvalidLength`.
  /// * Any part of the chunk missing is `UnexpectedEof`.
  pub fn read(bits: &mut BitSource<'b>) -> SplashResult<Self> {
    let len = bits.read_u32be()?;
    if len > MAX_CHUNK_LEN {
      return Err(SplashError::InvalidLength);
    }
    let chunk_ty = ChunkType(bits.read_array()?);
    let data = bits.read_slice(len as usize)?;
    let declared_crc = bits.read_u32be()?;
    Ok(Self { chunk_ty, data, declared_crc })
  }

  /// The CRC of the type and data bytes, for comparing with `declared_crc`.
  #[inline]
  #[must_use]
  pub fn compute_crc(&self) -> u32 {
    png_crc(self.chunk_ty.0.iter().chain(self.data.iter()).copied())
  }
}

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      c = if (c & 1) != 0 { 0xEDB8_8320_u32 ^ (c >> 1) } else { c >> 1 };
      k += 1;
    }
    out[n] = c;
    n += 1;
  }
  out
}

fn png_crc(iter: impl Iterator<Item = u8>) -> u32 {
  let mut crc = u32::MAX;
  for byte in iter {
    crc = CRC_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
  }
  crc ^ u32::MAX
}
