//! DEFLATE decompression (RFC 1951) and the zlib wrapper around it (RFC 1950).
//!
//! Every block builds its own Huffman trees and drops them when the block
//! ends. Output goes into a caller-owned `Vec<u8>` which is never allowed to
//! grow past a caller-given limit, and every back-reference is checked
//! against the bytes produced so far.

use alloc::vec::Vec;

use crate::{bit_source::BitSource, SplashError, SplashResult};

mod tree_entry;
use tree_entry::*;

mod huff_tree;
pub use huff_tree::*;

mod code_length_alphabet;
use code_length_alphabet::*;

/// Decompresses DEFLATE blocks from `bits`, appending to `out`.
///
/// Stops after the block marked final ends. Bits after that are left unread
/// in `bits`.
///
/// ## Failure
/// * Running out of input is `UnexpectedEof`.
/// * Block type 3, a bad Huffman code, or a length/distance symbol that
///   doesn't exist is `UnsupportedFeature`.
/// * A back-reference to before the start of `out`, or output that would grow
///   `out` past `limit` bytes, is `InvalidLength`.
pub fn inflate(bits: &mut BitSource<'_>, out: &mut Vec<u8>, limit: usize) -> SplashResult<()> {
  loop {
    let is_final = bits.read_bit()? == 1;
    let block_type = bits.read_bits(2)?;
    log::trace!("inflate: block bfinal={} btype={block_type}", is_final as u8);
    match block_type {
      0 => copy_stored_block(bits, out, limit)?,
      1 => {
        let lit_len = HuffTree::fixed_lit_len()?;
        let dist = HuffTree::fixed_dist()?;
        decode_huffman_block(bits, &lit_len, &dist, out, limit)?;
      }
      2 => {
        let (lit_len, dist) = read_dynamic_trees(bits)?;
        decode_huffman_block(bits, &lit_len, &dist, out, limit)?;
      }
      _ => return Err(SplashError::UnsupportedFeature),
    }
    if is_final {
      return Ok(());
    }
  }
}

/// Checks a zlib header then inflates the stream that follows it.
///
/// The Adler-32 trailer is not checked, and doesn't even need to be present.
///
/// ## Failure
/// * A compression method other than DEFLATE, a window over 32k, a header
///   check that isn't a multiple of 31, or a preset dictionary are all
///   `UnsupportedFeature`.
/// * Otherwise, as with [`inflate`].
pub fn zlib_decompress(data: &[u8], limit: usize, out: &mut Vec<u8>) -> SplashResult<()> {
  let mut bits = BitSource::new(data);
  let cmf = bits.read_u8()?;
  let flg = bits.read_u8()?;
  let method = cmf & 0b1111;
  let window_info = cmf >> 4;
  let check = (u16::from(cmf) << 8) | u16::from(flg);
  let preset_dictionary = (flg & 0b0010_0000) != 0;
  if method != 8 || window_info > 7 || check % 31 != 0 || preset_dictionary {
    log::debug!("inflate: bad zlib header {cmf:02X} {flg:02X}");
    return Err(SplashError::UnsupportedFeature);
  }
  inflate(&mut bits, out, limit)
}

fn copy_stored_block(
  bits: &mut BitSource<'_>, out: &mut Vec<u8>, limit: usize,
) -> SplashResult<()> {
  bits.align_to_byte();
  let len = bits.read_bits(16)? as usize;
  // NLEN is supposed to be the one's complement of LEN, we don't check it.
  let _nlen = bits.read_bits(16)?;
  log::trace!("inflate: stored block len={len}");
  let data = bits.read_slice(len)?;
  if out.len() + data.len() > limit {
    return Err(SplashError::InvalidLength);
  }
  out.try_reserve(data.len())?;
  out.extend_from_slice(data);
  Ok(())
}

fn decode_huffman_block(
  bits: &mut BitSource<'_>, lit_len: &HuffTree, dist: &HuffTree, out: &mut Vec<u8>, limit: usize,
) -> SplashResult<()> {
  loop {
    let leaf = lit_len.decode(bits)?;
    match leaf.symbol {
      0..=255 => {
        if out.len() >= limit {
          return Err(SplashError::InvalidLength);
        }
        out.try_reserve(1)?;
        out.push(leaf.symbol as u8);
      }
      256 => return Ok(()),
      257..=285 => {
        let length = read_value(bits, leaf)?;
        let dist_leaf = dist.decode(bits)?;
        if dist_leaf.symbol > 29 {
          return Err(SplashError::UnsupportedFeature);
        }
        let distance = read_value(bits, dist_leaf)?;
        copy_back_reference(out, distance, length, limit)?;
      }
      _ => return Err(SplashError::UnsupportedFeature),
    }
  }
}

#[inline]
fn read_value(bits: &mut BitSource<'_>, leaf: HuffLeaf) -> SplashResult<usize> {
  Ok(usize::from(leaf.real_value) + bits.read_bits(u32::from(leaf.extra_bits))? as usize)
}

/// Appends `length` bytes starting `distance` bytes back from the end of
/// `out`.
///
/// Copies go one byte at a time, so when `length > distance` the copy reads
/// bytes it just wrote.
fn copy_back_reference(
  out: &mut Vec<u8>, distance: usize, length: usize, limit: usize,
) -> SplashResult<()> {
  if distance == 0 || distance > out.len() || out.len() + length > limit {
    return Err(SplashError::InvalidLength);
  }
  out.try_reserve(length)?;
  let start = out.len() - distance;
  for i in start..start + length {
    let byte = out[i];
    out.push(byte);
  }
  Ok(())
}

/// Writes bits in the order `BitSource` reads them, for building test
/// streams by hand.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct BitWriter {
  pub(crate) out: Vec<u8>,
  bit_count: u32,
}
#[cfg(test)]
impl BitWriter {
  /// Raw bits, lowest bit of `value` first.
  pub(crate) fn put(&mut self, value: u32, count: u32) {
    for i in 0..count {
      if self.bit_count % 8 == 0 {
        self.out.push(0);
      }
      let bit = ((value >> i) & 1) as u8;
      if let Some(last) = self.out.last_mut() {
        *last |= bit << (self.bit_count % 8);
      }
      self.bit_count += 1;
    }
  }
  /// Huffman codes, most significant bit first.
  pub(crate) fn put_code(&mut self, code: u32, count: u32) {
    for shift in (0..count).rev() {
      self.put((code >> shift) & 1, 1);
    }
  }
}
