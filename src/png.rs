#![forbid(unsafe_code)]

//! Module for working with PNG and APNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//! * [APNG Specification][apng-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//! [apng-spec]: https://wiki.mozilla.org/APNG_Specification
//!
//! The general format of a PNG is that the information is stored in "chunks".
//! There's a header chunk, then some optional chunks that apply to the whole
//! image (palette, transparency, background, gamma, and for animations the
//! animation control), then the compressed image data, then an end chunk.
//!
//! An APNG adds frame control chunks, each one describing a sub-rectangle of
//! the image plus its timing and how it combines with the frame before it.
//! The first frame's data can be the regular image data, every later frame's
//! data lives in frame data chunks.
//!
//! [`PngDecoder`] walks the chunks and hands out one fully decoded
//! [`Frame`](crate::compose::Frame) at a time. Decoding a frame goes:
//! 1. zlib decompression of all the frame's data chunks at once.
//! 2. Unfiltering each scanline in place ([`unfilter_lines`]).
//! 3. Expanding each scanline into ARGB pixels ([`expand_scanline`]).
//!
//! Interlaced images do steps 2 and 3 once per reduced image, scattering the
//! expanded pixels into their place in the full frame.

use core::fmt::{Debug, Write};

use alloc::vec::Vec;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{
  bit_source::BitSource,
  canvas::argb_from_rgba,
  compose::{BlendOp, DisposeOp, Frame},
  inflate::zlib_decompress,
  SplashError, SplashResult, MAX_DIMENSION,
};

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod trns;
pub use trns::*;

mod bkgd;
pub use bkgd::*;

mod actl;
pub use actl::*;

mod fctl;
pub use fctl::*;

mod interlace;
pub use interlace::*;

mod unfilter;
pub use unfilter::*;

mod expand;
pub use expand::*;

mod chunk_parser;
pub use chunk_parser::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Decodes one image (or APNG frame) of `width` by `height` pixels from its
/// zlib compressed data.
///
/// `header` supplies the pixel format and interlacing, and `palette` is
/// needed for indexed color.
///
/// ## Failure
/// * Decompressed data shorter than the image needs is `UnexpectedEof`, and
///   longer is `InvalidLength`.
/// * Any failure of decompression, unfiltering, or expansion.
pub fn decode_image_data(
  header: &ImageHeader, palette: Option<&Palette>, width: u32, height: u32, compressed: &[u8],
) -> SplashResult<Vec<u32>> {
  let passes = pass_dimensions(width, height, header.is_interlaced);
  let mut expected = 0_usize;
  for &(pass_width, pass_height) in passes.iter() {
    if pass_width != 0 && pass_height != 0 {
      let filterline = 1 + header.bytes_per_line(pass_width);
      expected = filterline
        .checked_mul(pass_height as usize)
        .and_then(|bytes| bytes.checked_add(expected))
        .ok_or(SplashError::InvalidLength)?;
    }
  }

  let mut filtered: Vec<u8> = Vec::new();
  zlib_decompress(compressed, expected, &mut filtered)?;
  if filtered.len() < expected {
    return Err(SplashError::UnexpectedEof);
  }

  let pixel_count =
    (width as usize).checked_mul(height as usize).ok_or(SplashError::InvalidLength)?;
  let mut pixels: Vec<u32> = Vec::new();
  pixels.try_reserve(pixel_count)?;
  pixels.resize(pixel_count, 0);

  let mut remaining: &mut [u8] = &mut filtered;
  for (pass, &(pass_width, pass_height)) in passes.iter().enumerate() {
    if pass_width == 0 || pass_height == 0 {
      continue;
    }
    let filterline = 1 + header.bytes_per_line(pass_width);
    let (this_pass, rest) =
      core::mem::take(&mut remaining).split_at_mut(filterline * pass_height as usize);
    remaining = rest;
    unfilter_lines(this_pass, filterline, header.bytes_per_pixel())?;

    for (reduced_y, line) in this_pass.chunks_exact(filterline).enumerate() {
      let reduced_y = reduced_y as u32;
      expand_scanline(header, palette, &line[1..], pass_width, |reduced_x, rgba| {
        let (x, y) = if header.is_interlaced {
          interlaced_pos_to_full_pos(pass, reduced_x, reduced_y)
        } else {
          (reduced_x, reduced_y)
        };
        let i = (y as usize) * (width as usize) + (x as usize);
        if let Some(p) = pixels.get_mut(i) {
          *p = argb_from_rgba(rgba);
        }
      })?;
    }
  }
  Ok(pixels)
}
