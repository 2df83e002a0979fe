#![forbid(unsafe_code)]

//! Module for raw splash bitmaps.
//!
//! This isn't the Windows BMP file format. It's the minimal layout a build
//! step bakes into a firmware or kernel image:
//!
//! * A 10 byte header, every field little-endian:
//!   * `width: u16`
//!   * `height: u16`
//!   * `x: i16`, `y: i16`: where to put the image. A negative value measures
//!     from the canvas's far edge to the image's far edge.
//!   * `bytes_per_pixel: u16`
//! * Then `width * height` pixels, top row first, with no row padding. Pixels
//!   are one of:
//!   * 4 bytes: a little-endian ARGB8888 `u32`.
//!   * 3 bytes: `[b, g, r]`.
//!   * 2 bytes: a little-endian RGB565 `u16`.
//!
//! The alpha of 4 byte pixels is ignored, every pixel is drawn opaque.

use alloc::vec::Vec;

use crate::{
  bit_source::BitSource,
  compose::{BlendOp, DisposeOp, Frame},
  SplashError, SplashResult, MAX_DIMENSION,
};

/// The fixed header in front of a raw splash bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplashBmpHeader {
  pub width: u16,
  pub height: u16,
  pub x: i16,
  pub y: i16,
  pub bytes_per_pixel: u16,
}
impl SplashBmpHeader {
  /// Bytes in the header.
  pub const LEN: usize = 10;

  /// Reads the header off the front of the bytes.
  ///
  /// ## Failure
  /// * Fewer than [`LEN`](Self::LEN) bytes is `UnexpectedEof`.
  /// * A zero width or height, or one over [`MAX_DIMENSION`], is
  ///   `InvalidLength`.
  /// * A pixel size other than 2, 3, or 4 bytes is `UnsupportedFeature`.
  pub fn parse(bits: &mut BitSource<'_>) -> SplashResult<Self> {
    let mut fields = BitSource::new(bits.read_slice(Self::LEN)?);
    let header = Self {
      width: fields.read_u16le()?,
      height: fields.read_u16le()?,
      x: fields.read_i16le()?,
      y: fields.read_i16le()?,
      bytes_per_pixel: fields.read_u16le()?,
    };
    for dim in [header.width, header.height] {
      if dim == 0 || u32::from(dim) > MAX_DIMENSION {
        return Err(SplashError::InvalidLength);
      }
    }
    if !matches!(header.bytes_per_pixel, 2..=4) {
      return Err(SplashError::UnsupportedFeature);
    }
    Ok(header)
  }

  #[inline]
  #[must_use]
  pub const fn pixel_count(&self) -> usize {
    self.width as usize * self.height as usize
  }
}

/// Scales a channel that runs `0..=max` to `0..=255`.
#[inline]
#[must_use]
const fn scale_channel(bits: u16, max: u16) -> u32 {
  bits as u32 * 255 / max as u32
}

/// Converts one pixel's bytes to opaque ARGB8888.
#[inline]
#[must_use]
fn pixel_to_argb(bytes: &[u8]) -> u32 {
  match *bytes {
    [b0, b1, b2, b3] => 0xFF00_0000 | u32::from_le_bytes([b0, b1, b2, b3]),
    [b, g, r] => 0xFF00_0000 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b),
    [lo, hi] => {
      let rgb565 = u16::from_le_bytes([lo, hi]);
      let r = scale_channel(rgb565 >> 11, 0b1_1111);
      let g = scale_channel((rgb565 >> 5) & 0b11_1111, 0b11_1111);
      let b = scale_channel(rgb565 & 0b1_1111, 0b1_1111);
      0xFF00_0000 | r << 16 | g << 8 | b
    }
    _ => 0xFF00_0000,
  }
}

/// Decodes a raw splash bitmap.
///
/// The frame has no delay, `DisposeOp::None`, and `BlendOp::Source`. The
/// header's placement comes back alongside it.
///
/// ## Failure
/// * Anything [`SplashBmpHeader::parse`] rejects.
/// * Fewer pixel bytes than the header promises is `UnexpectedEof`.
/// * Allocating the pixels can fail with `AllocationFailure`.
pub fn decode_splash_bmp(bytes: &[u8]) -> SplashResult<(Frame, (i32, i32))> {
  let mut bits = BitSource::new(bytes);
  let header = SplashBmpHeader::parse(&mut bits)?;
  log::debug!(
    "bmp: {}x{} at {},{} with {} bytes per pixel",
    header.width,
    header.height,
    header.x,
    header.y,
    header.bytes_per_pixel
  );
  let bpp = usize::from(header.bytes_per_pixel);
  let data = bits.read_slice(header.pixel_count() * bpp)?;
  let mut pixels: Vec<u32> = Vec::new();
  pixels.try_reserve(header.pixel_count())?;
  pixels.extend(data.chunks_exact(bpp).map(pixel_to_argb));
  let frame = Frame {
    width: u32::from(header.width),
    height: u32::from(header.height),
    x_offset: 0,
    y_offset: 0,
    delay_us: 0,
    dispose_op: DisposeOp::None,
    blend_op: BlendOp::Source,
    pixels,
  };
  Ok((frame, (i32::from(header.x), i32::from(header.y))))
}
