use pixel_formats::r8g8b8a8_Srgb;

use crate::{SplashError, SplashResult};

/// Packs an RGBA color into an ARGB8888 `u32`.
#[inline]
#[must_use]
pub const fn argb_from_rgba(c: r8g8b8a8_Srgb) -> u32 {
  (c.a as u32) << 24 | (c.r as u32) << 16 | (c.g as u32) << 8 | (c.b as u32)
}

/// A borrowed ARGB8888 framebuffer.
///
/// Rows are `stride` bytes apart, which can be more than `width` pixels. All
/// reads and writes take signed positions and anything outside the
/// `width` by `height` area is clipped: reads give `None`, writes do nothing.
pub struct Canvas<'a> {
  pixels: &'a mut [u32],
  width: u32,
  height: u32,
  /// in pixels, not bytes
  stride: usize,
}
impl core::fmt::Debug for Canvas<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Canvas")
      .field("width", &self.width)
      .field("height", &self.height)
      .field("stride_bytes", &self.stride_bytes())
      .finish()
  }
}

impl<'a> Canvas<'a> {
  /// Wraps a framebuffer of `u32` pixels.
  ///
  /// ## Failure
  /// * A stride that isn't a multiple of 4, is less than `width * 4`, or a
  ///   buffer too short for `height` rows, is `InvalidLength`.
  pub fn new(
    pixels: &'a mut [u32], width: u32, height: u32, stride_bytes: usize,
  ) -> SplashResult<Self> {
    if stride_bytes % 4 != 0 {
      return Err(SplashError::InvalidLength);
    }
    let stride = stride_bytes / 4;
    if stride < width as usize {
      return Err(SplashError::InvalidLength);
    }
    // the last row only needs to be `width` long
    let needed = match height.checked_sub(1) {
      None => 0,
      Some(full_rows) => (full_rows as usize)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(width as usize))
        .ok_or(SplashError::InvalidLength)?,
    };
    if pixels.len() < needed {
      return Err(SplashError::InvalidLength);
    }
    Ok(Self { pixels, width, height, stride })
  }

  /// Wraps a framebuffer given as bytes.
  ///
  /// Trailing bytes that don't make up a whole pixel are ignored.
  ///
  /// ## Failure
  /// * Bytes that aren't aligned for `u32` are `InvalidLength`.
  /// * Otherwise as with [`Canvas::new`].
  pub fn from_bytes(
    bytes: &'a mut [u8], width: u32, height: u32, stride_bytes: usize,
  ) -> SplashResult<Self> {
    let whole = bytes.len() / 4 * 4;
    let pixels: &mut [u32] = bytemuck::try_cast_slice_mut(&mut bytes[..whole])
      .map_err(|_| SplashError::InvalidLength)?;
    Self::new(pixels, width, height, stride_bytes)
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  #[inline]
  #[must_use]
  pub const fn stride_bytes(&self) -> usize {
    self.stride * 4
  }

  #[inline]
  fn index(&self, x: i64, y: i64) -> Option<usize> {
    if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
      None
    } else {
      Some((y as usize) * self.stride + (x as usize))
    }
  }

  #[inline]
  #[must_use]
  pub fn get(&self, x: i64, y: i64) -> Option<u32> {
    self.index(x, y).and_then(|i| self.pixels.get(i)).copied()
  }

  #[inline]
  pub fn set(&mut self, x: i64, y: i64, argb: u32) {
    if let Some(p) = self.index(x, y).and_then(|i| self.pixels.get_mut(i)) {
      *p = argb;
    }
  }

  /// Fills a rectangle, clipped to the canvas.
  pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, argb: u32) {
    for yy in y..y + i64::from(height) {
      for xx in x..x + i64::from(width) {
        self.set(xx, yy, argb);
      }
    }
  }
}
