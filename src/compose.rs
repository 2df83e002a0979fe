//! Frames, and putting them on a canvas.
//!
//! Blending works per color channel with integer math:
//! `out = (frame * alpha + under * (255 - alpha)) / 255`, and every pixel
//! written to the canvas is opaque.

use alloc::vec::Vec;

use crate::{canvas::Canvas, SplashResult};

/// How a frame's area is reset after the frame has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DisposeOp {
  /// Leave the frame's pixels in place.
  #[default]
  None = 0,
  /// Fill the frame's area with the background color.
  Background = 1,
  /// Put back what was under the frame before it was painted.
  Previous = 2,
}
impl TryFrom<u8> for DisposeOp {
  type Error = crate::SplashError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Background,
      2 => Self::Previous,
      _ => return Err(crate::SplashError::UnsupportedFeature),
    })
  }
}

/// How a frame's pixels combine with what's under them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlendOp {
  /// Blend against the background color, ignoring the canvas.
  #[default]
  Source = 0,
  /// Blend against the canvas. Fully transparent pixels leave it untouched.
  Over = 1,
}
impl TryFrom<u8> for BlendOp {
  type Error = crate::SplashError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::Source,
      1 => Self::Over,
      _ => return Err(crate::SplashError::UnsupportedFeature),
    })
  }
}

/// One decoded image, placed within the full image's area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
  pub width: u32,
  pub height: u32,
  pub x_offset: u32,
  pub y_offset: u32,
  /// How long to show the frame, in microseconds.
  pub delay_us: u64,
  pub dispose_op: DisposeOp,
  pub blend_op: BlendOp,
  /// ARGB8888, row-major, `width * height` long.
  pub pixels: Vec<u32>,
}
impl Frame {
  fn rows(&self) -> impl Iterator<Item = (u32, &[u32])> {
    // a zero width frame has no pixels to show
    self
      .pixels
      .chunks_exact(self.width.max(1) as usize)
      .take(self.height as usize)
      .zip(0..)
      .map(|(row, y)| (y, row))
  }
}

#[inline]
#[must_use]
const fn blend_channel(frame: u32, under: u32, alpha: u32) -> u32 {
  (frame * alpha + under * (255 - alpha)) / 255
}

/// Blends an ARGB frame pixel over an ARGB pixel using the frame pixel's
/// alpha. The output is always opaque.
#[inline]
#[must_use]
pub const fn blend_pixel(frame: u32, under: u32) -> u32 {
  let alpha = frame >> 24;
  let r = blend_channel((frame >> 16) & 0xFF, (under >> 16) & 0xFF, alpha);
  let g = blend_channel((frame >> 8) & 0xFF, (under >> 8) & 0xFF, alpha);
  let b = blend_channel(frame & 0xFF, under & 0xFF, alpha);
  0xFF00_0000 | r << 16 | g << 8 | b
}

/// The dispose op actually used for a frame.
///
/// The first frame has nothing to go back to, so `Previous` acts as
/// `Background`. The last frame of a play-through always stays on screen.
#[inline]
#[must_use]
pub const fn effective_dispose(op: DisposeOp, is_first: bool, is_last: bool) -> DisposeOp {
  match op {
    _ if is_last => DisposeOp::None,
    DisposeOp::Previous if is_first => DisposeOp::Background,
    other => other,
  }
}

/// Paints frames onto a canvas and undoes them again.
///
/// `origin` is where the full image's top left corner sits on the canvas,
/// which may be partly or wholly off of it.
pub struct Compositor<'c, 'a> {
  canvas: &'c mut Canvas<'a>,
  origin: (i64, i64),
  background: u32,
  /// What was under the last frame painted with `DisposeOp::Previous`.
  saved: Vec<u32>,
}
impl core::fmt::Debug for Compositor<'_, '_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Compositor")
      .field("canvas", &self.canvas)
      .field("origin", &self.origin)
      .field("background", &self.background)
      .finish()
  }
}
impl<'c, 'a> Compositor<'c, 'a> {
  /// `background` is RGB, the alpha byte is ignored.
  #[inline]
  #[must_use]
  pub fn new(canvas: &'c mut Canvas<'a>, origin: (i64, i64), background: u32) -> Self {
    Self { canvas, origin, background: 0xFF00_0000 | background, saved: Vec::new() }
  }

  #[inline]
  #[must_use]
  pub fn canvas(&self) -> &Canvas<'a> {
    &*self.canvas
  }

  /// Where a frame's top left corner lands on the canvas.
  #[inline]
  fn frame_origin(&self, frame: &Frame) -> (i64, i64) {
    (self.origin.0 + i64::from(frame.x_offset), self.origin.1 + i64::from(frame.y_offset))
  }

  /// Composites `frame` onto the canvas with its blend op.
  ///
  /// When the frame will be disposed with `DisposeOp::Previous`, pass that as
  /// `dispose` so the pixels under it are saved first.
  ///
  /// ## Failure
  /// * Saving the pixels under the frame can fail with `AllocationFailure`.
  pub fn paint(&mut self, frame: &Frame, dispose: DisposeOp) -> SplashResult<()> {
    let (fx, fy) = self.frame_origin(frame);
    if dispose == DisposeOp::Previous {
      self.saved.clear();
      let count = (frame.width as usize).saturating_mul(frame.height as usize);
      self.saved.try_reserve(count)?;
      for y in 0..i64::from(frame.height) {
        for x in 0..i64::from(frame.width) {
          // off-canvas pixels are never restored, any value works
          self.saved.push(self.canvas.get(fx + x, fy + y).unwrap_or(0));
        }
      }
    }
    for (y, row) in frame.rows() {
      let cy = fy + i64::from(y);
      for (x, &pixel) in (0_i64..).zip(row.iter()) {
        let cx = fx + x;
        let out = match frame.blend_op {
          BlendOp::Source => blend_pixel(pixel, self.background),
          BlendOp::Over => {
            if pixel >> 24 == 0 {
              continue;
            }
            match self.canvas.get(cx, cy) {
              Some(under) => blend_pixel(pixel, under),
              None => continue,
            }
          }
        };
        self.canvas.set(cx, cy, out);
      }
    }
    Ok(())
  }

  /// Resets the area `frame` covered.
  ///
  /// `DisposeOp::Previous` restores what the last `paint` with that op saved.
  pub fn dispose(&mut self, frame: &Frame, dispose: DisposeOp) {
    let (fx, fy) = self.frame_origin(frame);
    match dispose {
      DisposeOp::None => (),
      DisposeOp::Background => {
        self.canvas.fill_rect(fx, fy, frame.width, frame.height, self.background);
      }
      DisposeOp::Previous => {
        let width = frame.width as usize;
        for (i, &pixel) in self.saved.iter().enumerate() {
          let x = (i % width.max(1)) as i64;
          let y = (i / width.max(1)) as i64;
          self.canvas.set(fx + x, fy + y, pixel);
        }
      }
    }
  }
}
