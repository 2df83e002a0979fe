//! Putting a splash image on the screen.
//!
//! [`show_splash`] is the one call a boot sequence makes. It picks the
//! decoder from the first byte of the image, places the image on the canvas,
//! and plays every frame with its delay. A failure stops the run where it is
//! and is logged, so the caller can carry on booting either way.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::{
  canvas::Canvas,
  compose::{effective_dispose, Compositor, Frame},
  SplashError, SplashResult,
};

/// How many times an animation that says "play forever" gets played.
pub const DEFAULT_ENDLESS_PLAYS: u32 = 20;

/// Settings for a splash run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplashConfig {
  /// RGB (`0x00RRGGBB`) used under `BlendOp::Source`, for
  /// `DisposeOp::Background`, and for fully transparent pixels.
  pub background: u32,
  /// Horizontal placement. A negative value `-n` puts the image's right edge
  /// `n` pixels in from the canvas's right edge.
  pub x: i32,
  /// Vertical placement, same as `x` but for the bottom edge.
  pub y: i32,
  /// Play-throughs for an animation with a play count of 0. Like any play
  /// count it's capped at `MAX_PLAYS`.
  pub endless_play_count: u32,
  /// Use the PNG's `bKGD` color, when it has one, instead of `background`.
  pub honor_bkgd: bool,
}
impl Default for SplashConfig {
  #[inline]
  fn default() -> Self {
    Self {
      background: 0,
      x: 0,
      y: 0,
      endless_play_count: DEFAULT_ENDLESS_PLAYS,
      honor_bkgd: false,
    }
  }
}

/// What a completed splash run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SplashStats {
  /// Frames in one play-through.
  pub frames: u32,
  /// Play-throughs shown.
  pub plays: u32,
}

/// Where an image's near edge goes along one axis of the canvas.
///
/// ```
/// # use bootsplash::resolve_origin;
/// assert_eq!(resolve_origin(5, 10, 100), 5);
/// assert_eq!(resolve_origin(-5, 10, 100), 85);
/// ```
#[inline]
#[must_use]
pub fn resolve_origin(pos: i32, image_extent: u32, canvas_extent: u32) -> i64 {
  if pos < 0 {
    i64::from(canvas_extent) - i64::from(image_extent) + i64::from(pos)
  } else {
    i64::from(pos)
  }
}

/// Blocks for `us` microseconds, in pieces `DelayNs` can take.
fn wait<D: DelayNs>(delay: &mut D, mut us: u64) {
  while us > 0 {
    let step = u32::try_from(us).unwrap_or(u32::MAX);
    delay.delay_us(step);
    us -= u64::from(step);
  }
}

/// Decodes `image` and plays it on `canvas`.
///
/// A first byte of `0x89` means PNG (or APNG), anything else is read as a raw
/// splash bitmap.
///
/// * A still image is painted once.
/// * An animation plays its frames in order, holding each for its delay,
///   `num_plays` times (or [`SplashConfig::endless_play_count`] times when
///   `num_plays` is 0), but never more than `MAX_PLAYS` times. The canvas
///   isn't reset between play-throughs.
///
/// A frame is only painted once it's fully decoded, so an error before the
/// first frame leaves the canvas untouched, and a later error leaves the
/// frames painted so far on screen.
///
/// ## Failure
/// * Empty input, or an image without any frames, is `UnexpectedEof`.
/// * Input of a format whose cargo feature is off is `UnsupportedFeature`.
/// * Anything the decoders or the compositor report.
///
/// Errors are logged at warn level before they're returned.
pub fn show_splash<D: DelayNs>(
  image: &[u8], canvas: &mut Canvas<'_>, config: &SplashConfig, delay: &mut D,
) -> SplashResult<SplashStats> {
  let result = match image.first() {
    None => Err(SplashError::UnexpectedEof),
    Some(0x89) => show_png(image, canvas, config, delay),
    Some(_) => show_bmp(image, canvas, config, delay),
  };
  match &result {
    Ok(stats) => log::info!("splash: {} frames, {} plays", stats.frames, stats.plays),
    Err(e) => log::warn!("splash: stopped: {e}"),
  }
  result
}

#[cfg(feature = "png")]
fn show_png<D: DelayNs>(
  image: &[u8], canvas: &mut Canvas<'_>, config: &SplashConfig, delay: &mut D,
) -> SplashResult<SplashStats> {
  let mut decoder = crate::png::PngDecoder::new(image)?;
  let header = decoder.header();
  let background = match header.background {
    Some(bkgd) if config.honor_bkgd => bkgd,
    _ => config.background,
  };
  let origin = (
    resolve_origin(config.x, header.width, canvas.width()),
    resolve_origin(config.y, header.height, canvas.height()),
  );
  let plays = match decoder.animation() {
    None => 1,
    Some(actl) if actl.num_plays == 0 => config.endless_play_count,
    Some(actl) => actl.num_plays,
  }
  .clamp(1, crate::png::MAX_PLAYS);
  log::debug!("splash: png at {},{} for {plays} plays", origin.0, origin.1);
  let mut compositor = Compositor::new(canvas, origin, background);

  // The first play-through decodes as it goes. Whether a frame is the last
  // one is only known once the decoder runs out, so the next frame is
  // decoded before the current one is disposed.
  let mut kept: Vec<Frame> = Vec::new();
  let mut next = decoder.next_frame()?;
  if next.is_none() {
    return Err(SplashError::UnexpectedEof);
  }
  let mut index = 0_u32;
  while let Some(frame) = next {
    let dispose = effective_dispose(frame.dispose_op, index == 0, false);
    compositor.paint(&frame, dispose)?;
    wait(delay, frame.delay_us);
    next = decoder.next_frame()?;
    let dispose =
      if next.is_none() { effective_dispose(dispose, false, true) } else { dispose };
    compositor.dispose(&frame, dispose);
    if plays > 1 {
      kept.try_reserve(1)?;
      kept.push(frame);
    }
    index += 1;
  }

  for _ in 1..plays {
    play_frames(&mut compositor, &kept, delay)?;
  }
  Ok(SplashStats { frames: index, plays })
}

#[cfg(not(feature = "png"))]
fn show_png<D: DelayNs>(
  _image: &[u8], _canvas: &mut Canvas<'_>, _config: &SplashConfig, _delay: &mut D,
) -> SplashResult<SplashStats> {
  Err(SplashError::UnsupportedFeature)
}

/// One play-through of frames that are already decoded.
#[cfg_attr(not(any(feature = "png", feature = "bmp")), allow(dead_code))]
fn play_frames<D: DelayNs>(
  compositor: &mut Compositor<'_, '_>, frames: &[Frame], delay: &mut D,
) -> SplashResult<()> {
  let last = frames.len().saturating_sub(1);
  for (i, frame) in frames.iter().enumerate() {
    let dispose = effective_dispose(frame.dispose_op, i == 0, i == last);
    compositor.paint(frame, dispose)?;
    wait(delay, frame.delay_us);
    compositor.dispose(frame, dispose);
  }
  Ok(())
}

#[cfg(feature = "bmp")]
fn show_bmp<D: DelayNs>(
  image: &[u8], canvas: &mut Canvas<'_>, config: &SplashConfig, delay: &mut D,
) -> SplashResult<SplashStats> {
  let (frame, (x, y)) = crate::bmp::decode_splash_bmp(image)?;
  let origin = (
    resolve_origin(x, frame.width, canvas.width()),
    resolve_origin(y, frame.height, canvas.height()),
  );
  log::debug!("splash: bmp at {},{}", origin.0, origin.1);
  let mut compositor = Compositor::new(canvas, origin, config.background);
  play_frames(&mut compositor, core::slice::from_ref(&frame), delay)?;
  Ok(SplashStats { frames: 1, plays: 1 })
}

#[cfg(not(feature = "bmp"))]
fn show_bmp<D: DelayNs>(
  _image: &[u8], _canvas: &mut Canvas<'_>, _config: &SplashConfig, _delay: &mut D,
) -> SplashResult<SplashStats> {
  Err(SplashError::UnsupportedFeature)
}
