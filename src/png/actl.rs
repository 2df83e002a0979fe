use super::*;

/// Most frames an animation may declare.
pub const MAX_FRAMES: u32 = 1024;

/// Most play-throughs a splash gives an animation, whatever its `acTL` asks.
pub const MAX_PLAYS: u32 = 256;

/// Animation Control: an `acTL` chunk marks a PNG as an APNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationControl {
  /// Frames in the animation, which doesn't count a default image that's
  /// left out of it.
  pub num_frames: u32,
  /// Times to play the animation, 0 means "forever". This is kept as it's
  /// stored, so it can be over [`MAX_PLAYS`].
  pub num_plays: u32,
}
impl AnimationControl {
  /// ## Failure
  /// * Data that isn't 8 bytes, or a frame count that's 0 or over
  ///   [`MAX_FRAMES`], is `InvalidLength`.
  pub fn parse(data: &[u8]) -> SplashResult<Self> {
    let &[f0, f1, f2, f3, p0, p1, p2, p3] = data else {
      return Err(SplashError::InvalidLength);
    };
    let num_frames = u32::from_be_bytes([f0, f1, f2, f3]);
    let num_plays = u32::from_be_bytes([p0, p1, p2, p3]);
    if num_frames == 0 || num_frames > MAX_FRAMES {
      return Err(SplashError::InvalidLength);
    }
    Ok(Self { num_frames, num_plays })
  }
}
