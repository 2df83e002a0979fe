use super::*;

/// Frame Control: the geometry, timing, and compositing of one APNG frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameControl {
  pub sequence_number: u32,
  pub width: u32,
  pub height: u32,
  pub x_offset: u32,
  pub y_offset: u32,
  pub delay_num: u16,
  pub delay_den: u16,
  pub dispose_op: DisposeOp,
  pub blend_op: BlendOp,
}
impl FrameControl {
  /// Parses the 26 data bytes of an `fcTL` chunk.
  ///
  /// ## Failure
  /// * Data that isn't 26 bytes is `InvalidLength`.
  /// * An unknown dispose or blend op is `UnsupportedFeature`.
  pub fn parse(data: &[u8]) -> SplashResult<Self> {
    if data.len() != 26 {
      return Err(SplashError::InvalidLength);
    }
    let mut bits = BitSource::new(data);
    Ok(Self {
      sequence_number: bits.read_u32be()?,
      width: bits.read_u32be()?,
      height: bits.read_u32be()?,
      x_offset: bits.read_u32be()?,
      y_offset: bits.read_u32be()?,
      delay_num: bits.read_u16be()?,
      delay_den: bits.read_u16be()?,
      dispose_op: DisposeOp::try_from(bits.read_u8()?)?,
      blend_op: BlendOp::try_from(bits.read_u8()?)?,
    })
  }

  /// Checks the frame's rectangle against the image.
  ///
  /// ## Failure
  /// * A zero width or height, or a rectangle reaching outside the image, is
  ///   `InvalidLength`.
  /// * The first frame must exactly cover the image, or it's `InvalidLength`.
  pub fn validate(&self, header: &ImageHeader, is_first: bool) -> SplashResult<()> {
    let right = u64::from(self.x_offset) + u64::from(self.width);
    let bottom = u64::from(self.y_offset) + u64::from(self.height);
    if self.width == 0
      || self.height == 0
      || right > u64::from(header.width)
      || bottom > u64::from(header.height)
    {
      return Err(SplashError::InvalidLength);
    }
    if is_first
      && (self.x_offset != 0
        || self.y_offset != 0
        || self.width != header.width
        || self.height != header.height)
    {
      return Err(SplashError::InvalidLength);
    }
    Ok(())
  }

  /// The frame's delay in microseconds.
  ///
  /// A denominator of 0 means hundredths of a second.
  #[inline]
  #[must_use]
  pub const fn delay_us(&self) -> u64 {
    if self.delay_den == 0 {
      10_000 * self.delay_num as u64
    } else {
      1_000_000 * self.delay_num as u64 / self.delay_den as u64
    }
  }
}
