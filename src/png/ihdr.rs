use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl ColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// If `bit_depth` is allowed with this color type.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for ColorType {
  type Error = SplashError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => ColorType::Y,
      2 => ColorType::RGB,
      3 => ColorType::Index,
      4 => ColorType::YA,
      6 => ColorType::RGBA,
      _ => return Err(SplashError::UnsupportedFeature),
    })
  }
}

/// A `tRNS` key color for images without an alpha channel.
///
/// Samples are kept at the image's own bit depth, and a pixel whose raw
/// samples equal the key is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransparencyKey {
  Y(u16),
  RGB([u16; 3]),
}

/// Image Header, plus the ancillary chunks that apply to the whole image.
///
/// The bits per pixel, bytes per pixel, and bytes per line are all computed
/// from `bit_depth` and `color_type` on demand, so they can't disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: ColorType,
  pub compression_method: u8,
  pub filter_method: u8,
  /// if the image data is stored interlaced (Adam7).
  pub is_interlaced: bool,
  /// The `bKGD` color as ARGB, if there was one.
  pub background: Option<u32>,
  /// The `tRNS` key for greyscale and RGB images.
  pub transparency_key: Option<TransparencyKey>,
  /// The `gAMA` value, gamma times 100_000. Recorded, never applied.
  pub gamma: Option<u32>,
}
impl ImageHeader {
  /// Parses the 13 data bytes of an `IHDR` chunk.
  ///
  /// ## Failure
  /// * Data that isn't 13 bytes, a zero dimension, or a dimension over
  ///   [`MAX_DIMENSION`] is `InvalidLength`.
  /// * An unknown color type, a bit depth the color type doesn't allow, or a
  ///   compression/filter/interlace method other than the standard ones is
  ///   `UnsupportedFeature`.
  pub fn parse(data: &[u8]) -> SplashResult<Self> {
    let &[w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression, filter, interlace] =
      data
    else {
      return Err(SplashError::InvalidLength);
    };
    let width = u32::from_be_bytes([w0, w1, w2, w3]);
    let height = u32::from_be_bytes([h0, h1, h2, h3]);
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
      return Err(SplashError::InvalidLength);
    }
    let color_type = ColorType::try_from(color_type)?;
    if !color_type.allows_bit_depth(bit_depth) || compression != 0 || filter != 0 {
      return Err(SplashError::UnsupportedFeature);
    }
    let is_interlaced = match interlace {
      0 => false,
      1 => true,
      _ => return Err(SplashError::UnsupportedFeature),
    };
    Ok(Self {
      width,
      height,
      bit_depth,
      color_type,
      compression_method: compression,
      filter_method: filter,
      is_interlaced,
      background: None,
      transparency_key: None,
      gamma: None,
    })
  }

  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Bytes per complete pixel, rounded up to 1 for sub-byte pixels.
  ///
  /// This is the distance the scanline filters look back.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes of pixel data in one scanline of `width` pixels, not counting the
  /// filter type byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_line(&self, width: u32) -> usize {
    // sub-byte pixels can leave a partial byte at the end of the line
    (self.bits_per_pixel() * (width as usize) + 7) / 8
  }
}
