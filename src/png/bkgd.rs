use super::*;

/// Background color.
///
/// RGB and Greyscale colors are always given as `u16` values at the image's
/// bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Background {
  Y { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { i: u8 },
}
impl Background {
  /// Parses `bKGD` data, which must have the shape the color type calls for.
  ///
  /// ## Failure
  /// * Data of the wrong size for the color type is `InvalidLength`.
  pub fn parse(data: &[u8], color_type: ColorType) -> SplashResult<Self> {
    Ok(match (color_type, data) {
      (ColorType::Y | ColorType::YA, [y0, y1]) => {
        Background::Y { y: u16::from_be_bytes([*y0, *y1]) }
      }
      (ColorType::RGB | ColorType::RGBA, [r0, r1, g0, g1, b0, b1]) => Background::RGB {
        r: u16::from_be_bytes([*r0, *r1]),
        g: u16::from_be_bytes([*g0, *g1]),
        b: u16::from_be_bytes([*b0, *b1]),
      },
      (ColorType::Index, [i]) => Background::Index { i: *i },
      _ => return Err(SplashError::InvalidLength),
    })
  }

  /// Resolves the color to opaque ARGB.
  ///
  /// ## Failure
  /// * A palette index with no palette, or past the end of the palette, is
  ///   `InvalidLength`.
  pub fn to_argb(self, bit_depth: u8, palette: Option<&Palette>) -> SplashResult<u32> {
    let rgba = match self {
      Background::Y { y } => {
        let y = sample_to_u8(y, bit_depth);
        r8g8b8a8_Srgb { r: y, g: y, b: y, a: 0xFF }
      }
      Background::RGB { r, g, b } => r8g8b8a8_Srgb {
        r: sample_to_u8(r, bit_depth),
        g: sample_to_u8(g, bit_depth),
        b: sample_to_u8(b, bit_depth),
        a: 0xFF,
      },
      Background::Index { i } => {
        let entry = palette.ok_or(SplashError::InvalidLength)?.get(u16::from(i))?;
        r8g8b8a8_Srgb { a: 0xFF, ..entry }
      }
    };
    Ok(argb_from_rgba(rgba))
  }
}
