use super::*;

/// Applies a `tRNS` chunk's data.
///
/// The data's shape depends on the color type:
/// * greyscale: one `u16` key sample, stored on the header.
/// * RGB: three `u16` key samples, stored on the header.
/// * indexed: one alpha byte per palette entry (there can be fewer alphas than
///   entries), merged into the palette.
///
/// Color types with an alpha channel can't use `tRNS`, the chunk is ignored
/// for them.
///
/// ## Failure
/// * Data of the wrong size for the color type is `InvalidLength`.
/// * An indexed image's `tRNS` without a palette before it, or with more
///   alphas than palette entries, is `InvalidLength`.
pub fn apply_transparency(
  data: &[u8], header: &mut ImageHeader, palette: Option<&mut Palette>,
) -> SplashResult<()> {
  match header.color_type {
    ColorType::Y => match data {
      [y0, y1] => {
        header.transparency_key = Some(TransparencyKey::Y(u16::from_be_bytes([*y0, *y1])));
      }
      _ => return Err(SplashError::InvalidLength),
    },
    ColorType::RGB => match data {
      [r0, r1, g0, g1, b0, b1] => {
        header.transparency_key = Some(TransparencyKey::RGB([
          u16::from_be_bytes([*r0, *r1]),
          u16::from_be_bytes([*g0, *g1]),
          u16::from_be_bytes([*b0, *b1]),
        ]))
      }
      _ => return Err(SplashError::InvalidLength),
    },
    ColorType::Index => palette.ok_or(SplashError::InvalidLength)?.apply_alphas(data)?,
    ColorType::YA | ColorType::RGBA => {
      log::debug!("png: tRNS ignored for color type {:?}", header.color_type);
    }
  }
  Ok(())
}
