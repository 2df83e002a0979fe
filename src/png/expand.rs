use super::*;

use bitfrob::u8_replicate_bits;

/// Reads sample `x` of a scanline where every sample is `bit_depth` bits.
///
/// Sub-byte samples are packed most significant bits first, 16-bit samples
/// are big-endian.
#[inline]
fn sample_at(line: &[u8], bit_depth: u8, x: usize) -> SplashResult<u16> {
  match bit_depth {
    1 | 2 | 4 => {
      let depth = usize::from(bit_depth);
      let bit = x * depth;
      let byte = *line.get(bit / 8).ok_or(SplashError::UnexpectedEof)?;
      let down_shift = 8 - depth - (bit % 8);
      let mask = (1_u8 << depth) - 1;
      Ok(u16::from((byte >> down_shift) & mask))
    }
    8 => line.get(x).copied().map(u16::from).ok_or(SplashError::UnexpectedEof),
    16 => match line.get(x * 2..x * 2 + 2) {
      Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
      _ => Err(SplashError::UnexpectedEof),
    },
    _ => Err(SplashError::UnsupportedFeature),
  }
}

/// Reduces a sample to 8 bits.
///
/// Sub-byte samples have their bits repeated to fill the byte, 16-bit samples
/// keep only their high byte.
#[inline]
#[must_use]
pub fn sample_to_u8(sample: u16, bit_depth: u8) -> u8 {
  match bit_depth {
    16 => (sample >> 8) as u8,
    8 => sample as u8,
    _ => u8_replicate_bits(u32::from(bit_depth), sample as u8),
  }
}

/// Expands one unfiltered scanline of `width` pixels, passing each pixel to
/// `op` as `(x, rgba)`.
///
/// * Images without an alpha channel are opaque, except that a pixel matching
///   the header's transparency key gets alpha 0.
/// * Indexed pixels look up their color (and alpha, if `tRNS` gave any) in
///   the palette.
///
/// ## Failure
/// * An indexed image with no palette, or an index past the end of the
///   palette, is `InvalidLength`.
/// * A line too short for `width` pixels is `UnexpectedEof`.
pub fn expand_scanline<F>(
  header: &ImageHeader, palette: Option<&Palette>, line: &[u8], width: u32, mut op: F,
) -> SplashResult<()>
where
  F: FnMut(u32, r8g8b8a8_Srgb),
{
  let depth = header.bit_depth;
  let channels = header.color_type.channel_count();
  if line.len() < header.bytes_per_line(width) {
    return Err(SplashError::UnexpectedEof);
  }
  let opaque_unless = |matches_key: bool| if matches_key { 0 } else { 0xFF };
  for x in 0..width {
    let xu = x as usize;
    let rgba = match header.color_type {
      ColorType::Index => {
        let palette = palette.ok_or(SplashError::InvalidLength)?;
        palette.get(sample_at(line, depth, xu)?)?
      }
      ColorType::Y => {
        let s = sample_at(line, depth, xu)?;
        let y = sample_to_u8(s, depth);
        let a = opaque_unless(header.transparency_key == Some(TransparencyKey::Y(s)));
        r8g8b8a8_Srgb { r: y, g: y, b: y, a }
      }
      ColorType::RGB => {
        let base = xu * channels;
        let full = [
          sample_at(line, depth, base)?,
          sample_at(line, depth, base + 1)?,
          sample_at(line, depth, base + 2)?,
        ];
        let [r, g, b] = full.map(|s| sample_to_u8(s, depth));
        let a = opaque_unless(header.transparency_key == Some(TransparencyKey::RGB(full)));
        r8g8b8a8_Srgb { r, g, b, a }
      }
      ColorType::YA => {
        let base = xu * channels;
        let y = sample_to_u8(sample_at(line, depth, base)?, depth);
        let a = sample_to_u8(sample_at(line, depth, base + 1)?, depth);
        r8g8b8a8_Srgb { r: y, g: y, b: y, a }
      }
      ColorType::RGBA => {
        let base = xu * channels;
        let mut rgba = [0_u8; 4];
        for (i, c) in rgba.iter_mut().enumerate() {
          *c = sample_to_u8(sample_at(line, depth, base + i)?, depth);
        }
        let [r, g, b, a] = rgba;
        r8g8b8a8_Srgb { r, g, b, a }
      }
    };
    op(x, rgba);
  }
  Ok(())
}
