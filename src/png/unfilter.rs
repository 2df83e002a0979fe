use super::*;

const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // the order of these tests is part of the format
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Unfilters a run of filterlines in place.
///
/// Each filterline is `filterline` bytes long: the filter type byte followed
/// by one scanline. The filter bytes are reset to 0 ("None") as each line is
/// done, so running this twice over the same data is harmless.
///
/// * `bpp` is the bytes per complete pixel, rounded up to 1.
/// * Bytes past the last complete filterline are left alone.
///
/// ## Failure
/// * A filter type above 4 is `UnsupportedFeature`.
pub fn unfilter_lines(data: &mut [u8], filterline: usize, bpp: usize) -> SplashResult<()> {
  if filterline < 2 {
    return Ok(());
  }
  let mut prev: Option<&[u8]> = None;
  for line in data.chunks_exact_mut(filterline) {
    let (f, pixels) = line.split_at_mut(1);
    unfilter_line(f[0], pixels, prev, bpp)?;
    f[0] = 0;
    prev = Some(pixels);
  }
  Ok(())
}

/// Reverses one scanline's filter.
///
/// `prev` is the already unfiltered line above, `None` for the first line of
/// an image. It must be the same length as `line` when given.
pub fn unfilter_line(
  filter: u8, line: &mut [u8], prev: Option<&[u8]>, bpp: usize,
) -> SplashResult<()> {
  let bpp = bpp.max(1);
  match filter {
    0 => (),
    1 => {
      // Sub
      for x in bpp..line.len() {
        line[x] = line[x].wrapping_add(line[x - bpp]);
      }
    }
    2 => {
      // Up
      if let Some(prev) = prev {
        line.iter_mut().zip(prev.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
      }
    }
    3 => {
      // Average
      for x in 0..line.len() {
        let a = if x >= bpp { u16::from(line[x - bpp]) } else { 0 };
        let b = prev.and_then(|prev| prev.get(x)).copied().map_or(0, u16::from);
        line[x] = line[x].wrapping_add(((a + b) / 2) as u8);
      }
    }
    4 => {
      // Paeth
      for x in 0..line.len() {
        let a = if x >= bpp { line[x - bpp] } else { 0 };
        let b = prev.and_then(|prev| prev.get(x)).copied().unwrap_or(0);
        let c = if x >= bpp {
          prev.and_then(|prev| prev.get(x - bpp)).copied().unwrap_or(0)
        } else {
          0
        };
        line[x] = line[x].wrapping_add(paeth_predict(a, b, c));
      }
    }
    _ => return Err(SplashError::UnsupportedFeature),
  }
  Ok(())
}
