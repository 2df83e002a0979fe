/// Where each Adam7 reduced image starts within an 8x8 tile, and how far
/// apart its pixels are: `(x_start, y_start, x_step, y_step)`.
///
/// ```txt
/// 1 6 4 6 2 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// 3 6 4 6 3 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// ```
const ADAM7: [(u32, u32, u32, u32); 7] = [
  (0, 0, 8, 8),
  (4, 0, 8, 8),
  (0, 4, 4, 8),
  (2, 0, 4, 4),
  (0, 2, 2, 4),
  (1, 0, 2, 2),
  (0, 1, 1, 2),
];

/// Gets the dimensions of the images stored in the image data.
///
/// * Interlaced data holds seven reduced images, and some of those can have
///   a width or height of 0 when the full image is small. Those are stored as
///   nothing at all.
/// * Non-interlaced data holds just the full image, at index 0, and the other
///   entries are all `(0, 0)`.
#[inline]
#[must_use]
pub const fn pass_dimensions(
  full_width: u32, full_height: u32, is_interlaced: bool,
) -> [(u32, u32); 7] {
  let mut out = [(0, 0); 7];
  if !is_interlaced {
    out[0] = (full_width, full_height);
    return out;
  }
  let mut i = 0;
  while i < 7 {
    let (x_start, y_start, x_step, y_step) = ADAM7[i];
    out[i] = (
      reduced_extent(full_width, x_start, x_step),
      reduced_extent(full_height, y_start, y_step),
    );
    i += 1;
  }
  out
}

#[inline]
const fn reduced_extent(full: u32, start: u32, step: u32) -> u32 {
  if full <= start {
    0
  } else {
    (full - start + step - 1) / step
  }
}

/// Converts a location within Adam7 reduced image `pass` (0 through 6) into
/// the full image location.
///
/// A `pass` out of range leaves the position as is.
#[inline]
#[must_use]
pub const fn interlaced_pos_to_full_pos(pass: usize, reduced_x: u32, reduced_y: u32) -> (u32, u32) {
  if pass >= ADAM7.len() {
    return (reduced_x, reduced_y);
  }
  let (x_start, y_start, x_step, y_step) = ADAM7[pass];
  (reduced_x * x_step + x_start, reduced_y * y_step + y_start)
}
