use super::*;

/// One symbol's canonical code: the low `bit_count` bits of `bit_pattern`,
/// read most significant bit first.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TreeEntry {
  pub(crate) bit_pattern: u16,
  pub(crate) bit_count: u16,
}
impl core::fmt::Debug for TreeEntry {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match usize::from(self.bit_count) {
      0 => f.write_str("TreeEntry(-)"),
      n => write!(f, "TreeEntry({:0n$b})", self.bit_pattern),
    }
  }
}

/// Longest code length DEFLATE allows.
pub(crate) const MAX_CODE_BITS: usize = 15;

impl TreeEntry {
  /// Sets every entry's `bit_pattern` from the `bit_count`s, the canonical
  /// way (RFC 1951, 3.2.2): shorter codes sort first, and codes of the same
  /// length count up in symbol order.
  ///
  /// Entries with a `bit_count` of 0 get no code.
  ///
  /// ## Failure
  /// * A length over [`MAX_CODE_BITS`], or more codes of some length than
  ///   that length has room for, is `UnsupportedFeature`.
  pub(crate) fn assign_codes(entries: &mut [TreeEntry]) -> SplashResult<()> {
    let mut per_length = [0_u32; MAX_CODE_BITS + 1];
    for te in entries.iter() {
      let slot =
        per_length.get_mut(usize::from(te.bit_count)).ok_or(SplashError::UnsupportedFeature)?;
      *slot += 1;
    }
    per_length[0] = 0;

    let mut first_code = [0_u32; MAX_CODE_BITS + 1];
    let mut code = 0_u32;
    for len in 1..=MAX_CODE_BITS {
      code = (code + per_length[len - 1]) << 1;
      first_code[len] = code;
    }

    for te in entries.iter_mut().filter(|te| te.bit_count != 0) {
      let len = usize::from(te.bit_count);
      let next = first_code[len];
      if next >> len != 0 {
        return Err(SplashError::UnsupportedFeature);
      }
      te.bit_pattern = next as u16;
      first_code[len] = next + 1;
    }
    Ok(())
  }
}
