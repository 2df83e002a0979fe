use super::*;

/// Most entries a palette may have.
pub const MAX_PALETTE: usize = 256;

/// Palette data
///
/// Palette entries are stored RGB in the `PLTE` chunk, and a `tRNS` chunk can
/// give alpha values to some of them afterwards. Entries without a `tRNS`
/// alpha are opaque.
#[derive(Clone)]
pub struct Palette {
  entries: Vec<r8g8b8a8_Srgb>,
}
impl Debug for Palette {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("Palette")
      .field(&&self.entries[..self.entries.len().min(4)])
      .field(&self.entries.len())
      .finish()
  }
}
impl Palette {
  /// Parses the data of a `PLTE` chunk.
  ///
  /// ## Failure
  /// * Data that's empty, not a multiple of 3 bytes, or more than
  ///   [`MAX_PALETTE`] entries is `InvalidLength`.
  pub fn parse(data: &[u8]) -> SplashResult<Self> {
    if data.is_empty() || data.len() % 3 != 0 || data.len() / 3 > MAX_PALETTE {
      return Err(SplashError::InvalidLength);
    }
    let mut entries = Vec::new();
    entries.try_reserve(data.len() / 3)?;
    entries.extend(
      data.chunks_exact(3).map(|c| r8g8b8a8_Srgb { r: c[0], g: c[1], b: c[2], a: 0xFF }),
    );
    Ok(Self { entries })
  }

  /// Sets the alpha of the first `alphas.len()` entries.
  ///
  /// ## Failure
  /// * More alphas than entries is `InvalidLength`.
  pub fn apply_alphas(&mut self, alphas: &[u8]) -> SplashResult<()> {
    if alphas.len() > self.entries.len() {
      return Err(SplashError::InvalidLength);
    }
    self.entries.iter_mut().zip(alphas.iter().copied()).for_each(|(e, a)| e.a = a);
    Ok(())
  }

  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[r8g8b8a8_Srgb] {
    &self.entries
  }

  /// Looks up one entry.
  ///
  /// ## Failure
  /// * An index past the end is `InvalidLength`.
  #[inline]
  pub fn get(&self, index: u16) -> SplashResult<r8g8b8a8_Srgb> {
    self.entries.get(usize::from(index)).copied().ok_or(SplashError::InvalidLength)
  }
}
