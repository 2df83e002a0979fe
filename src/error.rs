use core::num::TryFromIntError;

/// An error from the `bootsplash` crate.
///
/// Every stage of the pipeline reports failure with one of these, and the
/// splash orchestrator passes the first one back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashError {
  /// A read went past the end of the source buffer.
  UnexpectedEof,

  /// A length, count, or back-reference broke one of the format's size rules.
  ///
  /// This covers chunk lengths, palette and frame counts, frame geometry,
  /// code length runs, and LZ77 copies that reach before the start of the
  /// produced output.
  InvalidLength,

  /// An APNG sequence number didn't follow the previous one.
  SequenceMismatch,

  /// The allocator couldn't give us enough space.
  AllocationFailure,

  /// The data uses a colour type, bit depth, filter, block type, or Huffman
  /// code that this decoder can't handle.
  UnsupportedFeature,
}

/// Shorthand for results in this crate.
pub type SplashResult<T> = Result<T, SplashError>;

impl core::fmt::Display for SplashError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(match self {
      Self::UnexpectedEof => "unexpected end of input",
      Self::InvalidLength => "invalid length or count",
      Self::SequenceMismatch => "animation sequence number mismatch",
      Self::AllocationFailure => "allocation failure",
      Self::UnsupportedFeature => "unsupported feature",
    })
  }
}

impl From<alloc::collections::TryReserveError> for SplashError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::AllocationFailure
  }
}
impl From<TryFromIntError> for SplashError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::InvalidLength
  }
}
