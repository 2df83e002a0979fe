use super::*;

/// Walks the chunks of a PNG or APNG, handing out one decoded frame at a time.
///
/// [`PngDecoder::new`] reads everything up to the first image data, so the
/// header, palette, and animation control are known before any frame is
/// decoded. After that, each call to [`next_frame`](PngDecoder::next_frame)
/// gathers the next frame's compressed data, which is complete once the
/// following `fcTL` (or `IEND`) shows up, and decodes it.
///
/// * A PNG without `acTL` gives exactly one frame, the `IDAT` image.
/// * An APNG whose first `fcTL` comes after the `IDAT` chunks has a default
///   image that isn't part of the animation, and it's skipped.
/// * `fcTL` and `fdAT` sequence numbers must count up from 0 with no gaps.
pub struct PngDecoder<'b> {
  bits: BitSource<'b>,
  header: ImageHeader,
  palette: Option<Palette>,
  animation: Option<AnimationControl>,
  next_sequence: u32,
  pending: Option<FrameControl>,
  data: Vec<u8>,
  frames_decoded: u32,
  finished: bool,
}
impl Debug for PngDecoder<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngDecoder")
      .field("header", &self.header)
      .field("animation", &self.animation)
      .field("next_sequence", &self.next_sequence)
      .field("frames_decoded", &self.frames_decoded)
      .field("finished", &self.finished)
      .finish()
  }
}

impl<'b> PngDecoder<'b> {
  /// Checks the signature and reads the chunks before the image data.
  ///
  /// ## Failure
  /// * A bad signature, or a first chunk that isn't `IHDR`, is
  ///   `UnsupportedFeature`.
  /// * Any error from parsing the header, palette, transparency, background,
  ///   gamma, or animation control chunks.
  pub fn new(bytes: &'b [u8]) -> SplashResult<Self> {
    let mut bits = BitSource::new(bytes);
    if bits.read_array::<8>()? != PNG_SIGNATURE {
      return Err(SplashError::UnsupportedFeature);
    }
    let first = RawChunk::read(&mut bits)?;
    if first.chunk_ty != ChunkType::IHDR {
      return Err(SplashError::UnsupportedFeature);
    }
    let header = ImageHeader::parse(first.data)?;
    log::debug!(
      "png: {}x{} {:?} depth {} interlaced {}",
      header.width,
      header.height,
      header.color_type,
      header.bit_depth,
      header.is_interlaced
    );
    let mut decoder = Self {
      bits,
      header,
      palette: None,
      animation: None,
      next_sequence: 0,
      pending: None,
      data: Vec::new(),
      frames_decoded: 0,
      finished: false,
    };
    while !decoder.bits.is_empty() {
      let mut peek = decoder.bits.clone();
      let chunk = RawChunk::read(&mut peek)?;
      if matches!(
        chunk.chunk_ty,
        ChunkType::IDAT | ChunkType::fcTL | ChunkType::fdAT | ChunkType::IEND
      ) {
        break;
      }
      decoder.bits = peek;
      decoder.read_image_info(chunk)?;
    }
    if decoder.header.color_type == ColorType::Index && decoder.palette.is_none() {
      return Err(SplashError::InvalidLength);
    }
    Ok(decoder)
  }

  #[inline]
  #[must_use]
  pub fn header(&self) -> &ImageHeader {
    &self.header
  }

  #[inline]
  #[must_use]
  pub fn palette(&self) -> Option<&Palette> {
    self.palette.as_ref()
  }

  /// The `acTL` data, `None` for a still image.
  #[inline]
  #[must_use]
  pub fn animation(&self) -> Option<AnimationControl> {
    self.animation
  }

  #[inline]
  #[must_use]
  pub fn frames_decoded(&self) -> u32 {
    self.frames_decoded
  }

  fn read_image_info(&mut self, chunk: RawChunk<'_>) -> SplashResult<()> {
    log::debug!("png: chunk {:?} len {}", chunk.chunk_ty, chunk.data.len());
    match chunk.chunk_ty {
      ChunkType::PLTE => self.palette = Some(Palette::parse(chunk.data)?),
      ChunkType::tRNS => apply_transparency(chunk.data, &mut self.header, self.palette.as_mut())?,
      ChunkType::bKGD => {
        let background = Background::parse(chunk.data, self.header.color_type)?;
        let argb = background.to_argb(self.header.bit_depth, self.palette.as_ref())?;
        self.header.background = Some(argb);
      }
      ChunkType::gAMA => {
        let &[g0, g1, g2, g3] = chunk.data else {
          return Err(SplashError::InvalidLength);
        };
        self.header.gamma = Some(u32::from_be_bytes([g0, g1, g2, g3]));
      }
      ChunkType::acTL => self.animation = Some(AnimationControl::parse(chunk.data)?),
      _ => (),
    }
    Ok(())
  }

  /// Decodes the next frame, or gives `None` once there are no more.
  ///
  /// ## Failure
  /// * A sequence number out of order is `SequenceMismatch`.
  /// * More frames than `acTL` declared is `InvalidLength`.
  /// * Any failure of chunk reading, `fcTL` parsing and validation, or
  ///   [`decode_image_data`].
  pub fn next_frame(&mut self) -> SplashResult<Option<Frame>> {
    if self.finished {
      return Ok(None);
    }
    loop {
      if self.bits.is_empty() {
        // no IEND, but the data we have might still be a whole frame
        return self.finish();
      }
      let mut peek = self.bits.clone();
      let chunk = RawChunk::read(&mut peek)?;
      log::trace!("png: chunk {:?} len {}", chunk.chunk_ty, chunk.data.len());
      match chunk.chunk_ty {
        ChunkType::fcTL if self.animation.is_some() => {
          if self.pending.is_some() {
            // this fcTL gets read again on the next call
            return self.decode_pending().map(Some);
          }
          self.bits = peek;
          let fc = FrameControl::parse(chunk.data)?;
          self.check_sequence(fc.sequence_number)?;
          fc.validate(&self.header, self.frames_decoded == 0)?;
          self.pending = Some(fc);
        }
        ChunkType::IDAT => {
          self.bits = peek;
          if self.frames_decoded > 0 {
            log::debug!("png: IDAT after the first frame skipped");
            continue;
          }
          match (self.animation, self.pending) {
            (None, None) => self.pending = Some(self.still_image_control()),
            (Some(_), None) => {
              log::debug!("png: default image is not part of the animation");
              continue;
            }
            _ => (),
          }
          self.append(chunk.data)?;
        }
        ChunkType::fdAT if self.animation.is_some() => {
          self.bits = peek;
          let [s0, s1, s2, s3, frame_data @ ..] = chunk.data else {
            return Err(SplashError::InvalidLength);
          };
          self.check_sequence(u32::from_be_bytes([*s0, *s1, *s2, *s3]))?;
          if self.pending.is_some() {
            self.append(frame_data)?;
          } else {
            log::debug!("png: fdAT without an fcTL skipped");
          }
        }
        ChunkType::IEND => {
          self.bits = peek;
          return self.finish();
        }
        _ => self.bits = peek,
      }
    }
  }

  fn still_image_control(&self) -> FrameControl {
    FrameControl {
      sequence_number: 0,
      width: self.header.width,
      height: self.header.height,
      x_offset: 0,
      y_offset: 0,
      delay_num: 0,
      delay_den: 0,
      dispose_op: DisposeOp::None,
      blend_op: BlendOp::Source,
    }
  }

  fn check_sequence(&mut self, sequence_number: u32) -> SplashResult<()> {
    if sequence_number != self.next_sequence {
      log::debug!("png: sequence number {sequence_number}, expected {}", self.next_sequence);
      return Err(SplashError::SequenceMismatch);
    }
    self.next_sequence = self.next_sequence.wrapping_add(1);
    Ok(())
  }

  fn append(&mut self, data: &[u8]) -> SplashResult<()> {
    self.data.try_reserve(data.len())?;
    self.data.extend_from_slice(data);
    Ok(())
  }

  fn finish(&mut self) -> SplashResult<Option<Frame>> {
    self.finished = true;
    let frame = if self.pending.is_some() { Some(self.decode_pending()?) } else { None };
    if let Some(animation) = self.animation {
      if self.frames_decoded < animation.num_frames {
        log::warn!(
          "png: acTL declared {} frames, only {} present",
          animation.num_frames,
          self.frames_decoded
        );
      }
    }
    Ok(frame)
  }

  fn decode_pending(&mut self) -> SplashResult<Frame> {
    let fc = self.pending.take().ok_or(SplashError::InvalidLength)?;
    if let Some(animation) = self.animation {
      if self.frames_decoded >= animation.num_frames {
        return Err(SplashError::InvalidLength);
      }
    }
    let data = core::mem::take(&mut self.data);
    let pixels =
      decode_image_data(&self.header, self.palette.as_ref(), fc.width, fc.height, &data)?;
    self.frames_decoded += 1;
    log::debug!(
      "png: frame {} {}x{} at {},{} delay {}us {:?} {:?}",
      self.frames_decoded - 1,
      fc.width,
      fc.height,
      fc.x_offset,
      fc.y_offset,
      fc.delay_us(),
      fc.dispose_op,
      fc.blend_op
    );
    Ok(Frame {
      width: fc.width,
      height: fc.height,
      x_offset: fc.x_offset,
      y_offset: fc.y_offset,
      delay_us: fc.delay_us(),
      dispose_op: fc.dispose_op,
      blend_op: fc.blend_op,
      pixels,
    })
  }
}
