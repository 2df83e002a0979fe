use bootsplash::{
  png::{ChunkType, RawChunk, MAX_PLAYS, PNG_SIGNATURE},
  SplashConfig, SplashError, SplashStats,
};

use super::{rand_bytes, run_splash};

fn chunk(out: &mut Vec<u8>, chunk_ty: &[u8; 4], data: &[u8]) {
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(chunk_ty);
  out.extend_from_slice(data);
  let crc = RawChunk { chunk_ty: ChunkType(*chunk_ty), data, declared_crc: 0 }.compute_crc();
  out.extend_from_slice(&crc.to_be_bytes());
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&width.to_be_bytes());
  v.extend_from_slice(&height.to_be_bytes());
  v.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);
  v
}

fn actl(num_frames: u32, num_plays: u32) -> Vec<u8> {
  let mut v = num_frames.to_be_bytes().to_vec();
  v.extend_from_slice(&num_plays.to_be_bytes());
  v
}

struct Fctl {
  seq: u32,
  w: u32,
  h: u32,
  x: u32,
  y: u32,
  delay_num: u16,
  delay_den: u16,
  dispose: u8,
  blend: u8,
}
impl Fctl {
  fn full(seq: u32, w: u32, h: u32) -> Self {
    Self { seq, w, h, x: 0, y: 0, delay_num: 1, delay_den: 100, dispose: 0, blend: 0 }
  }
  fn bytes(&self) -> Vec<u8> {
    let mut v = Vec::new();
    for n in [self.seq, self.w, self.h, self.x, self.y] {
      v.extend_from_slice(&n.to_be_bytes());
    }
    v.extend_from_slice(&self.delay_num.to_be_bytes());
    v.extend_from_slice(&self.delay_den.to_be_bytes());
    v.push(self.dispose);
    v.push(self.blend);
    v
  }
}

fn fdat(seq: u32, zlib: &[u8]) -> Vec<u8> {
  let mut v = seq.to_be_bytes().to_vec();
  v.extend_from_slice(zlib);
  v
}

/// zlib data for 8-bit RGBA rows, each row given as `[r, g, b, a]` pixels and
/// stored with filter type 0.
fn rgba_rows(rows: &[&[[u8; 4]]]) -> Vec<u8> {
  let mut raw = Vec::new();
  for row in rows {
    raw.push(0);
    for px in row.iter() {
      raw.extend_from_slice(px);
    }
  }
  miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6)
}

fn start(width: u32, height: u32, color_type: u8) -> Vec<u8> {
  let mut png = PNG_SIGNATURE.to_vec();
  chunk(&mut png, b"IHDR", &ihdr(width, height, 8, color_type, 0));
  png
}

#[test]
fn test_stored_block_gray_pixel() {
  let mut png = start(1, 1, 0);
  // zlib header, then one final stored block holding the filter byte and
  // the sample, with no Adler-32 afterwards
  chunk(&mut png, b"IDAT", &[0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, 0x00, 0x7F]);
  chunk(&mut png, b"IEND", &[]);
  let run = run_splash(&png, 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 1, plays: 1 }));
  assert_eq!(run.pixels, [0xFF7F7F7F]);
  assert!(run.delays.is_empty());
}

#[test]
fn test_final_frame_is_never_disposed() {
  let mut png = start(2, 1, 6);
  chunk(&mut png, b"acTL", &actl(2, 1));
  chunk(&mut png, b"fcTL", &Fctl::full(0, 2, 1).bytes());
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[[0xFF, 0, 0, 0xFF], [0, 0xFF, 0, 0xFF]]]));
  let second = Fctl { x: 1, w: 1, dispose: 1, blend: 1, ..Fctl::full(1, 1, 1) };
  chunk(&mut png, b"fcTL", &second.bytes());
  chunk(&mut png, b"fdAT", &fdat(2, &rgba_rows(&[&[[0, 0, 0xFF, 0x80]]])));
  chunk(&mut png, b"IEND", &[]);

  let config = SplashConfig { background: 0x123456, ..SplashConfig::default() };
  let run = run_splash(&png, 2, 1, 0, &config);
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: 1 }));
  // half blue OVER green: g = 255 * 127 / 255, b = 255 * 128 / 255
  assert_eq!(run.pixels, [0xFFFF0000, 0xFF007F80]);
  assert_eq!(run.delays, [10_000, 10_000]);
}

#[test]
fn test_sequence_gap_stops_before_the_frame() {
  let mut png = start(1, 1, 6);
  chunk(&mut png, b"acTL", &actl(2, 1));
  chunk(&mut png, b"fcTL", &Fctl::full(0, 1, 1).bytes());
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[[1, 2, 3, 0xFF]]]));
  chunk(&mut png, b"fcTL", &Fctl::full(1, 1, 1).bytes());
  chunk(&mut png, b"fdAT", &fdat(3, &rgba_rows(&[&[[9, 9, 9, 0xFF]]])));
  chunk(&mut png, b"IEND", &[]);

  let run = run_splash(&png, 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Err(SplashError::SequenceMismatch));
  assert_eq!(run.pixels, [0xFF010203]);
}

#[test]
fn test_bad_first_frame_draws_nothing() {
  let mut png = start(1, 1, 6);
  chunk(&mut png, b"acTL", &actl(1, 1));
  chunk(&mut png, b"fcTL", &Fctl::full(0, 1, 1).bytes());
  // a row with an unknown filter type
  chunk(&mut png, b"IDAT", &miniz_oxide::deflate::compress_to_vec_zlib(&[7, 1, 2, 3, 4], 6));
  chunk(&mut png, b"IEND", &[]);

  let run = run_splash(&png, 1, 1, 0xDEADBEEF, &SplashConfig::default());
  assert_eq!(run.result, Err(SplashError::UnsupportedFeature));
  assert_eq!(run.pixels, [0xDEADBEEF]);
}

fn two_frame_loop(num_plays: u32) -> Vec<u8> {
  let mut png = start(1, 1, 6);
  chunk(&mut png, b"acTL", &actl(2, num_plays));
  let first = Fctl { delay_num: 3, delay_den: 1000, ..Fctl::full(0, 1, 1) };
  chunk(&mut png, b"fcTL", &first.bytes());
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[[1, 1, 1, 0xFF]]]));
  chunk(&mut png, b"fcTL", &Fctl { delay_num: 5, delay_den: 0, ..Fctl::full(1, 1, 1) }.bytes());
  chunk(&mut png, b"fdAT", &fdat(2, &rgba_rows(&[&[[2, 2, 2, 0xFF]]])));
  chunk(&mut png, b"IEND", &[]);
  png
}

#[test]
fn test_play_counts() {
  let run = run_splash(&two_frame_loop(3), 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: 3 }));
  assert_eq!(run.delays, [3_000, 50_000, 3_000, 50_000, 3_000, 50_000]);
  assert_eq!(run.pixels, [0xFF020202]);

  let config = SplashConfig { endless_play_count: 2, ..SplashConfig::default() };
  let run = run_splash(&two_frame_loop(0), 1, 1, 0, &config);
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: 2 }));
  assert_eq!(run.delays.len(), 4);

  let run = run_splash(&two_frame_loop(0), 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: 20 }));
  assert_eq!(run.delays.len(), 40);
}

#[test]
fn test_play_count_is_capped() {
  // signature, IHDR, then the acTL length and type and its frame count
  let plays_at = 8 + 25 + 8 + 4;
  let mut png = two_frame_loop(2);
  for b in &mut png[plays_at..plays_at + 4] {
    *b ^= 0xA5;
  }
  let run = run_splash(&png, 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: MAX_PLAYS }));
  assert_eq!(run.delays.len(), 2 * MAX_PLAYS as usize);

  let run = run_splash(&two_frame_loop(u32::MAX), 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: MAX_PLAYS }));

  let config = SplashConfig { endless_play_count: u32::MAX, ..SplashConfig::default() };
  let run = run_splash(&two_frame_loop(0), 1, 1, 0, &config);
  assert_eq!(run.result, Ok(SplashStats { frames: 2, plays: MAX_PLAYS }));
  assert_eq!(run.delays.len(), 2 * MAX_PLAYS as usize);
}

#[test]
fn test_dispose_previous_restores() {
  let a = [0x11, 0x11, 0x11, 0xFF];
  let mut png = start(2, 1, 6);
  chunk(&mut png, b"acTL", &actl(3, 1));
  chunk(&mut png, b"fcTL", &Fctl::full(0, 2, 1).bytes());
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[a, a]]));
  chunk(&mut png, b"fcTL", &Fctl { dispose: 2, ..Fctl::full(1, 1, 1) }.bytes());
  chunk(&mut png, b"fdAT", &fdat(2, &rgba_rows(&[&[[0x22, 0x22, 0x22, 0xFF]]])));
  chunk(&mut png, b"fcTL", &Fctl { x: 1, ..Fctl::full(3, 1, 1) }.bytes());
  chunk(&mut png, b"fdAT", &fdat(4, &rgba_rows(&[&[[0x33, 0x33, 0x33, 0xFF]]])));
  chunk(&mut png, b"IEND", &[]);

  let run = run_splash(&png, 2, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 3, plays: 1 }));
  assert_eq!(run.pixels, [0xFF111111, 0xFF333333]);
}

#[test]
fn test_first_frame_previous_acts_as_background() {
  let mut png = start(1, 1, 6);
  chunk(&mut png, b"acTL", &actl(2, 1));
  chunk(&mut png, b"fcTL", &Fctl { dispose: 2, ..Fctl::full(0, 1, 1) }.bytes());
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[[0x44, 0x44, 0x44, 0xFF]]]));
  // fully transparent OVER leaves whatever the disposal left
  chunk(&mut png, b"fcTL", &Fctl { blend: 1, ..Fctl::full(1, 1, 1) }.bytes());
  chunk(&mut png, b"fdAT", &fdat(2, &rgba_rows(&[&[[0, 0, 0, 0]]])));
  chunk(&mut png, b"IEND", &[]);

  let config = SplashConfig { background: 0x0000AA, ..SplashConfig::default() };
  let run = run_splash(&png, 1, 1, 0xFFFFFFFF, &config);
  assert_eq!(run.pixels, [0xFF0000AA]);
}

#[test]
fn test_placement_from_far_edges() {
  let mut png = start(1, 1, 6);
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[[5, 6, 7, 0xFF]]]));
  chunk(&mut png, b"IEND", &[]);

  let config = SplashConfig { x: -1, y: -1, ..SplashConfig::default() };
  let run = run_splash(&png, 3, 3, 0, &config);
  assert!(run.result.is_ok());
  assert_eq!(run.pixels, [0, 0, 0, 0, 0xFF050607, 0, 0, 0, 0]);

  let config = SplashConfig { x: 2, y: 0, ..SplashConfig::default() };
  let run = run_splash(&png, 3, 3, 0, &config);
  assert_eq!(run.pixels, [0, 0, 0xFF050607, 0, 0, 0, 0, 0, 0]);

  // entirely off the canvas is fine, nothing gets drawn
  let config = SplashConfig { x: 50, y: -50, ..SplashConfig::default() };
  let run = run_splash(&png, 3, 3, 0, &config);
  assert!(run.result.is_ok());
  assert_eq!(run.pixels, [0; 9]);
}

#[test]
fn test_bkgd_only_when_asked() {
  let mut png = start(1, 1, 6);
  chunk(&mut png, b"bKGD", &[0, 0x10, 0, 0x20, 0, 0x30]);
  chunk(&mut png, b"IDAT", &rgba_rows(&[&[[0xFF, 0xFF, 0xFF, 0]]]));
  chunk(&mut png, b"IEND", &[]);

  let config = SplashConfig { background: 0x010203, ..SplashConfig::default() };
  assert_eq!(run_splash(&png, 1, 1, 0, &config).pixels, [0xFF010203]);
  let config = SplashConfig { honor_bkgd: true, ..config };
  assert_eq!(run_splash(&png, 1, 1, 0, &config).pixels, [0xFF102030]);
}

#[test]
fn test_adam7_two_by_two() {
  let mut png = PNG_SIGNATURE.to_vec();
  chunk(&mut png, b"IHDR", &ihdr(2, 2, 8, 0, 1));
  // pass 1 holds (0,0), pass 6 holds (1,0), pass 7 holds the bottom row
  let raw = [0, 0x10, 0, 0x20, 0, 0x30, 0x40];
  chunk(&mut png, b"IDAT", &miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6));
  chunk(&mut png, b"IEND", &[]);

  let run = run_splash(&png, 2, 2, 0, &SplashConfig::default());
  assert!(run.result.is_ok());
  assert_eq!(run.pixels, [0xFF101010, 0xFF202020, 0xFF303030, 0xFF404040]);
}

#[test]
fn test_paletted_with_transparency() {
  let mut png = PNG_SIGNATURE.to_vec();
  chunk(&mut png, b"IHDR", &ihdr(4, 1, 2, 3, 0));
  chunk(&mut png, b"PLTE", &[0xFF, 0, 0, 0, 0xFF, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
  chunk(&mut png, b"tRNS", &[0xFF, 0xFF, 0xFF, 0]);
  // indexes 0, 1, 2, 3 packed into one byte
  chunk(&mut png, b"IDAT", &miniz_oxide::deflate::compress_to_vec_zlib(&[0, 0b00_01_10_11], 6));
  chunk(&mut png, b"IEND", &[]);

  let config = SplashConfig { background: 0x000000, ..SplashConfig::default() };
  let run = run_splash(&png, 4, 1, 0xFF777777, &config);
  assert!(run.result.is_ok());
  // index 3 is fully transparent, so SOURCE gives the background
  assert_eq!(run.pixels, [0xFFFF0000, 0xFF00FF00, 0xFF0000FF, 0xFF000000]);
}

#[test]
fn test_hostile_input_never_panics() {
  let mut png = two_frame_loop(2);
  png.extend_from_slice(&[0; 4]);
  for len in 0..png.len() {
    let _ = run_splash(&png[..len], 2, 2, 0, &SplashConfig::default());
  }
  for i in 8..png.len() {
    let mut bent = png.clone();
    bent[i] ^= 0xA5;
    let _ = run_splash(&bent, 2, 2, 0, &SplashConfig::default());
  }
  for _ in 0..200 {
    let mut v = PNG_SIGNATURE.to_vec();
    v.extend_from_slice(&rand_bytes(256));
    let _ = run_splash(&v, 4, 4, 0, &SplashConfig::default());

    let mut v = rand_bytes(512);
    v[0] = 0x89;
    let _ = run_splash(&v, 4, 4, 0, &SplashConfig::default());
  }
  // random data behind a real header and a random IDAT
  for _ in 0..200 {
    let mut v = start(8, 8, 6);
    let mut idat = vec![0x78, 0x01];
    idat.extend_from_slice(&rand_bytes(300));
    chunk(&mut v, b"IDAT", &idat);
    let _ = run_splash(&v, 8, 8, 0, &SplashConfig::default());
  }
}
