use bootsplash::{SplashConfig, SplashError, SplashStats};

use super::{rand_bytes, run_splash};

fn splash_bmp(width: u16, height: u16, x: i16, y: i16, bpp: u16, data: &[u8]) -> Vec<u8> {
  let mut v = Vec::new();
  for n in [width, height] {
    v.extend_from_slice(&n.to_le_bytes());
  }
  for n in [x, y] {
    v.extend_from_slice(&n.to_le_bytes());
  }
  v.extend_from_slice(&bpp.to_le_bytes());
  v.extend_from_slice(data);
  v
}

/// A 2x2 image of 4 byte pixels, 1 through 4, with an alpha of 0.
fn two_by_two(x: i16, y: i16) -> Vec<u8> {
  let data: Vec<u8> = (1_u32..=4).flat_map(|n| n.to_le_bytes()).collect();
  splash_bmp(2, 2, x, y, 4, &data)
}

#[test]
fn test_placement() {
  let run = run_splash(&two_by_two(1, 0), 4, 3, 0, &SplashConfig::default());
  assert_eq!(run.result, Ok(SplashStats { frames: 1, plays: 1 }));
  #[rustfmt::skip]
  let expected = [
    0, 0xFF000001, 0xFF000002, 0,
    0, 0xFF000003, 0xFF000004, 0,
    0, 0, 0, 0,
  ];
  assert_eq!(run.pixels, expected);

  // measured from the right and bottom edges
  let run = run_splash(&two_by_two(-1, -1), 4, 4, 0, &SplashConfig::default());
  #[rustfmt::skip]
  let expected = [
    0, 0, 0, 0,
    0, 0xFF000001, 0xFF000002, 0,
    0, 0xFF000003, 0xFF000004, 0,
    0, 0, 0, 0,
  ];
  assert_eq!(run.pixels, expected);
}

#[test]
fn test_clipping() {
  let run = run_splash(&two_by_two(3, 2), 4, 3, 0, &SplashConfig::default());
  assert!(run.result.is_ok());
  assert_eq!(run.pixels[11], 0xFF000001);
  assert_eq!(run.pixels.iter().filter(|&&p| p != 0).count(), 1);

  // hanging off the top left
  let run = run_splash(&two_by_two(-3, -2), 4, 3, 0, &SplashConfig::default());
  assert_eq!(run.pixels[0], 0xFF000004);
  assert_eq!(run.pixels.iter().filter(|&&p| p != 0).count(), 1);

  let run = run_splash(&two_by_two(i16::MAX, i16::MIN), 4, 3, 0, &SplashConfig::default());
  assert!(run.result.is_ok());
  assert!(run.pixels.iter().all(|&p| p == 0));
}

#[test]
fn test_bgr_and_rgb565() {
  let bgr = splash_bmp(1, 1, 0, 0, 3, &[0x56, 0x34, 0x12]);
  assert_eq!(run_splash(&bgr, 1, 1, 0, &SplashConfig::default()).pixels, [0xFF123456]);

  let rgb565 = splash_bmp(1, 1, 0, 0, 2, &0xF800_u16.to_le_bytes());
  assert_eq!(run_splash(&rgb565, 1, 1, 0, &SplashConfig::default()).pixels, [0xFFFF0000]);
}

#[test]
fn test_short_and_bad_headers() {
  let short = splash_bmp(2, 2, 0, 0, 4, &[0; 12]);
  let run = run_splash(&short, 2, 2, 7, &SplashConfig::default());
  assert_eq!(run.result, Err(SplashError::UnexpectedEof));
  assert_eq!(run.pixels, [7; 4]);

  let wide = splash_bmp(20_000, 1, 0, 0, 4, &[]);
  let run = run_splash(&wide, 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Err(SplashError::InvalidLength));

  let odd = splash_bmp(1, 1, 0, 0, 8, &[0; 8]);
  let run = run_splash(&odd, 1, 1, 0, &SplashConfig::default());
  assert_eq!(run.result, Err(SplashError::UnsupportedFeature));
}

#[test]
fn test_random_bytes_never_panic() {
  for _ in 0..500 {
    let mut v = rand_bytes(64);
    if v[0] == 0x89 {
      v[0] = 0;
    }
    // keep the pixel count small so some of these actually decode
    v[1] = 0;
    v[3] = 0;
    let _ = run_splash(&v, 8, 8, 0, &SplashConfig::default());
  }
}
