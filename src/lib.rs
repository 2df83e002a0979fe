#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]

//! A crate for putting a splash image on a framebuffer early in boot.
//!
//! The image is a PNG, an animated PNG (APNG), or a raw splash bitmap baked
//! into the binary. Everything runs on the calling thread and only needs an
//! allocator:
//!
//! * [`inflate`] undoes the DEFLATE compression PNG uses.
//! * [`png`] walks the chunks and turns image data into ARGB8888 frames.
//! * [`bmp`] reads the raw splash bitmap layout.
//! * [`Compositor`] blends frames onto a [`Canvas`] and disposes of them.
//! * [`show_splash`] ties it all together, with inter-frame delays going
//!   through [`embedded_hal::delay::DelayNs`].
//!
//! Diagnostics go out through the [`log`] facade, it's up to the host to
//! install a logger.

extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

/// Largest width or height an image or frame can have.
pub const MAX_DIMENSION: u32 = 16_384;

mod error;
pub use error::*;

pub mod bit_source;

pub mod inflate;

#[cfg(feature = "png")]
#[cfg_attr(docs_rs, doc(cfg(feature = "png")))]
pub mod png;

#[cfg(feature = "bmp")]
#[cfg_attr(docs_rs, doc(cfg(feature = "bmp")))]
pub mod bmp;

mod canvas;
pub use canvas::*;

mod compose;
pub use compose::*;

mod splash;
pub use splash::*;
