//! Image encoding for Fotofix.
//!
//! PNG is the engine's only output format: it carries the alpha channel that
//! transparency masking produces, and it is what the rendering layer uploads
//! as a texture and what `save` writes to disk.
//!
//! # Examples
//!
//! ```ignore
//! use fotofix_core::encode::encode_png;
//!
//! let png = encode_png(document.working()).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod png;

pub use png::{encode_png, encode_rgba_png, EncodeError};
