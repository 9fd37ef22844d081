//! tessera-export: Pure format serializers (sans-IO).
//!
//! Converts finished mosaic buffers into output containers. Currently
//! supports PNG with embedded physical-resolution (pHYs) metadata.

pub mod png;

pub use png::{EncodeError, dots_per_inch, pixels_per_meter, to_png};
