//! Converter module for re-encoding camera images.
//!
//! This module provides the `Converter` trait, the opaque codec seam of the
//! sync, and `MagickConverter`, which drives the ImageMagick CLI to turn a JPEG
//! into a HEIC file.
//!
//! # Example
//!
//! ```ignore
//! use syncpics_core::converter::{ConversionJob, Converter, ConverterConfig, MagickConverter};
//!
//! let converter = MagickConverter::new(ConverterConfig::default().with_quality(90));
//!
//! // Fail early if the binary is missing
//! converter.validate().await?;
//!
//! let job = ConversionJob::new(
//!     "2023/IMG_0001.JPG",
//!     PathBuf::from("/photos/src/2023/IMG_0001.JPG"),
//!     PathBuf::from("/photos/mirror/2023/IMG_0001.HEIC"),
//! );
//! let result = converter.convert(job).await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod magick;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use magick::MagickConverter;
pub use traits::Converter;
pub use types::{ConversionJob, ConversionResult};
