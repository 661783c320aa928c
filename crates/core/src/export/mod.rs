//! Image-data export: output location policy and the `.vti` writer

pub mod config;
pub mod writer;
mod xml;

pub use config::{WriterConfig, DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_PREFIX, FILE_EXTENSION};
pub use writer::{write_to, AppendedLayout, GridImageWriter, OutputMode, LENGTH_PREFIX_BYTES};
