//! VTK `ImageData` (`.vti`) writer
//!
//! Serializes density, both velocity components and the derived velocity
//! magnitude of a 2-D grid into one self-contained XML file per call.
//!
//! # Output modes
//!
//! - [`OutputMode::Ascii`]: values inline as text, one `DataArray` per field.
//! - [`OutputMode::BinaryAppended`]: `DataArray` elements only carry byte
//!   offsets; raw native-endian blocks follow in an `AppendedData` section,
//!   each preceded by a 4-byte length prefix.
//!
//! Both modes emit points in linear index order (`i + nx * j`), so a point
//! carries the same value whichever mode wrote it.
//!
//! # Example
//!
//! ```no_run
//! use lbm_vti_core::{FieldSet, GridImageWriter, GridShape, OutputMode, WriterConfig};
//!
//! let grid = GridShape::new(2, 2)?;
//! let rho = [1.0_f32, 2.0, 3.0, 4.0];
//! let zeros = [0.0_f32; 4];
//! let fields = FieldSet::new(&rho, &zeros, &zeros, grid)?;
//!
//! let writer = GridImageWriter::new(WriterConfig::default().with_output_dir("out"));
//! let path = writer.write(&fields, OutputMode::Ascii, 0)?;
//! assert!(path.ends_with("lbm_data_0000000.vti"));
//! # Ok::<(), lbm_vti_core::VtiError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::core_types::{
    AsciiValue, ByteOrder, FieldSet, GridParams, GridShape, PointField, Precision, VtkScalar,
    ORIGIN, SPACING,
};
use crate::error::{Result, VtiError};
use crate::export::config::WriterConfig;
use crate::export::xml::XmlEmitter;

/// Size of the length prefix in front of every appended block
pub const LENGTH_PREFIX_BYTES: u64 = std::mem::size_of::<u32>() as u64;

/// Encoding of the point data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Human-readable inline text
    Ascii,
    /// Raw binary blocks after the XML body
    #[default]
    BinaryAppended,
}

/// Byte layout of the `AppendedData` section.
///
/// Every field occupies one block: a `u32` length prefix followed by
/// `nx * ny * width` payload bytes. Offsets count from the byte after the
/// leading `_` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendedLayout {
    block_bytes: u32,
}

impl AppendedLayout {
    /// Compute the layout for `grid` at `precision`.
    ///
    /// # Errors
    /// Returns [`VtiError::PayloadTooLarge`] if one block does not fit in the
    /// 32-bit length prefix.
    pub fn new(grid: GridShape, precision: Precision) -> Result<Self> {
        let bytes = (grid.n_points() as u64).saturating_mul(precision.width() as u64);
        let block_bytes = u32::try_from(bytes).map_err(|_| VtiError::PayloadTooLarge { bytes })?;
        Ok(Self { block_bytes })
    }

    /// Payload bytes of one field, the value of its length prefix
    pub const fn block_bytes(&self) -> u32 {
        self.block_bytes
    }

    /// `offset` attribute of the `k`-th array
    pub fn offset(&self, k: usize) -> u64 {
        k as u64 * (u64::from(self.block_bytes) + LENGTH_PREFIX_BYTES)
    }

    /// Total appended bytes after the `_` marker
    pub fn total_bytes(&self) -> u64 {
        self.offset(PointField::ALL.len())
    }
}

/// What goes inside `PointData`, fixed before the first byte is written
#[derive(Debug, Clone, Copy)]
enum Body {
    Ascii,
    Appended(AppendedLayout),
}

impl Body {
    fn plan(grid: GridShape, mode: OutputMode, precision: Precision) -> Result<Self> {
        match mode {
            OutputMode::Ascii => Ok(Self::Ascii),
            OutputMode::BinaryAppended => AppendedLayout::new(grid, precision).map(Self::Appended),
        }
    }
}

/// Writes one `.vti` file per call under a fixed [`WriterConfig`].
///
/// The writer holds no state besides its configuration; the same inputs
/// always produce the same path and the same bytes.
#[derive(Debug, Clone, Default)]
pub struct GridImageWriter {
    config: WriterConfig,
}

impl GridImageWriter {
    /// Create a writer
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Output location policy
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write `fields` for time step `step`, creating or truncating the file.
    ///
    /// Returns the path that was written. A failure after the file was opened
    /// may leave it truncated.
    ///
    /// # Errors
    /// - [`VtiError::PayloadTooLarge`] if binary blocks overflow the length
    ///   prefix; no file is created.
    /// - [`VtiError::Open`] if the destination cannot be created.
    /// - [`VtiError::Write`] if writing or the final flush fails.
    pub fn write<T: VtkScalar>(
        &self,
        fields: &FieldSet<'_, T>,
        mode: OutputMode,
        step: u64,
    ) -> Result<PathBuf> {
        let grid = fields.grid();
        let body = Body::plan(grid, mode, T::PRECISION).inspect_err(|e| {
            warn!("Skipping step {} output: {}", step, e);
        })?;

        let path = self.config.path_for_step(step);
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(source) => {
                warn!("Cannot open {} for writing: {}", path.display(), source);
                return Err(VtiError::Open { path, source });
            }
        };

        if let Err(source) = emit(fields, body, BufWriter::new(file)) {
            warn!("Writing {} failed: {}", path.display(), source);
            return Err(VtiError::Write { path, source });
        }

        debug!(
            "Wrote {} ({:?}, {} grid, {})",
            path.display(),
            mode,
            grid,
            T::PRECISION.as_str()
        );
        Ok(path)
    }

    /// Validate raw arrays against `params` and write them.
    ///
    /// # Errors
    /// [`VtiError::InvalidGrid`] or [`VtiError::LengthMismatch`] for bad
    /// inputs, otherwise the errors of [`GridImageWriter::write`].
    pub fn write_fields<T: VtkScalar, P: GridParams + ?Sized>(
        &self,
        rho: &[T],
        ux: &[T],
        uy: &[T],
        params: &P,
        mode: OutputMode,
        step: u64,
    ) -> Result<PathBuf> {
        let fields = FieldSet::new(rho, ux, uy, params.shape()?)?;
        self.write(&fields, mode, step)
    }
}

/// Emit the file contents for `fields` into an arbitrary sink.
///
/// Produces exactly the bytes [`GridImageWriter::write`] puts on disk and
/// hands the flushed sink back.
///
/// # Errors
/// [`VtiError::PayloadTooLarge`] before anything is written, or
/// [`VtiError::Sink`] if the sink fails.
pub fn write_to<T: VtkScalar, W: Write>(
    fields: &FieldSet<'_, T>,
    mode: OutputMode,
    sink: W,
) -> Result<W> {
    let body = Body::plan(fields.grid(), mode, T::PRECISION)?;
    emit(fields, body, sink).map_err(VtiError::Sink)
}

fn emit<T: VtkScalar, W: Write>(fields: &FieldSet<'_, T>, body: Body, sink: W) -> io::Result<W> {
    let grid = fields.grid();
    let extent = grid.whole_extent();
    let origin = join_triplet(ORIGIN);
    let spacing = join_triplet(SPACING);
    let precision = T::PRECISION.as_str();

    let mut xml = XmlEmitter::new(sink);

    // Appended raw data is not valid XML, so only ASCII files get a declaration
    if matches!(body, Body::Ascii) {
        xml.declaration()?;
    }
    xml.open(
        "VTKFile",
        &[
            ("type", "ImageData"),
            ("version", "0.1"),
            ("byte_order", ByteOrder::native().as_str()),
        ],
    )?;
    xml.open(
        "ImageData",
        &[
            ("WholeExtent", extent.as_str()),
            ("Origin", origin.as_str()),
            ("Spacing", spacing.as_str()),
        ],
    )?;
    xml.open("Piece", &[("Extent", extent.as_str())])?;
    xml.open("CellData", &[])?;
    xml.close("CellData")?;

    xml.open("PointData", &[])?;
    match body {
        Body::Ascii => {
            for field in PointField::ALL {
                xml.open(
                    "DataArray",
                    &[
                        ("type", precision),
                        ("Name", field.name()),
                        ("format", "ascii"),
                    ],
                )?;
                xml.text_line(fields.values(field).map(AsciiValue))?;
                xml.close("DataArray")?;
            }
        }
        Body::Appended(layout) => {
            for (k, field) in PointField::ALL.into_iter().enumerate() {
                let offset = layout.offset(k).to_string();
                xml.empty(
                    "DataArray",
                    &[
                        ("type", precision),
                        ("Name", field.name()),
                        ("format", "appended"),
                        ("offset", offset.as_str()),
                    ],
                )?;
            }
        }
    }
    xml.close("PointData")?;
    xml.close("Piece")?;
    xml.close("ImageData")?;

    if let Body::Appended(layout) = body {
        xml.open("AppendedData", &[("encoding", "raw")])?;
        xml.raw(b"_")?;
        for field in PointField::ALL {
            write_block(&mut xml, fields, field, layout)?;
        }
        xml.close("AppendedData")?;
    }

    xml.close("VTKFile")?;
    xml.finish()
}

fn write_block<T: VtkScalar, W: Write>(
    xml: &mut XmlEmitter<W>,
    fields: &FieldSet<'_, T>,
    field: PointField,
    layout: AppendedLayout,
) -> io::Result<()> {
    xml.raw(&layout.block_bytes().to_ne_bytes())?;

    if let Some(values) = fields.stored(field) {
        // Row-major storage: the slice is already in (j outer, i inner) order
        return xml.raw(bytemuck::cast_slice(values));
    }

    let grid = fields.grid();
    for j in 0..grid.ny() {
        for i in 0..grid.nx() {
            xml.raw(bytemuck::bytes_of(&fields.value_at(field, i, j)))?;
        }
    }
    Ok(())
}

fn join_triplet(values: [f64; 3]) -> String {
    format!("{} {} {}", values[0], values[1], values[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ([f32; 4], [f32; 4], [f32; 4], GridShape) {
        (
            [1.0, 2.0, 3.0, 4.0],
            [0.0; 4],
            [0.0; 4],
            GridShape::new(2, 2).unwrap(),
        )
    }

    fn render<T: VtkScalar>(fields: &FieldSet<'_, T>, mode: OutputMode) -> Vec<u8> {
        write_to(fields, mode, Vec::new()).unwrap()
    }

    /// Text of the `DataArray` named `name` in an ASCII file
    fn ascii_body<'a>(text: &'a str, name: &str) -> &'a str {
        let tag = format!("Name=\"{name}\" format=\"ascii\">\n");
        let start = text.find(&tag).unwrap() + tag.len();
        let end = start + text[start..].find("</DataArray>").unwrap();
        text[start..end].trim()
    }

    #[test]
    fn test_layout_offsets() {
        let layout = AppendedLayout::new(GridShape::new(2, 2).unwrap(), Precision::Float32).unwrap();
        assert_eq!(layout.block_bytes(), 16);
        let offsets: Vec<u64> = (0..4).map(|k| layout.offset(k)).collect();
        assert_eq!(offsets, [0, 20, 40, 60]);
        assert_eq!(layout.total_bytes(), 80);
    }

    #[test]
    fn test_layout_rejects_oversized_block() {
        // 65536 * 16384 * 4 = 2^32, one past u32::MAX
        let grid = GridShape::new(65536, 16384).unwrap();
        let err = AppendedLayout::new(grid, Precision::Float32).unwrap_err();
        assert!(matches!(err, VtiError::PayloadTooLarge { bytes } if bytes == 1 << 32));

        let grid = GridShape::new(65535, 16384).unwrap();
        let layout = AppendedLayout::new(grid, Precision::Float32).unwrap();
        assert_eq!(u64::from(layout.block_bytes()), 65535 * 16384 * 4);

        let grid = GridShape::new(32768, 16384).unwrap();
        assert!(AppendedLayout::new(grid, Precision::Float64).is_err());
    }

    #[test]
    fn test_ascii_scenario() {
        let (rho, ux, uy, grid) = scenario();
        let fields = FieldSet::new(&rho, &ux, &uy, grid).unwrap();
        let text = String::from_utf8(render(&fields, OutputMode::Ascii)).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\"?>\n<VTKFile type=\"ImageData\""));
        assert!(text.contains("WholeExtent=\"0 1 0 1 0 0\" Origin=\"0 0 0\" Spacing=\"1 1 0\""));
        assert!(text.contains("<Piece Extent=\"0 1 0 1 0 0\">"));
        assert!(text.contains("<CellData>\n      </CellData>"));
        assert_eq!(ascii_body(&text, "rho"), "1 2 3 4");
        assert_eq!(ascii_body(&text, "ux"), "0 0 0 0");
        assert_eq!(ascii_body(&text, "uy"), "0 0 0 0");
        assert_eq!(ascii_body(&text, "uNorm"), "0 0 0 0");
        assert!(text.ends_with("</VTKFile>\n"));
    }

    #[test]
    fn test_ascii_field_order() {
        let (rho, ux, uy, grid) = scenario();
        let fields = FieldSet::new(&rho, &ux, &uy, grid).unwrap();
        let text = String::from_utf8(render(&fields, OutputMode::Ascii)).unwrap();

        let positions: Vec<usize> = ["\"rho\"", "\"ux\"", "\"uy\"", "\"uNorm\""]
            .iter()
            .map(|name| text.find(name).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_binary_scenario_header() {
        let (rho, ux, uy, grid) = scenario();
        let fields = FieldSet::new(&rho, &ux, &uy, grid).unwrap();
        let bytes = render(&fields, OutputMode::BinaryAppended);

        // No declaration in binary mode
        assert!(bytes.starts_with(b"<VTKFile type=\"ImageData\" version=\"0.1\" byte_order=\""));

        let marker = b"<AppendedData encoding=\"raw\">\n_";
        let split = bytes
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap();
        let header = std::str::from_utf8(&bytes[..split]).unwrap();
        for (name, offset) in [("rho", 0), ("ux", 20), ("uy", 40), ("uNorm", 60)] {
            let element = format!(
                "<DataArray type=\"Float32\" Name=\"{name}\" format=\"appended\" offset=\"{offset}\"/>"
            );
            assert!(header.contains(&element), "missing {element}");
        }
        assert!(!header.contains("format=\"ascii\""));
    }

    #[test]
    fn test_binary_payload_framing() {
        let (rho, ux, uy, grid) = scenario();
        let fields = FieldSet::new(&rho, &ux, &uy, grid).unwrap();
        let bytes = render(&fields, OutputMode::BinaryAppended);

        let marker = b"encoding=\"raw\">\n_";
        let start = bytes
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        let tail = b"  </AppendedData>\n</VTKFile>\n";
        assert!(bytes.ends_with(tail));
        let payload = &bytes[start..bytes.len() - tail.len()];
        assert_eq!(payload.len(), 80);

        assert_eq!(&payload[0..4], &16_u32.to_ne_bytes());
        let rho_back: Vec<f32> = payload[4..20]
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(rho_back, rho);
        assert_eq!(&payload[60..64], &16_u32.to_ne_bytes());
        assert!(payload[64..80].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_float64_tags() {
        let grid = GridShape::new(3, 1).unwrap();
        let values = [0.5_f64, 1.5, 2.5];
        let fields = FieldSet::new(&values, &values, &values, grid).unwrap();

        for mode in [OutputMode::Ascii, OutputMode::BinaryAppended] {
            let bytes = render(&fields, mode);
            let text = String::from_utf8_lossy(&bytes);
            assert_eq!(text.matches("type=\"Float64\"").count(), 4);
            assert!(!text.contains("Float32"));
        }
    }

    /// Sink that accepts `budget` bytes, then fails every write; optionally fails on flush
    #[derive(Debug)]
    struct FailingSink {
        budget: usize,
        fail_flush: bool,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::other("disk full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.fail_flush {
                Err(io::Error::other("flush failed"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_sink_failure_mid_stream() {
        let (rho, ux, uy, grid) = scenario();
        let fields = FieldSet::new(&rho, &ux, &uy, grid).unwrap();

        for mode in [OutputMode::Ascii, OutputMode::BinaryAppended] {
            let full_len = render(&fields, mode).len();
            // Header, mid-header, and last payload byte
            for budget in [0, 10, full_len - 1] {
                let sink = FailingSink {
                    budget,
                    fail_flush: false,
                };
                let err = write_to(&fields, mode, sink).unwrap_err();
                match err {
                    VtiError::Sink(source) => assert_eq!(source.to_string(), "disk full"),
                    other => panic!("{mode:?} budget {budget}: unexpected error {other}"),
                }
            }
        }
    }

    #[test]
    fn test_sink_failure_on_flush() {
        let (rho, ux, uy, grid) = scenario();
        let fields = FieldSet::new(&rho, &ux, &uy, grid).unwrap();

        for mode in [OutputMode::Ascii, OutputMode::BinaryAppended] {
            let sink = FailingSink {
                budget: usize::MAX,
                fail_flush: true,
            };
            let err = write_to(&fields, mode, sink).unwrap_err();
            assert!(
                matches!(&err, VtiError::Sink(source) if source.to_string() == "flush failed"),
                "{mode:?}: {err}"
            );
        }
    }

    #[test]
    fn test_ascii_extreme_values_use_exponent() {
        let grid = GridShape::new(3, 1).unwrap();
        let rho = [1e30_f32, 1e-40, 1.0];
        let zeros = [0.0_f32; 3];
        let fields = FieldSet::new(&rho, &zeros, &zeros, grid).unwrap();
        let text = String::from_utf8(render(&fields, OutputMode::Ascii)).unwrap();

        let body = ascii_body(&text, "rho");
        let tokens: Vec<&str> = body.split_whitespace().collect();
        assert_eq!(tokens[0], "1e30");
        assert_eq!(tokens[2], "1");
        let parsed: Vec<f32> = tokens.iter().map(|t| t.parse().unwrap()).collect();
        assert_eq!(parsed, rho);
        assert!(tokens.iter().all(|t| t.len() < 12));
    }

    #[test]
    fn test_output_mode_serde_names() {
        let mode: OutputMode = serde_json::from_str("\"ascii\"").unwrap();
        assert_eq!(mode, OutputMode::Ascii);
        assert_eq!(
            serde_json::to_string(&OutputMode::BinaryAppended).unwrap(),
            "\"binary_appended\""
        );
        assert_eq!(OutputMode::default(), OutputMode::BinaryAppended);
    }
}
