//! Segmentation range and its threshold parameter text
//!
//! # Text format
//!
//! ```text
//! #HSV Config in the format: minH maxH minS maxS minV maxV
//! #130 160 10 40 75 130
//! 10 160 0 200 10 130
//! ```
//!
//! Lines starting with `#` (after leading whitespace) and blank lines
//! are ignored. Every other line must hold exactly six integers. When
//! several data lines are present the last one wins.

use crate::{RecogError, RecogResult};
use handsign_color::Hsv;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Upper bound of the hue channel.
pub const MAX_HUE: i32 = 180;

/// Upper bound of the saturation and value channels.
pub const MAX_SV: i32 = 255;

/// Maximum input size in bytes for range text.
const MAX_INPUT_SIZE: usize = 1_000_000;

/// Inclusive HSV window used to segment the hand from the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentationRange {
    pub min_h: i32,
    pub max_h: i32,
    pub min_s: i32,
    pub max_s: i32,
    pub min_v: i32,
    pub max_v: i32,
}

impl SegmentationRange {
    /// Range used when building the training dataset.
    pub const TRAINING: Self = Self {
        min_h: 10,
        max_h: 160,
        min_s: 0,
        max_s: 200,
        min_v: 10,
        max_v: 130,
    };

    /// Create a range from `(minH, maxH, minS, maxS, minV, maxV)`.
    pub fn new(min_h: i32, max_h: i32, min_s: i32, max_s: i32, min_v: i32, max_v: i32) -> Self {
        Self {
            min_h,
            max_h,
            min_s,
            max_s,
            min_v,
            max_v,
        }
    }

    /// The six bounds in file order.
    pub fn to_array(&self) -> [i32; 6] {
        [
            self.min_h, self.max_h, self.min_s, self.max_s, self.min_v, self.max_v,
        ]
    }

    /// Build a range from six bounds in file order.
    pub fn from_array(v: [i32; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    /// Check every bound against its channel domain and ordering.
    pub fn validate(&self) -> RecogResult<()> {
        let channels = [
            ("H", self.min_h, self.max_h, MAX_HUE),
            ("S", self.min_s, self.max_s, MAX_SV),
            ("V", self.min_v, self.max_v, MAX_SV),
        ];
        for (name, lo, hi, max) in channels {
            if lo < 0 || lo > max || hi < 0 || hi > max {
                return Err(RecogError::InvalidRange(format!(
                    "{name} bounds {lo}..{hi} outside 0..={max}"
                )));
            }
            if lo > hi {
                return Err(RecogError::InvalidRange(format!(
                    "{name} lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(())
    }

    /// Validated lower and upper corners as 8-bit HSV.
    pub fn bounds(&self) -> RecogResult<(Hsv, Hsv)> {
        self.validate()?;
        Ok((
            Hsv::new(self.min_h as u8, self.min_s as u8, self.min_v as u8),
            Hsv::new(self.max_h as u8, self.max_s as u8, self.max_v as u8),
        ))
    }

    /// Read a range from a reader.
    pub fn read_from_reader(reader: &mut impl Read) -> RecogResult<Self> {
        let mut buf = Vec::new();
        reader
            .take((MAX_INPUT_SIZE + 1) as u64)
            .read_to_end(&mut buf)?;
        if buf.len() > MAX_INPUT_SIZE {
            return Err(RecogError::RangeFormat {
                line: 0,
                message: format!("input exceeds {MAX_INPUT_SIZE} bytes"),
            });
        }
        Self::read_from_bytes(&buf)
    }

    /// Read a range from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> RecogResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| RecogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        Self::read_from_reader(&mut reader)
    }

    /// Read a range from a byte slice.
    pub fn read_from_bytes(data: &[u8]) -> RecogResult<Self> {
        let text = std::str::from_utf8(data).map_err(|e| RecogError::RangeFormat {
            line: 0,
            message: format!("invalid UTF-8: {e}"),
        })?;

        let mut last = None;
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            last = Some(parse_data_line(line, idx + 1)?);
        }

        let range = last.ok_or_else(|| RecogError::RangeFormat {
            line: 0,
            message: "no data line".to_string(),
        })?;
        range.validate()?;
        Ok(range)
    }

    /// Write the range with the standard header comments.
    pub fn write_to_writer(&self, writer: &mut impl Write) -> RecogResult<()> {
        writeln!(writer, "#HSV Config in the format: minH maxH minS maxS minV maxV")?;
        writeln!(writer, "#130 160 10 40 75 130")?;
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            self.min_h, self.max_h, self.min_s, self.max_s, self.min_v, self.max_v
        )?;
        writer.flush()?;
        Ok(())
    }

    /// Write the range to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> RecogResult<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| RecogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to_writer(&mut writer)
    }

    /// Write the range to a byte vector.
    pub fn write_to_bytes(&self) -> RecogResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to_writer(&mut buf)?;
        Ok(buf)
    }
}

impl Default for SegmentationRange {
    fn default() -> Self {
        Self::TRAINING
    }
}

fn parse_data_line(line: &str, lineno: usize) -> RecogResult<SegmentationRange> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(RecogError::RangeFormat {
            line: lineno,
            message: format!("expected 6 integers, found {}", fields.len()),
        });
    }
    let mut vals = [0i32; 6];
    for (slot, field) in vals.iter_mut().zip(&fields) {
        *slot = field.parse().map_err(|_| RecogError::RangeFormat {
            line: lineno,
            message: format!("not an integer: {field:?}"),
        })?;
    }
    Ok(SegmentationRange::from_array(vals))
}
