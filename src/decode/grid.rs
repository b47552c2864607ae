//! Color grids encoded as base64 pixel blobs.
//!
//! Two layouts exist, both addressing cells through a flat counter `i`
//! with `x = i / dimy`, `y = i % dimy` (x outer, y inner):
//!
//! - `RAW`: 4 bytes per cell (`r, g, b, a`), `dimx * dimy * 4` bytes total.
//! - `RLE`: 5-byte records `(repeat, r, g, b, a)`, each painting
//!   `repeat + 1` consecutive cells. The records must cover the grid exactly.

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Decoder, ensure, fail, parse_json};
use crate::{HuginnError, Result};

const DECODER: &str = "color_grid";

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Dense `dimx` × `dimy` grid of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorGrid {
    dimx: usize,
    dimy: usize,
    cells: Vec<Color>,
}

impl ColorGrid {
    /// A grid with every cell set to the default (transparent black) color.
    pub fn new(dimx: usize, dimy: usize) -> Self {
        Self {
            dimx,
            dimy,
            cells: vec![Color::default(); dimx * dimy],
        }
    }

    pub fn dimx(&self) -> usize {
        self.dimx
    }

    pub fn dimy(&self) -> usize {
        self.dimy
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.dimx && y < self.dimy).then(|| x * self.dimy + y)
    }

    /// Color at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.offset(x, y).map(|i| self.cells[i])
    }

    /// Paint `(x, y)`. Returns `false` (and does nothing) outside the grid.
    pub fn set(&mut self, x: usize, y: usize, color: Color) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.cells[i] = color;
                true
            }
            None => false,
        }
    }

    /// Cells in counter order.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Serialize to the `RAW` byte layout.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        self.cells
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }
}

/// Pixel blob encoding tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEncoding {
    Raw,
    Rle,
}

impl FromStr for GridEncoding {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RAW" => Ok(GridEncoding::Raw),
            "RLE" => Ok(GridEncoding::Rle),
            other => Err(fail(
                DECODER,
                &format!("encoding {other:?} not supported"),
            )),
        }
    }
}

/// Decode a base64 pixel blob tagged `encoding` into a `dimx` × `dimy` grid.
pub fn decode_grid(dimx: usize, dimy: usize, encoding: &str, base64: &str) -> Result<ColorGrid> {
    let encoding: GridEncoding = encoding.parse()?;
    let bytes = unwrap_base64(base64)?;
    decode_pixels(dimx, dimy, encoding, &bytes)
}

fn unwrap_base64(blob: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(blob.trim())
        .map_err(|e| fail(DECODER, &format!("invalid base64 payload: {e}")))
}

/// Decode already-unwrapped pixel bytes.
pub fn decode_pixels(
    dimx: usize,
    dimy: usize,
    encoding: GridEncoding,
    bytes: &[u8],
) -> Result<ColorGrid> {
    debug!(dimx, dimy, ?encoding, len = bytes.len(), "decoding color grid");
    let cells = dimx
        .checked_mul(dimy)
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or_else(|| fail(DECODER, "dimensions overflow"))?;
    // Size checks happen before the grid is allocated.
    match encoding {
        GridEncoding::Raw => ensure(
            bytes.len() >= cells * 4,
            DECODER,
            &format!("RAW payload has {} bytes, expected {}", bytes.len(), cells * 4),
        )?,
        // each RLE record paints at most 256 cells
        GridEncoding::Rle => ensure(
            cells <= (bytes.len() / 5).saturating_mul(256),
            DECODER,
            &format!("RLE payload too small for {cells} cells"),
        )?,
    }
    let mut grid = ColorGrid::new(dimx, dimy);
    match encoding {
        GridEncoding::Raw => decode_raw(&mut grid, bytes),
        GridEncoding::Rle => {
            let written = decode_rle(&mut grid, bytes)?;
            debug!(written, "decoded RLE cells");
        }
    }
    Ok(grid)
}

/// Caller guarantees `bytes` holds at least `dimx * dimy * 4` bytes.
fn decode_raw(grid: &mut ColorGrid, bytes: &[u8]) {
    let mut base = 0;
    for x in 0..grid.dimx {
        for y in 0..grid.dimy {
            grid.set(x, y, Color::from_slice(&bytes[base..base + 4]));
            base += 4;
        }
    }
}

/// Returns the number of cells written, always `dimx * dimy` on success.
fn decode_rle(grid: &mut ColorGrid, bytes: &[u8]) -> Result<usize> {
    let total = grid.dimx * grid.dimy;
    let mut written = 0usize;

    for record in bytes.chunks(5) {
        ensure(
            record.len() == 5,
            DECODER,
            "RLE payload is not a multiple of 5 bytes",
        )?;
        let run = record[0] as usize + 1;
        let color = Color::from_slice(&record[1..]);
        ensure(
            written + run <= total,
            DECODER,
            "too much data in RLE payload",
        )?;

        for _ in 0..run {
            let (x, y) = (written / grid.dimy, written % grid.dimy);
            grid.set(x, y, color);
            written += 1;
        }
    }

    ensure(
        written == total,
        DECODER,
        &format!("RLE payload covers {written} of {total} cells"),
    )?;
    Ok(written)
}

#[derive(Deserialize)]
struct ColorGridAssignment {
    assignment_type: String,
    data: Vec<ColorGridData>,
}

#[derive(Deserialize)]
struct ColorGridData {
    encoding: String,
    dimensions: Vec<u32>,
    nodes: Vec<String>,
}

/// Decodes a stored ColorGrid assignment:
/// `{"assignment_type": "ColorGrid", "data": [{"encoding", "dimensions", "nodes"}]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorGridDecoder;

impl Decoder for ColorGridDecoder {
    type Output = ColorGrid;

    fn name(&self) -> &'static str {
        DECODER
    }

    fn decode(&self, body: &str) -> Result<ColorGrid> {
        let assignment: ColorGridAssignment = parse_json(body, DECODER)?;
        ensure(
            assignment.assignment_type == "ColorGrid",
            DECODER,
            "not a ColorGrid",
        )?;
        let data = assignment
            .data
            .into_iter()
            .next()
            .ok_or_else(|| fail(DECODER, "empty data array"))?;

        let encoding: GridEncoding = data.encoding.parse()?;
        ensure(
            data.dimensions.len() >= 2,
            DECODER,
            "dimensions must have two entries",
        )?;
        let (dimx, dimy) = (data.dimensions[0] as usize, data.dimensions[1] as usize);
        let blob = data
            .nodes
            .first()
            .ok_or_else(|| fail(DECODER, "no pixel data"))?;

        let bytes = unwrap_base64(blob)?;
        decode_pixels(dimx, dimy, encoding, &bytes)
    }
}
