use std::fmt;

use egui::Color32;
use image::{Rgba, RgbaImage};

/// Default edge length for a freshly created canvas, in cells.
pub const DEFAULT_SIZE: u32 = 8;

/// Upper bound on total cells (4096×4096); requests beyond it are clamped.
const MAX_CELLS: u64 = 16_777_216;

// ============================================================================
// COLOR
// ============================================================================

/// Opaque RGB color of a single cell.
///
/// Stored as fixed-width channels rather than a hex string so that an invalid
/// color is unrepresentable past the parse boundary — `from_hex` is the only
/// place malformed input can appear, and it is rejected there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color([u8; 3]);

impl Color {
    pub const WHITE: Color = Color([0xFF, 0xFF, 0xFF]);
    pub const BLACK: Color = Color([0x00, 0x00, 0x00]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b])
    }

    /// Parse a 6-digit hex color, case-insensitive, with an optional leading
    /// `#`. Anything else fails with `CanvasError::InvalidColor`.
    pub fn from_hex(s: &str) -> Result<Self, CanvasError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CanvasError::InvalidColor(s.to_string()));
        }
        let val = u32::from_str_radix(digits, 16)
            .map_err(|_| CanvasError::InvalidColor(s.to_string()))?;
        Ok(Color([
            ((val >> 16) & 0xFF) as u8,
            ((val >> 8) & 0xFF) as u8,
            (val & 0xFF) as u8,
        ]))
    }

    /// Uppercase `RRGGBB` without the `#`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// Fully opaque RGBA pixel for the raster exporter.
    pub fn to_rgba(&self) -> Rgba<u8> {
        Rgba([self.0[0], self.0[1], self.0[2], 255])
    }

    pub fn to_color32(&self) -> Color32 {
        Color32::from_rgb(self.0[0], self.0[1], self.0[2])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// Coordinate outside the current grid dimensions.
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Color string that is not 6 hex digits (with optional `#`).
    InvalidColor(String),
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({}, {}) is outside the {}×{} canvas",
                x, y, width, height
            ),
            CanvasError::InvalidColor(s) => write!(f, "invalid color string {:?}", s),
        }
    }
}

impl std::error::Error for CanvasError {}

// ============================================================================
// PIXEL GRID — flat row-major cell storage
// ============================================================================

/// Rectangular grid of cells, stored as a flat `Vec` indexed `y * width + x`.
///
/// Every in-bounds coordinate always holds a defined `Color`; `new` and
/// `resize` fill cells that have no prior content with white.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    cells: Vec<Color>,
}

impl PixelGrid {
    /// Create a grid with every cell set to white.
    /// A zero dimension is clamped to 1 with a logged warning.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = Self::clamp_dimensions(width, height);
        Self {
            width,
            height,
            cells: vec![Color::WHITE; (width * height) as usize],
        }
    }

    fn clamp_dimensions(width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            crate::log_warn!(
                "PixelGrid: zero dimension in {}x{} request, clamped to 1",
                width,
                height
            );
            (width.max(1), height.max(1))
        } else if (width as u64) * (height as u64) > MAX_CELLS {
            crate::log_warn!(
                "PixelGrid: {}x{} exceeds {} cells, clamped to 1x1",
                width,
                height,
                MAX_CELLS
            );
            (1, 1)
        } else {
            (width, height)
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat index for an in-bounds coordinate, `OutOfBounds` otherwise.
    fn index(&self, x: u32, y: u32) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Color, CanvasError> {
        Ok(self.cells[self.index(x, y)?])
    }

    /// Overwrite a cell unconditionally.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> Result<(), CanvasError> {
        let idx = self.index(x, y)?;
        self.cells[idx] = color;
        Ok(())
    }

    /// Change the grid dimensions, keeping the overlapping content anchored
    /// top-left. Cells outside the new bounds are dropped; cells with no old
    /// counterpart become white. Growing and shrinking may be mixed per axis.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        let (new_width, new_height) = Self::clamp_dimensions(new_width, new_height);
        if new_width == self.width && new_height == self.height {
            return;
        }
        let mut cells = vec![Color::WHITE; (new_width * new_height) as usize];
        for y in 0..self.height.min(new_height) {
            for x in 0..self.width.min(new_width) {
                cells[(y * new_width + x) as usize] = self.cells[(y * self.width + x) as usize];
            }
        }
        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
    }
}

// ============================================================================
// CANVAS — paint engine over the grid
// ============================================================================

/// The painting surface: one `PixelGrid` plus the brush-stroke flag.
///
/// These two are the only mutable state the component owns. All operations
/// are synchronous and run to completion; callers never observe a partially
/// applied fill or resize.
pub struct Canvas {
    grid: PixelGrid,
    painting: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: PixelGrid::new(width, height),
            painting: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        self.grid.resize(new_width, new_height);
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Color, CanvasError> {
        self.grid.get(x, y)
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) -> Result<(), CanvasError> {
        self.grid.set(x, y, color)
    }

    // ---- stroke state -------------------------------------------------------

    /// Begin a brush stroke. Only the input layer cares about this flag — it
    /// decides whether pointer moves keep painting. `paint` itself behaves
    /// the same in and out of a stroke.
    pub fn start_stroke(&mut self) {
        self.painting = true;
    }

    pub fn end_stroke(&mut self) {
        self.painting = false;
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    // ---- painting -----------------------------------------------------------

    /// Paint a single cell. Painting a cell in its current color is a silent
    /// no-op, not an error.
    pub fn paint(&mut self, x: u32, y: u32, color: Color) -> Result<(), CanvasError> {
        if self.grid.get(x, y)? == color {
            return Ok(());
        }
        self.grid.set(x, y, color)
    }

    /// Bucket fill: repaint the 4-connected region of cells matching the
    /// seed cell's color.
    ///
    /// Explicit worklist rather than recursion, so region size is bounded by
    /// the grid and not the call stack. Cells are marked visited *before*
    /// being pushed, so each cell is painted at most once regardless of how
    /// the region loops back on itself.
    pub fn fill(&mut self, x: u32, y: u32, color: Color) -> Result<(), CanvasError> {
        let previous = self.grid.get(x, y)?;
        if previous == color {
            return Ok(()); // nothing to fill
        }

        let width = self.grid.width;
        let height = self.grid.height;
        // visited doubles as the "already painted" check
        let mut visited = vec![false; (width * height) as usize];

        // Worklist of packed flat indices (y * width + x); cheaper to push
        // than coordinate pairs.
        let mut stack: Vec<u32> = Vec::with_capacity(64);
        let seed = y * width + x;
        visited[seed as usize] = true;
        stack.push(seed);

        while let Some(idx) = stack.pop() {
            self.grid.cells[idx as usize] = color;

            let cx = idx % width;
            let cy = idx / width;

            // X-axis pair, then Y-axis pair. A neighbor outside the grid is
            // the boundary of the region, not an error.
            // Left
            if cx > 0 {
                let ni = (idx - 1) as usize;
                if !visited[ni] && self.grid.cells[ni] == previous {
                    visited[ni] = true;
                    stack.push(idx - 1);
                }
            }
            // Right
            if cx + 1 < width {
                let ni = (idx + 1) as usize;
                if !visited[ni] && self.grid.cells[ni] == previous {
                    visited[ni] = true;
                    stack.push(idx + 1);
                }
            }
            // Up
            if cy > 0 {
                let ni = (idx - width) as usize;
                if !visited[ni] && self.grid.cells[ni] == previous {
                    visited[ni] = true;
                    stack.push(idx - width);
                }
            }
            // Down
            if cy + 1 < height {
                let ni = (idx + width) as usize;
                if !visited[ni] && self.grid.cells[ni] == previous {
                    visited[ni] = true;
                    stack.push(idx + width);
                }
            }
        }

        Ok(())
    }

    /// Eyedropper: read a cell's color. Pure query, no state change.
    pub fn pick(&self, x: u32, y: u32) -> Result<Color, CanvasError> {
        self.grid.get(x, y)
    }

    // ---- export -------------------------------------------------------------

    /// Flatten the grid into a row-major RGBA8 buffer (alpha always 255)
    /// for the raster exporter.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.grid.width, self.grid.height);
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                img.put_pixel(
                    x,
                    y,
                    self.grid.cells[(y * self.grid.width + x) as usize].to_rgba(),
                );
            }
        }
        img
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::from_hex(s).unwrap()
    }

    #[test]
    fn new_canvas_is_all_white() {
        let canvas = Canvas::default();
        assert_eq!(canvas.width(), 8);
        assert_eq!(canvas.height(), 8);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(canvas.get(x, y).unwrap(), Color::WHITE);
            }
        }
    }

    #[test]
    fn hex_parsing_accepts_prefix_and_case() {
        assert_eq!(hex("FF0000"), Color::new(255, 0, 0));
        assert_eq!(hex("#ff0000"), Color::new(255, 0, 0));
        assert_eq!(hex("#AbCdEf"), Color::new(0xAB, 0xCD, 0xEF));
        assert_eq!(hex("ffffff").hex(), "FFFFFF");
    }

    #[test]
    fn hex_parsing_rejects_malformed_input() {
        for bad in ["", "FFF", "FFFFF", "FFFFFFF", "GGGGGG", "#FFFF 0", "##FFFFFF"] {
            assert!(
                matches!(Color::from_hex(bad), Err(CanvasError::InvalidColor(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn paint_is_idempotent() {
        let mut canvas = Canvas::default();
        let red = hex("FF0000");
        canvas.paint(3, 4, red).unwrap();
        let snapshot = canvas.grid().clone();
        canvas.paint(3, 4, red).unwrap();
        assert_eq!(canvas.grid(), &snapshot);
    }

    #[test]
    fn paint_behaves_the_same_inside_and_outside_a_stroke() {
        let mut canvas = Canvas::default();
        let red = hex("FF0000");
        canvas.paint(0, 0, red).unwrap();
        canvas.start_stroke();
        assert!(canvas.is_painting());
        canvas.paint(1, 0, red).unwrap();
        canvas.end_stroke();
        assert!(!canvas.is_painting());
        assert_eq!(canvas.get(0, 0).unwrap(), red);
        assert_eq!(canvas.get(1, 0).unwrap(), red);
    }

    #[test]
    fn resize_preserves_overlapping_content() {
        let mut canvas = Canvas::new(8, 8);
        let red = hex("FF0000");
        canvas.paint(2, 3, red).unwrap();
        canvas.resize(12, 12);
        assert_eq!(canvas.get(2, 3).unwrap(), red);
        // newly introduced cells are white
        assert_eq!(canvas.get(11, 11).unwrap(), Color::WHITE);
        assert_eq!(canvas.get(8, 0).unwrap(), Color::WHITE);
    }

    #[test]
    fn resize_drops_and_refills_out_of_bounds_cells() {
        let mut canvas = Canvas::new(8, 8);
        let red = hex("FF0000");
        canvas.paint(7, 7, red).unwrap();
        canvas.paint(1, 1, red).unwrap();
        canvas.resize(4, 4);
        assert_eq!(canvas.get(1, 1).unwrap(), red);
        assert!(canvas.get(7, 7).is_err());
        // growing back does not resurrect the dropped cell
        canvas.resize(8, 8);
        assert_eq!(canvas.get(7, 7).unwrap(), Color::WHITE);
        assert_eq!(canvas.get(1, 1).unwrap(), red);
    }

    #[test]
    fn resize_handles_non_uniform_dimensions() {
        let mut canvas = Canvas::new(8, 8);
        let blue = hex("0000FF");
        canvas.paint(5, 2, blue).unwrap();
        // grow one axis, shrink the other
        canvas.resize(16, 3);
        assert_eq!(canvas.width(), 16);
        assert_eq!(canvas.height(), 3);
        assert_eq!(canvas.get(5, 2).unwrap(), blue);
        assert_eq!(canvas.get(15, 0).unwrap(), Color::WHITE);
    }

    #[test]
    fn fill_floods_a_uniform_grid_completely() {
        let mut canvas = Canvas::new(8, 8);
        let red = hex("FF0000");
        canvas.fill(0, 0, red).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(canvas.get(x, y).unwrap(), red);
            }
        }
    }

    #[test]
    fn fill_stops_at_a_color_barrier() {
        let mut canvas = Canvas::new(8, 8);
        let black = Color::BLACK;
        let red = hex("FF0000");
        // one solid row splits the canvas
        for x in 0..8 {
            canvas.paint(x, 4, black).unwrap();
        }
        canvas.fill(3, 1, red).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let expected = match y {
                    0..=3 => red,
                    4 => black,
                    _ => Color::WHITE,
                };
                assert_eq!(canvas.get(x, y).unwrap(), expected, "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn fill_is_four_connected_not_eight() {
        let mut canvas = Canvas::new(3, 3);
        let black = Color::BLACK;
        let red = hex("FF0000");
        // the corner only touches the rest of the white region diagonally
        canvas.paint(1, 0, black).unwrap();
        canvas.paint(0, 1, black).unwrap();
        canvas.fill(0, 0, red).unwrap();
        assert_eq!(canvas.get(0, 0).unwrap(), red);
        // diagonal neighbor stays untouched
        assert_eq!(canvas.get(1, 1).unwrap(), Color::WHITE);
    }

    #[test]
    fn fill_into_same_color_is_a_no_op() {
        let mut canvas = Canvas::new(8, 8);
        let red = hex("FF0000");
        canvas.paint(0, 1, red).unwrap();
        let snapshot = canvas.grid().clone();
        canvas.fill(4, 4, Color::WHITE).unwrap();
        assert_eq!(canvas.grid(), &snapshot);
    }

    #[test]
    fn out_of_bounds_is_rejected_for_every_preset_size() {
        for size in [8u32, 12, 16, 32] {
            let mut canvas = Canvas::new(size, size);
            let oob =
                |r: Result<(), CanvasError>| matches!(r, Err(CanvasError::OutOfBounds { .. }));
            assert!(oob(canvas.get(size, 0).map(|_| ())));
            assert!(oob(canvas.get(0, size).map(|_| ())));
            assert!(oob(canvas.pick(size, size).map(|_| ())));
            assert!(oob(canvas.set(size, 0, Color::BLACK)));
            assert!(oob(canvas.paint(0, size, Color::BLACK)));
            assert!(oob(canvas.fill(size, size, Color::BLACK)));
        }
    }

    #[test]
    fn paint_then_fill_scenario_on_two_by_two() {
        let mut canvas = Canvas::new(2, 2);
        let red = hex("FF0000");
        let blue = hex("0000FF");
        canvas.paint(0, 0, red).unwrap();
        assert_eq!(canvas.get(0, 0).unwrap(), red);
        assert_eq!(canvas.get(1, 0).unwrap(), Color::WHITE);
        // the red corner no longer matches the seed color, so only the white
        // region connected to (1, 1) is repainted
        canvas.fill(1, 1, blue).unwrap();
        assert_eq!(canvas.get(0, 0).unwrap(), red);
        assert_eq!(canvas.get(1, 0).unwrap(), blue);
        assert_eq!(canvas.get(0, 1).unwrap(), blue);
        assert_eq!(canvas.get(1, 1).unwrap(), blue);
    }

    #[test]
    fn pick_does_not_mutate() {
        let mut canvas = Canvas::new(4, 4);
        let red = hex("FF0000");
        canvas.paint(2, 2, red).unwrap();
        let snapshot = canvas.grid().clone();
        assert_eq!(canvas.pick(2, 2).unwrap(), red);
        assert_eq!(canvas.pick(0, 0).unwrap(), Color::WHITE);
        assert_eq!(canvas.grid(), &snapshot);
    }

    #[test]
    fn zero_dimension_is_clamped() {
        let grid = PixelGrid::new(0, 5);
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 5);
        let mut grid = PixelGrid::new(4, 4);
        grid.resize(3, 0);
        assert_eq!((grid.width(), grid.height()), (3, 1));
    }

    #[test]
    fn oversized_dimensions_are_clamped() {
        let grid = PixelGrid::new(u32::MAX, u32::MAX);
        assert_eq!((grid.width(), grid.height()), (1, 1));
    }
}
