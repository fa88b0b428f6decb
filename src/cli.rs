// ============================================================================
// PixelFE CLI — startup options
// ============================================================================
//
// There is no headless mode: the editor has nothing to load (no project
// files), so every flag here only shapes the GUI session being started.

use clap::Parser;

use crate::canvas::DEFAULT_SIZE;

/// PixelFE grid-based pixel-art editor.
#[derive(Parser, Debug)]
#[command(
    name = "pixelfe",
    about = "Tiny fixed-resolution pixel-art editor",
    long_about = "Paint a grid of cells with brush, bucket and eyedropper tools,\n\
                  then export the result once as PNG, JPG or GIF.\n\n\
                  Example:\n  \
                  pixelfe --size 16 --no-guide"
)]
pub struct Args {
    /// Initial square canvas size, in cells.
    #[arg(short, long, default_value_t = DEFAULT_SIZE, value_name = "CELLS")]
    pub size: u32,

    /// Preferred on-screen edge of one cell, in logical pixels.
    /// The canvas shrinks below this when the window is too small.
    #[arg(long, default_value_t = 48.0, value_name = "PX")]
    pub cell_px: f32,

    /// Skip the intro guide dialog.
    #[arg(long)]
    pub no_guide: bool,
}
