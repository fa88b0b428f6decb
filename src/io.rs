//! One-shot raster export of the canvas.
//!
//! The canvas flattens itself to a row-major RGBA8 buffer
//! (`Canvas::to_rgba_image`); this module only encodes that buffer to disk.
//! Nothing is ever read back — the editor has no project files.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};

use crate::canvas::Canvas;

/// JPEG quality for exports. Flat-color art stays crisp at 90.
const JPEG_QUALITY: u8 = 90;

// ============================================================================
// EXPORT FORMATS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Gif,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Gif]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Gif => "gif",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPG",
            ExportFormat::Gif => "GIF",
        }
    }

    /// Default file name offered in the save dialog.
    pub fn default_file_name(&self) -> String {
        format!("pixelart.{}", self.extension())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Image(image::ImageError),
    Gif(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Image(e) => write!(f, "image encode error: {}", e),
            ExportError::Gif(msg) => write!(f, "GIF encode error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

// ============================================================================
// ENCODING
// ============================================================================

/// Ask the user where to save, seeded with the stock `pixelart.<ext>` name.
/// `None` when the dialog is cancelled.
pub fn prompt_export_path(format: ExportFormat) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(format.label(), &[format.extension()])
        .set_file_name(format.default_file_name())
        .save_file()
}

/// Flatten the canvas and write it to `path` in the chosen format.
pub fn export_canvas(
    canvas: &Canvas,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    encode_and_write(&canvas.to_rgba_image(), path, format)
}

pub fn encode_and_write(
    image: &RgbaImage,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Png => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            let encoder = PngEncoder::new(&mut writer);
            #[allow(deprecated)]
            encoder.encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel; the canvas is always fully opaque
            let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            encoder.encode(
                rgb_image.as_raw(),
                rgb_image.width(),
                rgb_image.height(),
                image::ColorType::Rgb8,
            )?;
        }
        ExportFormat::Gif => {
            encode_static_gif(image, path)?;
        }
    }

    Ok(())
}

/// Single-frame GIF with an indexed palette.
fn encode_static_gif(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    if image.width() > u16::MAX as u32 || image.height() > u16::MAX as u32 {
        return Err(ExportError::Gif(
            "image dimensions exceed GIF maximum (65535×65535)".to_string(),
        ));
    }
    let (w, h) = (image.width() as u16, image.height() as u16);
    let file = File::create(path)?;

    let (palette, indexed) = quantize_rgba(image);

    let mut encoder = gif::Encoder::new(BufWriter::new(file), w, h, &palette)
        .map_err(|e| ExportError::Gif(e.to_string()))?;

    let frame = gif::Frame {
        width: w,
        height: h,
        buffer: std::borrow::Cow::Borrowed(&indexed),
        ..Default::default()
    };
    encoder
        .write_frame(&frame)
        .map_err(|e| ExportError::Gif(e.to_string()))?;

    Ok(())
}

/// Build a GIF palette and per-pixel index buffer.
///
/// Cell art rarely uses more than a handful of colors, so the exact palette
/// path almost always wins; NeuQuant reduction only kicks in past 256
/// distinct colors.
fn quantize_rgba(image: &RgbaImage) -> (Vec<u8>, Vec<u8>) {
    use std::collections::HashMap;

    let npixels = (image.width() * image.height()) as usize;
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut palette: Vec<u8> = Vec::new();
    let mut indices: Vec<u8> = Vec::with_capacity(npixels);

    for p in image.pixels() {
        let key = [p[0], p[1], p[2]];
        match lookup.get(&key) {
            Some(&idx) => indices.push(idx),
            None => {
                if lookup.len() == 256 {
                    return quantize_rgba_neuquant(image, 256);
                }
                let idx = lookup.len() as u8;
                lookup.insert(key, idx);
                palette.extend_from_slice(&key);
                indices.push(idx);
            }
        }
    }

    (palette, indices)
}

fn quantize_rgba_neuquant(image: &RgbaImage, max_colors: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2], p[3]])
        .collect();

    let nq = color_quant::NeuQuant::new(10, max_colors, &pixels);

    let mut palette = Vec::with_capacity(max_colors * 3);
    for i in 0..max_colors {
        if let Some(color) = nq.lookup(i) {
            palette.push(color[0]);
            palette.push(color[1]);
            palette.push(color[2]);
        } else {
            palette.push(0);
            palette.push(0);
            palette.push(0);
        }
    }

    let npixels = (image.width() * image.height()) as usize;
    let mut indices = Vec::with_capacity(npixels);
    for p in image.pixels() {
        indices.push(nq.index_of(&[p[0], p[1], p[2], p[3]]) as u8);
    }

    (palette, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;

    #[test]
    fn quantize_builds_an_exact_palette_for_few_colors() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set(0, 0, Color::new(255, 0, 0)).unwrap();
        let (palette, indices) = quantize_rgba(&canvas.to_rgba_image());
        // two distinct colors → six palette bytes, four indices
        assert_eq!(palette.len(), 6);
        assert_eq!(indices.len(), 4);
        // every index points at the pixel's own color
        let img = canvas.to_rgba_image();
        for (p, &idx) in img.pixels().zip(indices.iter()) {
            let base = idx as usize * 3;
            assert_eq!(&palette[base..base + 3], &[p[0], p[1], p[2]]);
        }
    }

    #[test]
    fn default_file_names_follow_the_extension() {
        assert_eq!(ExportFormat::Png.default_file_name(), "pixelart.png");
        assert_eq!(ExportFormat::Jpeg.default_file_name(), "pixelart.jpg");
        assert_eq!(ExportFormat::Gif.default_file_name(), "pixelart.gif");
    }
}
