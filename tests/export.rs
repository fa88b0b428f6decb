use pixelfe::canvas::{Canvas, Color};
use pixelfe::io::{ExportFormat, encode_and_write, export_canvas};

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap()
}

/// The export buffer is row-major RGBA with alpha forced to 255.
#[test]
fn rgba_buffer_layout() {
    let mut canvas = Canvas::new(2, 2);
    canvas.paint(1, 0, hex("FF0000")).unwrap();
    canvas.paint(0, 1, hex("0000FF")).unwrap();

    let img = canvas.to_rgba_image();
    assert_eq!((img.width(), img.height()), (2, 2));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(0, 1).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);

    // flat buffer order: (0,0) (1,0) (0,1) (1,1)
    assert_eq!(
        img.as_raw(),
        &[
            255, 255, 255, 255, 255, 0, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ]
    );
}

/// PNG round-trips losslessly through the encoder.
#[test]
fn png_export_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixelart.png");

    let mut canvas = Canvas::new(4, 4);
    canvas.fill(0, 0, hex("336699")).unwrap();
    canvas.paint(2, 1, hex("FF8000")).unwrap();
    export_canvas(&canvas, &path, ExportFormat::Png).unwrap();

    let decoded = image::open(&path).unwrap().into_rgba8();
    assert_eq!((decoded.width(), decoded.height()), (4, 4));
    assert_eq!(decoded.get_pixel(0, 0).0, [0x33, 0x66, 0x99, 255]);
    assert_eq!(decoded.get_pixel(2, 1).0, [0xFF, 0x80, 0x00, 255]);
}

/// JPEG and GIF exports produce non-empty files at the expected paths.
#[test]
fn jpeg_and_gif_exports_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut canvas = Canvas::new(8, 8);
    canvas.fill(0, 0, hex("FF0000")).unwrap();
    let img = canvas.to_rgba_image();

    for format in [ExportFormat::Jpeg, ExportFormat::Gif] {
        let path = dir.path().join(format.default_file_name());
        encode_and_write(&img, &path, format).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0, "{:?} export is empty", format);
    }
}

/// GIF export keeps exact colors for art with fewer than 256 distinct colors.
#[test]
fn gif_export_preserves_a_small_palette() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixelart.gif");

    let mut canvas = Canvas::new(2, 1);
    canvas.paint(0, 0, hex("FF0000")).unwrap();
    encode_and_write(&canvas.to_rgba_image(), &path, ExportFormat::Gif).unwrap();

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(std::fs::File::open(&path).unwrap()).unwrap();
    let frame = decoder.read_next_frame().unwrap().unwrap();
    assert_eq!(&frame.buffer[0..4], &[255, 0, 0, 255]);
    assert_eq!(&frame.buffer[4..8], &[255, 255, 255, 255]);
}

/// Export reflects the grid as it is at call time — after a resize the
/// image has the new dimensions.
#[test]
fn export_tracks_the_current_dimensions() {
    let mut canvas = Canvas::new(8, 8);
    canvas.resize(12, 16);
    let img = canvas.to_rgba_image();
    assert_eq!((img.width(), img.height()), (12, 16));
}
