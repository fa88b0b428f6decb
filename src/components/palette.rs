//! The right-click palette: color swatches, the three painting tools, and a
//! hex input row.

use egui::{Sense, Stroke, TextStyle, vec2};

use crate::canvas::Color;
use crate::theme::Theme;

/// Painting tool selected from the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    /// Per-cell painting; keeps painting while the pointer is dragged.
    #[default]
    Brush,
    /// Flood fill of the clicked cell's connected color region.
    Bucket,
    /// Pick the clicked cell's color as the paint color.
    Eyedropper,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "Brush",
            Tool::Bucket => "Bucket",
            Tool::Eyedropper => "Eyedropper",
        }
    }

    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            Tool::Brush => egui::CursorIcon::Crosshair,
            Tool::Bucket => egui::CursorIcon::PointingHand,
            Tool::Eyedropper => egui::CursorIcon::Copy,
        }
    }
}

/// One entry in the palette layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteSlot {
    Color(Color),
    Tool(Tool),
}

const fn c(r: u8, g: u8, b: u8) -> PaletteSlot {
    PaletteSlot::Color(Color::new(r, g, b))
}

/// The stock 18-color diamond with the tools in the middle row.
const DEFAULT_LAYOUT: &[&[PaletteSlot]] = &[
    &[c(0x00, 0xFF, 0xFF), c(0x00, 0x80, 0xFF), c(0x00, 0x00, 0xFF)],
    &[
        c(0x00, 0xFF, 0x80),
        c(0xFF, 0xFF, 0xFF),
        c(0x00, 0x00, 0x00),
        c(0x80, 0x00, 0xFF),
    ],
    &[
        c(0x00, 0xFF, 0x00),
        PaletteSlot::Tool(Tool::Brush),
        PaletteSlot::Tool(Tool::Eyedropper),
        PaletteSlot::Tool(Tool::Bucket),
        c(0xFF, 0x00, 0xFF),
    ],
    &[
        c(0x80, 0xFF, 0x00),
        c(0xAA, 0xAA, 0xAA),
        c(0x55, 0x55, 0x55),
        c(0xFF, 0x00, 0x80),
    ],
    &[c(0xFF, 0xFF, 0x00), c(0xFF, 0x80, 0x00), c(0xFF, 0x00, 0x00)],
];

/// Swatch edge in points.
const SWATCH: f32 = 28.0;

/// What the user picked from the popup; the app closes it on either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteAction {
    PickedColor(Color),
    PickedTool(Tool),
}

/// Current paint color and active tool, plus the previous tool so the
/// eyedropper can hand control back after one pick.
pub struct Palette {
    color: Color,
    tool: Tool,
    prev_tool: Tool,
    hex_input: String,
}

impl Palette {
    pub fn new() -> Self {
        let color = Color::BLACK;
        Self {
            color,
            tool: Tool::Brush,
            prev_tool: Tool::Brush,
            hex_input: color.hex(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.hex_input = color.hex();
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.prev_tool = self.tool;
        self.tool = tool;
    }

    /// Switch back to the tool that was active before the last `set_tool`.
    /// The eyedropper calls this after one pick.
    pub fn revert_tool(&mut self) {
        self.tool = self.prev_tool;
    }

    // ====================================================================
    // WIDGET: popup body
    // ====================================================================

    pub fn ui(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<PaletteAction> {
        let mut action = None;

        for row in DEFAULT_LAYOUT {
            ui.horizontal(|ui| {
                for slot in *row {
                    match slot {
                        PaletteSlot::Color(color) => {
                            if self.color_swatch(ui, theme, *color) {
                                action = Some(PaletteAction::PickedColor(*color));
                            }
                        }
                        PaletteSlot::Tool(tool) => {
                            let selected = *tool == self.tool;
                            if ui.selectable_label(selected, tool.label()).clicked() {
                                action = Some(PaletteAction::PickedTool(*tool));
                            }
                        }
                    }
                }
            });
        }

        ui.add_space(4.0);
        self.hex_row(ui);

        match action {
            Some(PaletteAction::PickedColor(color)) => self.set_color(color),
            Some(PaletteAction::PickedTool(tool)) => self.set_tool(tool),
            None => {}
        }
        action
    }

    fn color_swatch(&self, ui: &mut egui::Ui, theme: &Theme, color: Color) -> bool {
        let (rect, resp) = ui.allocate_exact_size(vec2(SWATCH, SWATCH), Sense::click());
        if ui.is_rect_visible(rect) {
            let p = ui.painter();
            p.rect_filled(rect, 3.0, color.to_color32());
            if color == self.color {
                p.rect_stroke(rect, 3.0, Stroke::new(2.0, theme.selection_outline));
            } else {
                p.rect_stroke(rect, 3.0, Stroke::new(1.0, theme.grid_line));
            }
        }
        let resp = resp.on_hover_text(color.to_string());
        resp.clicked()
    }

    // ====================================================================
    // WIDGET: Hex input row
    // ====================================================================

    fn hex_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("#").monospace().strong());
            let resp = ui.add_sized(
                [58.0, 18.0],
                egui::TextEdit::singleline(&mut self.hex_input).font(TextStyle::Monospace),
            );
            // a failed parse leaves the current color untouched
            if resp.changed()
                && let Ok(color) = Color::from_hex(&self.hex_input)
            {
                self.color = color;
            }
            if resp.lost_focus() {
                // snap the buffer back to whatever actually applied
                self.hex_input = self.color.hex();
            }
        });
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
