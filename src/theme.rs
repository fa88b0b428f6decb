//! UI palette for the editor chrome. Cell colors live in the canvas; this is
//! only the surrounding panels, popups and overlays.

use egui::{Color32, Stroke};

#[derive(Clone)]
pub struct Theme {
    pub text_color: Color32,
    pub panel_fill: Color32,
    pub canvas_bg: Color32,
    /// Hairline between cells.
    pub grid_line: Color32,
    /// Outline around the selected palette entry / active tool.
    pub selection_outline: Color32,
    pub window_stroke: Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            text_color: Color32::from_gray(220),
            panel_fill: Color32::from_gray(28),
            canvas_bg: Color32::from_gray(18),
            grid_line: Color32::from_gray(70),
            selection_outline: Color32::from_rgb(255, 180, 40),
            window_stroke: Color32::from_gray(60),
        }
    }

    /// Frame for floating windows (palette popup, intro guide).
    pub fn floating_window_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.panel_fill)
            .stroke(Stroke::new(1.0, self.window_stroke))
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(egui::Margin::same(10.0))
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.panel_fill;
        visuals.override_text_color = Some(self.text_color);
        ctx.set_visuals(visuals);
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
