use egui::{Pos2, Rect, Sense, Stroke, vec2};

use crate::canvas::Canvas;
use crate::cli::Args;
use crate::components::options::{OptionsAction, OptionsBar};
use crate::components::palette::{Palette, Tool};
use crate::io::{self, ExportFormat};
use crate::theme::Theme;

/// The editor: owns the one `Canvas` instance and hands references to the
/// collaborators (renderer, input dispatch, exporter). The canvas never
/// calls back into the UI.
pub struct PixelFeApp {
    canvas: Canvas,
    palette: Palette,
    options: OptionsBar,
    theme: Theme,
    /// Top-left anchor of the open palette popup, if any.
    palette_pos: Option<Pos2>,
    show_guide: bool,
    /// Preferred on-screen cell edge in points; shrinks to fit the window.
    cell_px: f32,
    /// One-line result of the last export, shown in the top bar.
    status: Option<String>,
}

impl PixelFeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, args: &Args) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        crate::log_info!("canvas initialised at {0}x{0}", args.size.max(1));

        Self {
            canvas: Canvas::new(args.size, args.size),
            palette: Palette::new(),
            options: OptionsBar,
            theme,
            palette_pos: None,
            show_guide: !args.no_guide,
            cell_px: args.cell_px.max(1.0),
            status: None,
        }
    }

    // ====================================================================
    // CANVAS — cell renderer + pointer dispatch
    // ====================================================================

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let cols = self.canvas.width();
        let rows = self.canvas.height();

        // Fit the grid into the panel, capped at the preferred cell size.
        let avail = ui.available_rect_before_wrap();
        let cell = (avail.width() / cols as f32)
            .min(avail.height() / rows as f32)
            .min(self.cell_px)
            .floor()
            .max(1.0);
        let rect = Rect::from_center_size(
            avail.center(),
            vec2(cell * cols as f32, cell * rows as f32),
        );
        let _ = ui.allocate_rect(rect, Sense::click_and_drag());

        // -- render: re-enumerate every cell -----------------------------
        let painter = ui.painter();
        for y in 0..rows {
            for x in 0..cols {
                let color = self.canvas.get(x, y).unwrap_or_default();
                let min = rect.min + vec2(x as f32 * cell, y as f32 * cell);
                painter.rect_filled(
                    Rect::from_min_size(min, vec2(cell, cell)),
                    0.0,
                    color.to_color32(),
                );
            }
        }
        let line = Stroke::new(1.0, self.theme.grid_line);
        for x in 0..=cols {
            let xpos = rect.min.x + x as f32 * cell;
            painter.line_segment([Pos2::new(xpos, rect.min.y), Pos2::new(xpos, rect.max.y)], line);
        }
        for y in 0..=rows {
            let ypos = rect.min.y + y as f32 * cell;
            painter.line_segment([Pos2::new(rect.min.x, ypos), Pos2::new(rect.max.x, ypos)], line);
        }

        // -- pointer state ------------------------------------------------
        let primary_pressed = ui.input(|i| i.pointer.primary_pressed());
        let primary_down = ui.input(|i| i.pointer.primary_down());
        let primary_released = ui.input(|i| i.pointer.primary_released());
        let secondary_pressed = ui.input(|i| i.pointer.secondary_pressed());
        let hover = ui.input(|i| i.pointer.hover_pos());
        // floating windows (palette popup, guide) sit above the canvas
        let over_ui = ui.ctx().is_pointer_over_area();
        let hovered_cell = match hover {
            Some(pos) if !over_ui && !self.show_guide => cell_at(rect, cell, cols, rows, pos),
            _ => None,
        };

        // outline the hovered cell in the paint color, and show the
        // active tool's cursor
        if let Some((x, y)) = hovered_cell {
            let min = rect.min + vec2(x as f32 * cell, y as f32 * cell);
            painter.rect_stroke(
                Rect::from_min_size(min, vec2(cell, cell)),
                0.0,
                Stroke::new(2.0, self.palette.color().to_color32()),
            );
            ui.ctx().output_mut(|o| o.cursor_icon = self.palette.tool().cursor_icon());
        }

        // -- dispatch -----------------------------------------------------
        if primary_pressed && let Some((x, y)) = hovered_cell {
            self.palette_pos = None; // painting closes the palette
            match self.palette.tool() {
                Tool::Brush => {
                    self.canvas.start_stroke();
                    if let Err(e) = self.canvas.paint(x, y, self.palette.color()) {
                        crate::log_warn!("paint rejected: {}", e);
                    }
                }
                Tool::Bucket => {
                    if let Err(e) = self.canvas.fill(x, y, self.palette.color()) {
                        crate::log_warn!("fill rejected: {}", e);
                    }
                }
                Tool::Eyedropper => {
                    match self.canvas.pick(x, y) {
                        Ok(color) => self.palette.set_color(color),
                        Err(e) => crate::log_warn!("pick rejected: {}", e),
                    }
                    // one pick, then back to the previous tool
                    self.palette.revert_tool();
                }
            }
        } else if primary_down
            && self.canvas.is_painting()
            && let Some((x, y)) = hovered_cell
            && let Err(e) = self.canvas.paint(x, y, self.palette.color())
        {
            crate::log_warn!("paint rejected: {}", e);
        }

        // release anywhere, or leaving the canvas, ends the stroke
        if primary_released || hovered_cell.is_none() {
            self.canvas.end_stroke();
        }

        if secondary_pressed
            && !self.show_guide
            && let Some(pos) = hover
            && rect.contains(pos)
        {
            self.palette_pos = Some(pos);
        }
    }

    // ====================================================================
    // FLOATING WINDOWS
    // ====================================================================

    fn show_palette_popup(&mut self, ctx: &egui::Context) {
        let Some(pos) = self.palette_pos else {
            return;
        };
        let mut action = None;
        egui::Window::new("palette")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .current_pos(pos)
            .frame(self.theme.floating_window_frame())
            .show(ctx, |ui| {
                action = self.palette.ui(ui, &self.theme);
            });
        if action.is_some() {
            self.palette_pos = None;
        }
    }

    fn show_guide_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_guide {
            return;
        }
        let mut understood = false;
        egui::Window::new("guide")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(self.theme.floating_window_frame())
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("PAINT AND INTERACT")
                            .strong()
                            .color(self.theme.text_color),
                    );
                    ui.label("left mouse button");
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("OPEN PALETTE AND TOOLS")
                            .strong()
                            .color(self.theme.text_color),
                    );
                    ui.label("right mouse button");
                    ui.add_space(12.0);
                    if ui.button("Understood!").clicked() {
                        understood = true;
                    }
                });
            });
        if understood {
            self.show_guide = false;
        }
    }

    // ====================================================================
    // EXPORT
    // ====================================================================

    fn handle_export(&mut self, format: ExportFormat) {
        let Some(path) = io::prompt_export_path(format) else {
            return; // dialog cancelled
        };
        match io::export_canvas(&self.canvas, &path, format) {
            Ok(()) => {
                crate::log_info!(
                    "exported {}x{} canvas to {}",
                    self.canvas.width(),
                    self.canvas.height(),
                    path.display()
                );
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                crate::log_err!("export failed: {}", e);
                self.status = Some(format!("Export failed: {}", e));
            }
        }
    }
}

impl eframe::App for PixelFeApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        let c = self.theme.canvas_bg;
        [
            c.r() as f32 / 255.0,
            c.g() as f32 / 255.0,
            c.b() as f32 / 255.0,
            1.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("options_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let current = (self.canvas.width(), self.canvas.height());
                if let Some(action) = self.options.show(ui, current) {
                    match action {
                        OptionsAction::Resize(size) => {
                            self.canvas.resize(size, size);
                            crate::log_info!("canvas resized to {0}x{0}", size);
                        }
                        OptionsAction::Export(format) => self.handle_export(format),
                    }
                }
                if let Some(status) = &self.status {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(status).small());
                    });
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.canvas_bg))
            .show(ctx, |ui| self.show_canvas(ui));

        self.show_palette_popup(ctx);
        self.show_guide_dialog(ctx);
    }
}

/// Map a screen position to grid coordinates, `None` outside the canvas.
fn cell_at(rect: Rect, cell: f32, cols: u32, rows: u32, pos: Pos2) -> Option<(u32, u32)> {
    if !rect.contains(pos) {
        return None;
    }
    let x = ((pos.x - rect.min.x) / cell).floor() as i64;
    let y = ((pos.y - rect.min.y) / cell).floor() as i64;
    if x < 0 || y < 0 || x >= cols as i64 || y >= rows as i64 {
        return None;
    }
    Some((x as u32, y as u32))
}
