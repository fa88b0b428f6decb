//! Top-bar options: canvas size presets and the export menu.

use crate::io::ExportFormat;

/// Square resize presets offered by the size buttons. The canvas itself
/// accepts arbitrary rectangles; these are just the curated choices.
pub const GRID_SIZES: [u32; 4] = [8, 12, 16, 32];

/// Action requested from the options bar, applied by the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionsAction {
    Resize(u32),
    Export(ExportFormat),
}

#[derive(Default)]
pub struct OptionsBar;

impl OptionsBar {
    /// Returns the action the user clicked this frame, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, current: (u32, u32)) -> Option<OptionsAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            ui.menu_button("Download as…", |ui| {
                for format in ExportFormat::all() {
                    if ui.button(format.label()).clicked() {
                        action = Some(OptionsAction::Export(*format));
                        ui.close_menu();
                    }
                }
            });

            ui.separator();

            // largest first, matching the long-standing button order
            for &size in GRID_SIZES.iter().rev() {
                let selected = current == (size, size);
                let resp = ui
                    .selectable_label(selected, format!("{0}×{0}", size))
                    .on_hover_text(format!("Size {0}x{0}", size));
                if resp.clicked() {
                    action = Some(OptionsAction::Resize(size));
                }
            }
        });
        action
    }
}
