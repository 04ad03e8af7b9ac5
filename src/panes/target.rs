//! Target pane: read-only view of the last conversion result.

use eframe::egui;

use crate::log_info;
use crate::panes::StatusLine;
use crate::project::ProjectFile;

#[derive(Default)]
pub struct TargetPane {
    output: String,
}

impl TargetPane {
    pub fn init(&mut self) {
        self.output.clear();
    }

    pub fn set_output(&mut self, output: String) {
        self.output = output;
    }

    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }

    pub fn draw(
        &mut self,
        ui: &mut egui::Ui,
        project: &mut ProjectFile,
        status: &mut StatusLine,
        widget_id: i32,
    ) -> i32 {
        ui.push_id(widget_id, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.has_output(), egui::Button::new("Copy"))
                    .clicked()
                {
                    ui.output_mut(|o| o.copied_text = self.output.clone());
                    status.info("Converted shader copied to clipboard");
                }
                if ui
                    .add_enabled(self.has_output(), egui::Button::new("Export\u{2026}"))
                    .clicked()
                {
                    self.export(project, status);
                }
            });
            ui.separator();

            if self.output.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No output yet. Run Convert in the Optimizer pane.");
                });
            } else {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    // Read-only editor: a `&str` buffer cannot be mutated.
                    ui.add(
                        egui::TextEdit::multiline(&mut self.output.as_str())
                            .code_editor()
                            .desired_width(f32::INFINITY)
                            .desired_rows(24),
                    );
                });
            }
        });
        widget_id + 1
    }

    fn export(&self, project: &ProjectFile, status: &mut StatusLine) {
        let ext = project.language_target.extension();
        let mut dialog = rfd::FileDialog::new()
            .add_filter(project.language_target.label(), &[ext])
            .set_file_name(&format!("converted.{}", ext));
        if let Some(dir) = project.path.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        match std::fs::write(&path, &self.output) {
            Ok(()) => {
                log_info!("exported converted shader to {}", path.display());
                status.info(format!("Exported {}", path.display()));
            }
            Err(e) => {
                status.error(format!("Could not write {}: {}", path.display(), e));
            }
        }
    }
}
