//! Source pane: the GLSL editor.

use std::path::PathBuf;

use eframe::egui;

use crate::log_info;
use crate::panes::StatusLine;
use crate::project::ProjectFile;

#[derive(Default)]
pub struct SourcePane {
    /// Directory of the last imported shader, reused as the picker default.
    last_import_dir: Option<PathBuf>,
}

impl SourcePane {
    pub fn init(&mut self) {
        self.last_import_dir = None;
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
                if ui.button("Import Shader File\u{2026}").clicked() {
                    self.import_shader(project, status);
                }
                ui.label(format!("{} lines", project.source.lines().count()));
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(&mut project.source)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(24),
                );
                if response.changed() {
                    project.set_project_change(true);
                }
            });
        });
        widget_id + 1
    }

    fn import_shader(&mut self, project: &mut ProjectFile, status: &mut StatusLine) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("GLSL shaders", &["glsl", "vert", "frag", "comp"])
            .add_filter("All files", &["*"]);
        if let Some(dir) = &self.last_import_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                project.source = text;
                project.set_project_change(true);
                self.last_import_dir = path.parent().map(|p| p.to_path_buf());
                log_info!("imported shader source from {}", path.display());
                status.info(format!("Imported {}", path.display()));
            }
            Err(e) => {
                status.error(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }
}
