//! Optimizer pane: conversion settings plus the Convert action.

use eframe::egui;

use crate::convert::{self, ApiTarget, LanguageTarget, ShaderStage};
use crate::log_err;
use crate::panes::{StatusLine, TargetPane};
use crate::project::ProjectFile;

#[derive(Default)]
pub struct OptimizerPane;

impl OptimizerPane {
    pub fn init(&mut self) {}

    pub fn draw(
        &mut self,
        ui: &mut egui::Ui,
        project: &mut ProjectFile,
        target: &mut TargetPane,
        status: &mut StatusLine,
        widget_id: i32,
    ) -> i32 {
        ui.push_id(widget_id, |ui| {
            ui.heading("Conversion");
            ui.add_space(4.0);

            let mut changed = false;

            egui::ComboBox::from_label("Shader stage")
                .selected_text(project.shader_stage.label())
                .show_ui(ui, |ui| {
                    for stage in ShaderStage::ALL {
                        changed |= ui
                            .selectable_value(&mut project.shader_stage, *stage, stage.label())
                            .changed();
                    }
                });

            egui::ComboBox::from_label("Language target")
                .selected_text(project.language_target.label())
                .show_ui(ui, |ui| {
                    for lang in LanguageTarget::ALL {
                        changed |= ui
                            .selectable_value(&mut project.language_target, *lang, lang.label())
                            .changed();
                    }
                });

            // The API target only matters when emitting GLSL.
            ui.add_enabled_ui(project.language_target == LanguageTarget::Glsl, |ui| {
                egui::ComboBox::from_label("API target")
                    .selected_text(project.api_target.label())
                    .show_ui(ui, |ui| {
                        for api in ApiTarget::ALL {
                            changed |= ui
                                .selectable_value(&mut project.api_target, *api, api.label())
                                .changed();
                        }
                    });
            });

            ui.add_space(8.0);
            ui.heading("Optimization");
            ui.add_space(4.0);

            changed |= ui
                .checkbox(&mut project.options.keep_unused, "Keep unused items")
                .changed();
            ui.add_enabled_ui(project.language_target == LanguageTarget::Wgsl, |ui| {
                changed |= ui
                    .checkbox(&mut project.options.explicit_types, "Explicit types")
                    .changed();
            });
            ui.add_enabled_ui(project.shader_stage == ShaderStage::Compute, |ui| {
                changed |= ui
                    .checkbox(
                        &mut project.options.zero_init_workgroup,
                        "Zero-init workgroup memory",
                    )
                    .changed();
            });

            if changed {
                project.set_project_change(true);
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            let can_convert = !project.source.trim().is_empty();
            if ui
                .add_enabled(
                    can_convert,
                    egui::Button::new("Convert").min_size(egui::vec2(120.0, 28.0)),
                )
                .clicked()
            {
                self.run_convert(project, target, status);
            }
            if !can_convert {
                ui.label("Source pane is empty.");
            }
        });
        widget_id + 1
    }

    fn run_convert(
        &mut self,
        project: &ProjectFile,
        target: &mut TargetPane,
        status: &mut StatusLine,
    ) {
        match convert::convert(
            &project.source,
            project.shader_stage,
            project.api_target,
            project.language_target,
            &project.options,
        ) {
            Ok(output) => {
                status.info(format!(
                    "Converted to {} ({} lines)",
                    project.language_target.label(),
                    output.lines().count()
                ));
                target.set_output(output);
            }
            Err(e) => {
                log_err!("conversion failed: {:#}", e);
                status.error(format!("Conversion failed: {:#}", e));
            }
        }
    }
}
