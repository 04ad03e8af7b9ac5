//! Application frame: menu bar, dock area, status bar, the unsaved-changes
//! confirmation workflow and config aggregation.

use eframe::egui;

use crate::commands::{Command, ConfirmChoice, ConfirmSlot, PendingConfirm, SaveAsEscalation};
use crate::config::AppConfig;
use crate::layout::LayoutManager;
use crate::logger;
use crate::panes::{OptimizerPane, PaneViewer, SourcePane, StatusLine, TargetPane};
use crate::project::ProjectFile;
use crate::theme::ThemeMode;

pub const APP_NAME: &str = "GlslOptimizer";

/// Widget-id counter base, restored at the top of every frame. Pane draws
/// consume and return the counter so repeated widgets keep distinct ids.
const WIDGET_ID_BASE: i32 = 4577;

pub struct GlslOptApp {
    project: ProjectFile,
    layout: LayoutManager,

    optimizer_pane: OptimizerPane,
    source_pane: SourcePane,
    target_pane: TargetPane,

    theme_mode: ThemeMode,
    status: StatusLine,
    show_about: bool,

    /// The (at most one) confirmation currently waiting for the user.
    confirm: ConfirmSlot,
    /// Quit resolved through Save As: close once the picker completes.
    close_after_save_as: bool,
    /// Quit was approved; let the next OS close request pass through.
    allow_close: bool,
}

impl GlslOptApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        config.theme_mode.apply(&cc.egui_ctx);

        let mut layout = LayoutManager::new();
        layout.init();
        layout.set_pane_set(config.panes);

        let mut app = Self {
            project: ProjectFile::default(),
            layout,
            optimizer_pane: OptimizerPane::default(),
            source_pane: SourcePane::default(),
            target_pane: TargetPane::default(),
            theme_mode: config.theme_mode,
            status: StatusLine::default(),
            show_about: false,
            confirm: ConfirmSlot::default(),
            close_after_save_as: false,
            allow_close: false,
        };
        app.optimizer_pane.init();
        app.source_pane.init();
        app.target_pane.init();
        app
    }

    /// Run `action` now, or park it behind the confirmation dialog when it
    /// would discard unsaved changes. The dialog does not block the menu bar,
    /// so a trigger arriving while a confirmation is already outstanding is
    /// refused rather than allowed to replace it.
    fn request_or_run(&mut self, ctx: &egui::Context, action: Command) {
        if self.confirm.is_pending() {
            return;
        }
        if self.project.is_loaded() && self.project.has_unsaved_changes() {
            self.confirm.raise(PendingConfirm::for_action(action));
        } else {
            self.execute(ctx, vec![action]);
        }
    }

    /// Interpret a resolved command batch front-to-back. A failed save aborts
    /// the remainder and escalates to the save-as picker, so a close or
    /// discard queued behind it never runs against an unsaved project.
    fn execute(&mut self, ctx: &egui::Context, batch: Vec<Command>) {
        let mut iter = batch.into_iter();
        while let Some(cmd) = iter.next() {
            match cmd {
                Command::Save => {
                    if !self.project.save() {
                        let rest: Vec<Command> = iter.collect();
                        let escalation = SaveAsEscalation::from_remaining(&rest);
                        self.status.error("Save failed, choose a location");
                        self.save_as_dialog(ctx, escalation.close_after_save);
                        return;
                    }
                    self.status.info("Project saved");
                }
                Command::SaveAs => {
                    let then_close = std::mem::take(&mut self.close_after_save_as);
                    self.save_as_dialog(ctx, then_close);
                }
                Command::NewProject => {
                    self.project.new_project(None);
                    self.target_pane.init();
                    self.status.info("New project");
                }
                Command::OpenProjectPicker => {
                    self.open_project_dialog();
                }
                Command::CloseProject => {
                    self.project.clear();
                    self.target_pane.init();
                    self.status.info("Project closed");
                }
                Command::CloseWindow => {
                    self.allow_close = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }

    fn open_project_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("GlslOptimizer project", &["glo"])
            .pick_file();
        let Some(path) = picked else {
            return;
        };
        if self.project.load_as(path.clone()) {
            self.target_pane.init();
            self.status.info(format!("Opened {}", path.display()));
        } else {
            self.status
                .error(format!("Could not open {}", path.display()));
        }
    }

    /// Blocking save-as picker. With `then_close`, a successful save also
    /// closes the window (quit resolved through Save As / a failed Save).
    fn save_as_dialog(&mut self, ctx: &egui::Context, then_close: bool) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("GlslOptimizer project", &["glo"])
            .set_file_name("project.glo");
        if let Some(dir) = self.project.path.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            // Cancelled: the quit (if any) is abandoned, the user keeps working.
            return;
        };

        if self.project.save_as(path.clone()) {
            self.status.info(format!("Saved {}", path.display()));
            if then_close {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        } else {
            self.status
                .error(format!("Could not save {}", path.display()));
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        let display_size = ctx.screen_rect().size();
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Project", |ui| {
                    if ui.button("New").clicked() {
                        ui.close_menu();
                        self.request_or_run(ctx, Command::NewProject);
                    }
                    if ui.button("Open\u{2026}").clicked() {
                        ui.close_menu();
                        self.request_or_run(ctx, Command::OpenProjectPicker);
                    }

                    if self.project.is_loaded() {
                        ui.separator();
                        if ui.button("Save").clicked() {
                            ui.close_menu();
                            if self.project.save() {
                                self.status.info("Project saved");
                            } else {
                                // Never saved or the write failed.
                                self.save_as_dialog(ctx, false);
                            }
                        }
                        if ui.button("Save As\u{2026}").clicked() {
                            ui.close_menu();
                            self.save_as_dialog(ctx, false);
                        }
                        ui.separator();
                        if ui.button("Close").clicked() {
                            ui.close_menu();
                            self.request_or_run(ctx, Command::CloseProject);
                        }
                    }

                    ui.separator();
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.show_about = true;
                    }
                    if ui.button("Quit").clicked() {
                        ui.close_menu();
                        self.request_quit(ctx);
                    }
                });

                self.layout.menu_ui(ui, display_size);

                ui.menu_button("Settings", |ui| {
                    ui.menu_button("Theme", |ui| {
                        for mode in [ThemeMode::Light, ThemeMode::Dark] {
                            if ui.radio(self.theme_mode == mode, mode.label()).clicked() {
                                self.theme_mode = mode;
                                mode.apply(ctx);
                                ui.close_menu();
                            }
                        }
                    });
                    if let Some(path) = logger::log_path() {
                        ui.separator();
                        ui.label(format!("Session log: {}", path.display()));
                    }
                });
            });
        });
    }

    fn request_quit(&mut self, ctx: &egui::Context) {
        if self.confirm.is_pending() {
            return;
        }
        if self.project.is_loaded() && self.project.has_unsaved_changes() {
            self.confirm.raise(PendingConfirm::for_quit());
        } else {
            self.allow_close = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.status.is_error {
                    ui.colored_label(ui.visuals().error_fg_color, &self.status.text);
                } else {
                    ui.label(&self.status.text);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(path) = &self.project.path {
                        ui.label(path.display().to_string());
                    }
                });
            });
        });
    }

    fn confirm_dialog(&mut self, ctx: &egui::Context) {
        if !self.confirm.is_pending() {
            return;
        }

        let mut choice = None;
        egui::Window::new("Unsaved Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("The project has unsaved changes.");
                ui.label("Do you want to save before continuing?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        choice = Some(ConfirmChoice::Save);
                    }
                    if ui.button("Save As\u{2026}").clicked() {
                        choice = Some(ConfirmChoice::SaveAs);
                    }
                    if ui.button("Continue without saving").clicked() {
                        choice = Some(ConfirmChoice::Discard);
                    }
                    if ui.button("Cancel").clicked() {
                        choice = Some(ConfirmChoice::Cancel);
                    }
                });
            });

        if let Some(choice) = choice {
            if let Some(pending) = self.confirm.take() {
                if choice == ConfirmChoice::SaveAs && pending.quit_requested {
                    self.close_after_save_as = true;
                }
                let batch = pending.resolve(choice);
                self.execute(ctx, batch);
            }
        }
    }

    fn about_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_about {
            return;
        }
        let mut open = self.show_about;
        egui::Window::new("About GlslOptimizer")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("GlslOptimizer {}", env!("CARGO_PKG_VERSION")));
                ui.label("Convert and optimize GLSL shaders.");
                ui.separator();
                ui.label("Built with:");
                ui.hyperlink_to("egui / eframe", "https://github.com/emilk/egui");
                ui.hyperlink_to("egui_dock", "https://github.com/Adanos020/egui_dock");
                ui.hyperlink_to("naga", "https://github.com/gfx-rs/wgpu");
                ui.hyperlink_to("rfd", "https://github.com/PolyMeilex/rfd");
            });
        self.show_about = open;
    }

    fn window_title(&self) -> String {
        match self.project.file_stem() {
            Some(stem) => {
                let dirty = if self.project.has_unsaved_changes() { "*" } else { "" };
                format!("{} {} - {}{}", APP_NAME, env!("CARGO_PKG_VERSION"), stem, dirty)
            }
            None if self.project.is_loaded() => {
                let dirty = if self.project.has_unsaved_changes() { "*" } else { "" };
                format!("{} {} - untitled{}", APP_NAME, env!("CARGO_PKG_VERSION"), dirty)
            }
            None => format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION")),
        }
    }
}

impl eframe::App for GlslOptApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));

        // Intercept the OS close button while unsaved changes exist.
        if ctx.input(|i| i.viewport().close_requested())
            && !self.allow_close
            && self.project.is_loaded()
            && self.project.has_unsaved_changes()
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirm.raise(PendingConfirm::for_quit());
        }

        self.menu_bar(ctx);
        self.status_bar(ctx);

        // Dock area takes whatever the panels left over.
        self.layout.sync_visibility();
        let mut widget_id = WIDGET_ID_BASE;
        let mut viewer = PaneViewer {
            project: &mut self.project,
            optimizer: &mut self.optimizer_pane,
            source: &mut self.source_pane,
            target: &mut self.target_pane,
            status: &mut self.status,
            widget_id: &mut widget_id,
        };
        self.layout.show(ctx, &mut viewer);

        self.confirm_dialog(ctx);
        self.about_dialog(ctx);

        self.layout.init_after_first_display(ctx.screen_rect().size());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let config = AppConfig {
            theme_mode: self.theme_mode,
            panes: self.layout.pane_set(),
        };
        config.save();
        self.layout.save_layout();
    }
}
