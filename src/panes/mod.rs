//! The three pane collaborators and the dock-tab viewer that routes drawing
//! to them.
//!
//! Each pane consumes a widget-id counter and returns the advanced value; the
//! application frame resets the counter to a fixed base every frame so widget
//! identities stay stable across frames.

pub mod optimizer;
pub mod source;
pub mod target;

pub use optimizer::OptimizerPane;
pub use source::SourcePane;
pub use target::TargetPane;

use eframe::egui;
use egui_dock::TabViewer;

use crate::layout::Pane;
use crate::project::ProjectFile;

/// Status-bar message, set by panes and menu handlers, drawn by the frame.
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.is_error = false;
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.is_error = true;
    }
}

/// Borrows everything a pane may touch for one frame.
pub struct PaneViewer<'a> {
    pub project: &'a mut ProjectFile,
    pub optimizer: &'a mut OptimizerPane,
    pub source: &'a mut SourcePane,
    pub target: &'a mut TargetPane,
    pub status: &'a mut StatusLine,
    pub widget_id: &'a mut i32,
}

impl TabViewer for PaneViewer<'_> {
    type Tab = Pane;

    fn title(&mut self, tab: &mut Pane) -> egui::WidgetText {
        tab.title().into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Pane) {
        if !self.project.is_loaded() {
            ui.centered_and_justified(|ui| {
                ui.label("No project loaded. Use Project \u{25b8} New or Open.");
            });
            return;
        }

        *self.widget_id = match tab {
            Pane::Source => self.source.draw(ui, self.project, self.status, *self.widget_id),
            Pane::Target => self.target.draw(ui, self.project, self.status, *self.widget_id),
            Pane::Optimizer => self.optimizer.draw(
                ui,
                self.project,
                self.target,
                self.status,
                *self.widget_id,
            ),
        };
    }

    // Pane visibility is driven from the Layout menu, not tab close buttons.
    fn closeable(&mut self, _tab: &mut Pane) -> bool {
        false
    }
}
