//! Docking layout manager: which panes exist, where they are docked, and the
//! one-shot startup sequence (default layout on first run, then initial focus
//! on the Source pane).
//!
//! The pane-visibility bitmask is the persisted record of "the user asked to
//! show this pane"; whether a pane is visible *right now* is always answered
//! by a live query against the dock tree ([`LayoutManager::is_pane_active`]).

use eframe::egui;
use egui_dock::{DockArea, DockState, Node, NodeIndex, Style, SurfaceIndex, TabViewer};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::{log_err, log_info, log_warn};

/// Width in points reserved for the Optimizer pane in the default layout.
const OPTIMIZER_PANE_WIDTH: f32 = 350.0;

/// The three functional panes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pane {
    Optimizer,
    Source,
    Target,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Optimizer, Pane::Source, Pane::Target];

    pub fn title(&self) -> &'static str {
        match self {
            Pane::Optimizer => "Optimizer",
            Pane::Source => "Source",
            Pane::Target => "Target",
        }
    }

    /// Stable bit used in the persisted `<panes value="N"/>` fragment.
    /// These values are part of the config file format.
    pub fn bit(&self) -> u32 {
        match self {
            Pane::Optimizer => 1 << 1,
            Pane::Source => 1 << 2,
            Pane::Target => 1 << 3,
        }
    }
}

/// Set of panes, stored as the persisted bitmask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneSet(u32);

impl Default for PaneSet {
    fn default() -> Self {
        Self::all()
    }
}

impl PaneSet {
    const VALID_BITS: u32 = (1 << 1) | (1 << 2) | (1 << 3);

    pub fn all() -> Self {
        Self(Self::VALID_BITS)
    }

    /// Unknown bits are dropped; only the three pane bits are meaningful.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::VALID_BITS)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, pane: Pane) -> bool {
        self.0 & pane.bit() != 0
    }

    pub fn insert(&mut self, pane: Pane) {
        self.0 |= pane.bit();
    }

    pub fn toggle(&mut self, pane: Pane) {
        self.0 ^= pane.bit();
    }
}

/// Startup lifecycle, advanced once per frame by the application frame after
/// the first display. Replaces a pair of "first time?" booleans so the draw
/// code never mutates lifecycle state itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    LayoutApplied,
    Ready,
}

pub struct LayoutManager {
    dock: DockState<Pane>,
    pane_shown: PaneSet,
    lifecycle: Lifecycle,
    /// No persisted layout existed at init; build the default on first display.
    needs_default_layout: bool,
    /// Leaf each hidden pane last lived in, so a re-shown pane returns to its
    /// old spot when that leaf still exists.
    remembered: Vec<(Pane, NodeIndex)>,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutManager {
    pub fn new() -> Self {
        Self {
            dock: Self::default_tree(egui::vec2(1280.0, 720.0)),
            pane_shown: PaneSet::all(),
            lifecycle: Lifecycle::Uninitialized,
            needs_default_layout: false,
            remembered: Vec::new(),
        }
    }

    /// Restore the persisted dock layout, or mark that the default one must be
    /// built once the display size is known. A missing layout file is the
    /// normal first-run case, not an error.
    pub fn init(&mut self) {
        self.init_from(Self::load_persisted_layout());
    }

    pub(crate) fn init_from(&mut self, persisted: Option<DockState<Pane>>) {
        match persisted {
            Some(dock) => {
                self.dock = dock;
                self.needs_default_layout = false;
            }
            None => {
                self.needs_default_layout = true;
            }
        }
    }

    /// One lifecycle step per frame, called after the dock area has been drawn
    /// at least once. The default-layout build and the initial Source focus
    /// each happen exactly once per process, no matter how often this runs.
    pub fn init_after_first_display(&mut self, size: egui::Vec2) {
        match self.lifecycle {
            Lifecycle::Uninitialized => {
                if self.needs_default_layout {
                    self.apply_default_layout(size);
                    self.needs_default_layout = false;
                }
                self.lifecycle = Lifecycle::LayoutApplied;
            }
            Lifecycle::LayoutApplied => {
                self.show_and_focus(Pane::Source);
                self.lifecycle = Lifecycle::Ready;
            }
            Lifecycle::Ready => {}
        }
    }

    /// Throw away the current arrangement and rebuild the stock layout:
    /// fixed-width Optimizer on the left, the rest split evenly into Source
    /// (center) and Target (right). All panes become visible and Source gets
    /// focus. Reachable from the Layout menu at any time.
    pub fn apply_default_layout(&mut self, size: egui::Vec2) {
        self.dock = Self::default_tree(size);
        self.pane_shown = PaneSet::all();
        self.remembered.clear();
        self.show_and_focus(Pane::Source);
        log_info!("dock layout reset to default");
    }

    fn default_tree(size: egui::Vec2) -> DockState<Pane> {
        let left_fraction = (OPTIMIZER_PANE_WIDTH / size.x.max(1.0)).clamp(0.1, 0.5);

        let mut dock = DockState::new(vec![Pane::Source]);
        let surface = dock.main_surface_mut();
        let [center, _left] =
            surface.split_left(NodeIndex::root(), left_fraction, vec![Pane::Optimizer]);
        surface.split_right(center, 0.5, vec![Pane::Target]);
        dock
    }

    /// The "Layout" entry of the menu bar: reset action plus one independent
    /// visibility toggle per pane.
    pub fn menu_ui(&mut self, ui: &mut egui::Ui, size: egui::Vec2) {
        ui.menu_button("Layout", |ui| {
            if ui.button("Default Layout").clicked() {
                self.apply_default_layout(size);
                ui.close_menu();
            }

            ui.separator();

            for pane in Pane::ALL {
                let mut shown = self.pane_shown.contains(pane);
                if ui
                    .checkbox(&mut shown, format!("Show/Hide {} Pane", pane.title()))
                    .clicked()
                {
                    self.pane_shown.toggle(pane);
                }
            }
        });
    }

    /// Reconcile the dock tree with the visibility bitmask: hidden panes lose
    /// their tab, re-shown panes get it back: at the remembered leaf when it
    /// still exists, otherwise wherever focus currently is.
    pub fn sync_visibility(&mut self) {
        for pane in Pane::ALL {
            let shown = self.pane_shown.contains(pane);
            match (shown, self.dock.find_tab(&pane)) {
                (false, Some((surface, node, tab))) => {
                    if surface == SurfaceIndex::main() {
                        self.remembered.retain(|(p, _)| *p != pane);
                        self.remembered.push((pane, node));
                    }
                    self.dock.remove_tab((surface, node, tab));
                }
                (true, None) => {
                    self.restore_pane(pane);
                }
                _ => {}
            }
        }
    }

    fn restore_pane(&mut self, pane: Pane) {
        let remembered = self
            .remembered
            .iter()
            .find(|(p, _)| *p == pane)
            .map(|(_, node)| *node);
        self.remembered.retain(|(p, _)| *p != pane);

        if let Some(node) = remembered {
            if self.is_live_leaf(node) {
                self.dock
                    .set_focused_node_and_surface((SurfaceIndex::main(), node));
            }
        }
        self.dock.push_to_focused_leaf(pane);
    }

    fn is_live_leaf(&self, node: NodeIndex) -> bool {
        let tree = self.dock.main_surface();
        node.0 < tree.len() && matches!(tree[node], Node::Leaf { .. })
    }

    /// Mark the pane as shown and make it the active, focused tab of its leaf.
    pub fn show_and_focus(&mut self, pane: Pane) {
        self.pane_shown.insert(pane);
        match self.dock.find_tab(&pane) {
            Some(location) => {
                self.dock.set_active_tab(location);
                self.dock
                    .set_focused_node_and_surface((location.0, location.1));
            }
            None => {
                // Tab was hidden or never docked; a pushed tab becomes active.
                self.dock.push_to_focused_leaf(pane);
            }
        }
    }

    /// Live query: is this pane the visible tab of its dock leaf right now?
    /// This intentionally ignores the cached bitmask.
    pub fn is_pane_active(&self, pane: Pane) -> bool {
        let Some((surface, node, tab)) = self.dock.find_tab(&pane) else {
            return false;
        };
        if surface != SurfaceIndex::main() {
            // Floating windows have no competing tabs.
            return true;
        }
        match &self.dock.main_surface()[node] {
            Node::Leaf { active, .. } => *active == tab,
            _ => false,
        }
    }

    /// Draw the dock area. Must run after the menu/status panels so it takes
    /// the remaining space.
    pub fn show(&mut self, ctx: &egui::Context, viewer: &mut impl TabViewer<Tab = Pane>) {
        DockArea::new(&mut self.dock)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(ctx, viewer);
    }

    pub fn pane_set(&self) -> PaneSet {
        self.pane_shown
    }

    pub fn set_pane_set(&mut self, set: PaneSet) {
        self.pane_shown = set;
    }

    /// Persist the dock arrangement next to config.xml. Best effort: a
    /// failure only costs the arrangement, never user data.
    pub fn save_layout(&self) {
        let Some(path) = config::layout_file_path() else {
            return;
        };
        match serde_json::to_string(&self.dock) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log_err!("failed to write {}: {}", path.display(), e);
                }
            }
            Err(e) => log_err!("failed to serialize dock layout: {}", e),
        }
    }

    fn load_persisted_layout() -> Option<DockState<Pane>> {
        let path = config::layout_file_path()?;
        let text = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(dock) => Some(dock),
            Err(e) => {
                // Corrupt layout file: treat like a first run.
                log_warn!("ignoring unreadable {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_size() -> egui::Vec2 {
        egui::vec2(1280.0, 720.0)
    }

    fn leaf_count(manager: &LayoutManager) -> usize {
        manager
            .dock
            .main_surface()
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    #[test]
    fn pane_bits_match_the_config_format() {
        assert_eq!(Pane::Optimizer.bit(), 2);
        assert_eq!(Pane::Source.bit(), 4);
        assert_eq!(Pane::Target.bit(), 8);
        assert_eq!(PaneSet::all().bits(), 14);
    }

    #[test]
    fn pane_set_round_trips_through_bits() {
        let mut set = PaneSet::all();
        set.toggle(Pane::Target);
        set.toggle(Pane::Optimizer);
        set.toggle(Pane::Target);
        assert_eq!(PaneSet::from_bits(set.bits()), set);
    }

    #[test]
    fn unknown_bits_are_masked_off() {
        let set = PaneSet::from_bits(0xFFFF_FFFF);
        assert_eq!(set, PaneSet::all());
        assert_eq!(PaneSet::from_bits(1).bits(), 0);
    }

    #[test]
    fn default_layout_postcondition_holds_after_repeated_calls() {
        let mut m = LayoutManager::new();
        for _ in 0..3 {
            m.apply_default_layout(display_size());
            assert_eq!(leaf_count(&m), 3);
            for pane in Pane::ALL {
                assert!(m.dock.find_tab(&pane).is_some());
            }
            assert_eq!(m.pane_set(), PaneSet::all());
            assert!(m.is_pane_active(Pane::Source));
        }
    }

    #[test]
    fn default_layout_forces_hidden_panes_back_on() {
        let mut m = LayoutManager::new();
        m.pane_shown.toggle(Pane::Optimizer);
        m.sync_visibility();
        assert!(m.dock.find_tab(&Pane::Optimizer).is_none());

        m.apply_default_layout(display_size());
        assert_eq!(m.pane_set(), PaneSet::all());
        assert!(m.dock.find_tab(&Pane::Optimizer).is_some());
    }

    #[test]
    fn first_run_builds_the_default_layout_exactly_once() {
        let mut m = LayoutManager::new();
        m.init_from(None);

        // Frame 1: default layout. Frame 2: focus. Later frames: no-ops.
        m.init_after_first_display(display_size());
        assert_eq!(leaf_count(&m), 3);
        m.init_after_first_display(display_size());
        assert!(m.is_pane_active(Pane::Source));

        // A later hide must survive further advances, the one-shots are spent.
        m.pane_shown.toggle(Pane::Target);
        m.sync_visibility();
        for _ in 0..5 {
            m.init_after_first_display(display_size());
        }
        assert!(m.dock.find_tab(&Pane::Target).is_none());
        assert!(!m.pane_set().contains(Pane::Target));
    }

    #[test]
    fn persisted_layout_skips_the_default_build() {
        let mut custom = LayoutManager::new();
        custom.apply_default_layout(display_size());
        // User "rearranged": Target hidden in the persisted arrangement.
        custom.pane_shown.toggle(Pane::Target);
        custom.sync_visibility();
        let persisted = custom.dock.clone();

        let mut m = LayoutManager::new();
        m.init_from(Some(persisted));
        m.init_after_first_display(display_size());
        m.init_after_first_display(display_size());

        // The persisted tree was kept, not rebuilt.
        assert!(m.dock.find_tab(&Pane::Target).is_none());
        // Initial focus still ran: Source is shown and active.
        assert!(m.is_pane_active(Pane::Source));
    }

    #[test]
    fn toggling_a_bit_does_not_touch_the_dock_tree() {
        let mut m = LayoutManager::new();
        m.apply_default_layout(display_size());

        let source_before = m.dock.find_tab(&Pane::Source).unwrap();
        let target_before = m.dock.find_tab(&Pane::Target).unwrap();

        // The registry operation alone never rearranges anything; only the
        // per-frame sync touches the tree.
        m.pane_shown.toggle(Pane::Target);
        assert_eq!(m.dock.find_tab(&Pane::Source).unwrap(), source_before);
        assert_eq!(m.dock.find_tab(&Pane::Target).unwrap(), target_before);
    }

    #[test]
    fn hiding_one_pane_leaves_the_others_visible_and_active() {
        let mut m = LayoutManager::new();
        m.apply_default_layout(display_size());

        m.pane_shown.toggle(Pane::Target);
        m.sync_visibility();

        assert!(m.dock.find_tab(&Pane::Target).is_none());
        assert!(m.is_pane_active(Pane::Source));
        assert!(m.is_pane_active(Pane::Optimizer));
    }

    #[test]
    fn a_hidden_pane_comes_back_on_the_next_sync() {
        let mut m = LayoutManager::new();
        m.apply_default_layout(display_size());

        m.pane_shown.toggle(Pane::Target);
        m.sync_visibility();
        m.pane_shown.toggle(Pane::Target);
        m.sync_visibility();

        assert!(m.dock.find_tab(&Pane::Target).is_some());
        assert!(m.is_pane_active(Pane::Source));
    }

    #[test]
    fn show_and_focus_makes_the_pane_the_active_tab() {
        let mut m = LayoutManager::new();
        m.apply_default_layout(display_size());
        assert!(m.is_pane_active(Pane::Source));

        m.show_and_focus(Pane::Target);
        assert!(m.is_pane_active(Pane::Target));
        // Source sits in a different leaf, so it stays active there.
        assert!(m.is_pane_active(Pane::Source));

        // A hidden pane is never active, whatever the bitmask says.
        m.pane_shown.toggle(Pane::Optimizer);
        m.sync_visibility();
        assert!(!m.is_pane_active(Pane::Optimizer));

        // show_and_focus on a hidden pane brings it back.
        m.show_and_focus(Pane::Optimizer);
        assert!(m.pane_set().contains(Pane::Optimizer));
        assert!(m.dock.find_tab(&Pane::Optimizer).is_some());
    }

    #[test]
    fn dock_state_serializes_and_deserializes() {
        let mut m = LayoutManager::new();
        m.apply_default_layout(display_size());
        let json = serde_json::to_string(&m.dock).unwrap();
        let restored: DockState<Pane> = serde_json::from_str(&json).unwrap();
        for pane in Pane::ALL {
            assert!(restored.find_tab(&pane).is_some());
        }
    }
}
