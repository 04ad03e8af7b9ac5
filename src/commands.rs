//! Deferred-command queue behind the unsaved-changes confirmation dialog.
//!
//! Menu actions that would discard unsaved work (New / Open / Close / Quit) do
//! not run immediately while the project is dirty. They park their effect here
//! as a [`Command`] and the frame opens the confirmation modal. Once the user
//! picks a [`ConfirmChoice`], [`PendingConfirm::resolve`] produces the final
//! ordered batch the frame then interprets.
//!
//! Invariant: saving always completes before the window closes. A failed save
//! aborts the rest of the batch (the interpreter in `app.rs` enforces that
//! half).

/// One deferred action. The frame interprets these front-to-back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Save the project to its current path. On failure the interpreter opens
    /// the save-as picker and drops the remainder of the batch.
    Save,
    /// Open the save-as file picker.
    SaveAs,
    /// Reset the project to a fresh unsaved state.
    NewProject,
    /// Open the project file picker.
    OpenProjectPicker,
    /// Clear the loaded project.
    CloseProject,
    /// Request the OS window to close.
    CloseWindow,
}

/// Button pressed in the confirmation modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmChoice {
    Save,
    SaveAs,
    /// "Continue without saving".
    Discard,
    Cancel,
}

/// A confirmation waiting for the user. At most one exists at a time,
/// enforced by [`ConfirmSlot`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingConfirm {
    /// The action(s) the user originally asked for (e.g. `OpenProjectPicker`).
    pub deferred: Vec<Command>,
    /// True when the trigger was a quit: the resolved batch must end by
    /// closing the window (unless cancelled or the save fails).
    pub quit_requested: bool,
}

impl PendingConfirm {
    /// Confirmation raised by a menu action that still has work to do after
    /// the save question is answered.
    pub fn for_action(action: Command) -> Self {
        Self {
            deferred: vec![action],
            quit_requested: false,
        }
    }

    /// Confirmation raised by a quit request. Nothing is deferred besides the
    /// close itself, which `resolve` appends.
    pub fn for_quit() -> Self {
        Self {
            deferred: Vec::new(),
            quit_requested: true,
        }
    }

    /// Turn the user's choice into the ordered command batch to execute.
    ///
    /// `Cancel` discards everything. `Save` runs the save *first* and the
    /// window close *last*, so a quit never races the write. `SaveAs` only
    /// opens the picker; when a quit is in flight the picker's completion
    /// handler performs the close (the quit flag is left standing by the
    /// caller).
    pub fn resolve(&self, choice: ConfirmChoice) -> Vec<Command> {
        let mut batch = Vec::new();
        match choice {
            ConfirmChoice::Cancel => {}
            ConfirmChoice::Discard => {
                batch.extend_from_slice(&self.deferred);
                if self.quit_requested {
                    batch.push(Command::CloseWindow);
                }
            }
            ConfirmChoice::Save => {
                batch.push(Command::Save);
                batch.extend_from_slice(&self.deferred);
                if self.quit_requested {
                    batch.push(Command::CloseWindow);
                }
            }
            ConfirmChoice::SaveAs => {
                batch.push(Command::SaveAs);
                batch.extend_from_slice(&self.deferred);
            }
        }
        batch
    }
}

/// Holder for the (at most one) outstanding confirmation.
///
/// The dialog window does not block the rest of the UI, so a second trigger
/// can arrive from the menu bar while a confirmation is still open. Such a
/// trigger is refused; it must never replace the pending confirmation, or an
/// in-flight quit or deferred action would be silently dropped.
#[derive(Debug, Default)]
pub struct ConfirmSlot {
    pending: Option<PendingConfirm>,
}

impl ConfirmSlot {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Park a confirmation. Returns `false` (and keeps the existing one)
    /// when a confirmation is already outstanding.
    pub fn raise(&mut self, pending: PendingConfirm) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(pending);
        true
    }

    /// Hand the pending confirmation to the resolver, emptying the slot.
    pub fn take(&mut self) -> Option<PendingConfirm> {
        self.pending.take()
    }
}

/// What a failed `Save` mid-batch turns into: every remaining command is
/// dropped and the save-as picker opens instead. The only thing that survives
/// is a queued `CloseWindow`, carried as the picker's completion intent, so
/// the window is never closed (and nothing discarded) before a save landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveAsEscalation {
    /// Close the window once the picker saves successfully.
    pub close_after_save: bool,
}

impl SaveAsEscalation {
    pub fn from_remaining(rest: &[Command]) -> Self {
        Self {
            close_after_save: rest.contains(&Command::CloseWindow),
        }
    }
}
