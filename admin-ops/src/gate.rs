//! Typed confirmation before destructive actions
//!
//! The operator has to type an exact phrase before a purge can start. The
//! armed state is recomputed on every input change, and both confirmation
//! channels (the confirm action and the Enter key) go through
//! [`ConfirmationGate::try_confirm`].

use shared::protocol::PURGE_CONFIRMATION_PHRASE;

/// Proof that the operator confirmed through an armed gate.
///
/// Only [`ConfirmationGate::try_confirm`] can create one; the purge takes it
/// by value so it cannot be reused.
#[derive(Debug)]
pub struct Confirmed {
    _private: (),
}

/// Keys the gate reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKey {
    Enter,
    Escape,
    Other,
}

/// Visual state of the confirmation input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Empty,
    Valid,
    Invalid,
}

#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    required_phrase: String,
    current_input: String,
    armed: bool,
    open: bool,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::with_phrase(PURGE_CONFIRMATION_PHRASE)
    }

    pub fn with_phrase(phrase: impl Into<String>) -> Self {
        Self {
            required_phrase: phrase.into(),
            current_input: String::new(),
            armed: false,
            open: false,
        }
    }

    /// Open the dialog with empty, disarmed input.
    pub fn open(&mut self) {
        self.current_input.clear();
        self.armed = false;
        self.open = true;
    }

    /// Close the dialog, discarding whatever was typed.
    pub fn close(&mut self) {
        self.current_input.clear();
        self.armed = false;
        self.open = false;
    }

    /// Replace the input and return whether the gate is now armed.
    /// Matching is case-sensitive after trimming surrounding whitespace.
    pub fn update(&mut self, text: &str) -> bool {
        self.current_input = text.to_string();
        self.armed = text.trim() == self.required_phrase;
        self.armed
    }

    /// Release the gate if it is open and armed. Otherwise nothing happens.
    pub fn try_confirm(&mut self) -> Option<Confirmed> {
        if !(self.open && self.armed) {
            return None;
        }
        self.close();
        Some(Confirmed { _private: () })
    }

    /// Keyboard channel: Enter confirms through `try_confirm`, Escape closes.
    pub fn handle_key(&mut self, key: GateKey) -> Option<Confirmed> {
        match key {
            GateKey::Enter => self.try_confirm(),
            GateKey::Escape => {
                self.close();
                None
            }
            GateKey::Other => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn required_phrase(&self) -> &str {
        &self.required_phrase
    }

    pub fn input_state(&self) -> InputState {
        if self.current_input.is_empty() {
            InputState::Empty
        } else if self.armed {
            InputState::Valid
        } else {
            InputState::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_then_full_phrase() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        assert!(!gate.update("delet"));
        assert_eq!(gate.input_state(), InputState::Invalid);
        assert!(gate.update("DELETE"));
        assert_eq!(gate.input_state(), InputState::Valid);
        assert!(gate.try_confirm().is_some());
        assert!(!gate.is_open());
    }

    #[test]
    fn match_is_case_sensitive() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        assert!(!gate.update("delete"));
        assert!(!gate.update("Delete"));
        assert!(gate.try_confirm().is_none());
        assert!(gate.is_open());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        assert!(gate.update("  DELETE\n"));
        assert!(!gate.update("DEL ETE"));
    }

    #[test]
    fn armed_tracks_every_input() {
        let inputs = ["", " ", "D", "DELETE", "DELETEE", "xDELETE", "DELETE ", "\tDELETE"];
        let mut gate = ConfirmationGate::new();
        gate.open();
        for s in inputs {
            assert_eq!(gate.update(s), s.trim() == "DELETE", "input {:?}", s);
            assert_eq!(gate.is_armed(), s.trim() == "DELETE");
        }
    }

    #[test]
    fn confirm_after_disarm_is_noop() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        gate.update("DELETE");
        gate.update("DELETEx");
        assert!(gate.try_confirm().is_none());
        assert_eq!(gate.current_input(), "DELETEx");
    }

    #[test]
    fn open_resets_prior_state() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        gate.update("DELETE");
        gate.open();
        assert!(!gate.is_armed());
        assert_eq!(gate.current_input(), "");
        assert_eq!(gate.input_state(), InputState::Empty);
    }

    #[test]
    fn closed_gate_never_confirms() {
        let mut gate = ConfirmationGate::new();
        gate.update("DELETE");
        assert!(gate.try_confirm().is_none());
    }

    #[test]
    fn enter_key_routes_through_confirm() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        gate.update("DELE");
        assert!(gate.handle_key(GateKey::Enter).is_none());
        assert!(gate.is_open());

        gate.update("DELETE");
        assert!(gate.handle_key(GateKey::Other).is_none());
        assert!(gate.handle_key(GateKey::Enter).is_some());
        assert!(gate.handle_key(GateKey::Enter).is_none());
    }

    #[test]
    fn escape_closes() {
        let mut gate = ConfirmationGate::new();
        gate.open();
        gate.update("DELETE");
        assert!(gate.handle_key(GateKey::Escape).is_none());
        assert!(!gate.is_open());
        assert!(!gate.is_armed());
    }

    #[test]
    fn custom_phrase() {
        let mut gate = ConfirmationGate::with_phrase("WIPE");
        gate.open();
        assert!(!gate.update("DELETE"));
        assert!(gate.update("WIPE"));
        assert_eq!(gate.required_phrase(), "WIPE");
    }
}
