/// Lifecycle of conditionally rendered content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateState {
    Shown,
    /// Created but hidden; its state is retained.
    Hidden,
    /// Not created yet, or torn down.
    #[default]
    Destroyed,
}

/// What the host must do to its content after a gate input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateAction {
    None,
    Create,
    Reveal,
    Hide,
    Destroy,
}

/// A three-state gate driven by a condition and a `restamp` flag.
///
/// ```
/// use repeater::{Gate, GateAction, GateState};
///
/// let mut gate = Gate::new(false);
/// assert_eq!(gate.set_condition(true), GateAction::Create);
/// assert_eq!(gate.set_condition(false), GateAction::Hide);
/// assert_eq!(gate.set_condition(true), GateAction::Reveal);
/// assert_eq!(gate.state(), GateState::Shown);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gate {
    condition: bool,
    restamp: bool,
    state: GateState,
}

impl Gate {
    pub fn new(restamp: bool) -> Self {
        Self {
            condition: false,
            restamp,
            state: GateState::Destroyed,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn restamp(&self) -> bool {
        self.restamp
    }

    pub fn set_condition(&mut self, condition: bool) -> GateAction {
        self.condition = condition;
        self.apply()
    }

    /// Turning `restamp` on while hidden tears the retained content down.
    pub fn set_restamp(&mut self, restamp: bool) -> GateAction {
        self.restamp = restamp;
        self.apply()
    }

    fn apply(&mut self) -> GateAction {
        let (next, action) = match (self.condition, self.state) {
            (true, GateState::Shown) => (GateState::Shown, GateAction::None),
            (true, GateState::Hidden) => (GateState::Shown, GateAction::Reveal),
            (true, GateState::Destroyed) => (GateState::Shown, GateAction::Create),
            (false, GateState::Destroyed) => (GateState::Destroyed, GateAction::None),
            (false, _) if self.restamp => (GateState::Destroyed, GateAction::Destroy),
            (false, GateState::Shown) => (GateState::Hidden, GateAction::Hide),
            (false, GateState::Hidden) => (GateState::Hidden, GateAction::None),
        };
        if next != self.state {
            rtrace!(from = ?self.state, to = ?next, "Gate transition");
        }
        self.state = next;
        action
    }
}
