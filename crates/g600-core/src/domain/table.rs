//! The scancode → command table.
//!
//! The table is dense: one slot per possible scancode (`0..=HIGHEST`).  A slot
//! is either *unset* (no scancode, no commands) or *set* (its own scancode
//! plus a down-command and an up-command, either of which may be empty).
//!
//! | Slot state                 | Meaning on dispatch                  |
//! |----------------------------|--------------------------------------|
//! | unset                      | unmapped key: warn, run nothing      |
//! | set, both commands empty   | treated as unmapped as well          |
//! | set, selected command `""` | intentional no-op for this transition|
//! | set, selected command text | run it                               |
//!
//! The table is authored by hand, so it is validated once at startup with
//! [`validate_slots`].  A failure means the compiled-in data is wrong; callers
//! treat it as fatal.

use thiserror::Error;
use tracing::debug;

use super::action::Transition;
use super::scancode::{ScanCode, NELEM};

/// A consistency defect found while validating a command table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The table does not have exactly one slot per scancode.
    #[error("command table has {actual} slots, expected {expected}")]
    SlotCount { expected: usize, actual: usize },

    /// An unset slot still carries a command.
    #[error("unset slot {index} has a command attached")]
    UnsetSlotHasCommand { index: usize },

    /// A set slot stores a scancode different from its position.
    #[error("slot {index} stores scancode {stored}")]
    IndexMismatch { index: usize, stored: u16 },

    /// A set slot lacks one of its two commands.
    #[error("slot {index} has no {transition} command")]
    MissingCommand { index: usize, transition: Transition },
}

/// The commands bound to one scancode slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBinding {
    scancode: Option<u16>,
    down: Option<String>,
    up: Option<String>,
}

impl CommandBinding {
    /// An unset slot.
    pub fn unset() -> Self {
        Self::default()
    }

    /// A set slot for `scancode`.  Pass `""` for a transition that does nothing.
    pub fn new(scancode: ScanCode, down: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            scancode: Some(scancode.value()),
            down: Some(down.into()),
            up: Some(up.into()),
        }
    }

    /// A slot with arbitrary contents, consistent or not.
    ///
    /// Only [`CommandTable::from_slots`] validation stands between such a slot
    /// and the dispatcher.
    pub fn from_parts(scancode: Option<u16>, down: Option<&str>, up: Option<&str>) -> Self {
        Self {
            scancode,
            down: down.map(str::to_owned),
            up: up.map(str::to_owned),
        }
    }

    /// The scancode this slot claims to belong to, if set.
    pub fn scancode(&self) -> Option<u16> {
        self.scancode
    }

    /// Whether the slot is populated.
    pub fn is_set(&self) -> bool {
        self.scancode.is_some()
    }

    /// The command run when the button goes down.
    pub fn down(&self) -> Option<&str> {
        self.down.as_deref()
    }

    /// The command run when the button comes up.
    pub fn up(&self) -> Option<&str> {
        self.up.as_deref()
    }

    /// The command for `transition`.
    pub fn command_for(&self, transition: Transition) -> Option<&str> {
        match transition {
            Transition::Press => self.down(),
            Transition::Release => self.up(),
        }
    }

    /// `true` when neither transition runs anything.
    pub fn is_silent(&self) -> bool {
        self.down().map_or(true, str::is_empty) && self.up().map_or(true, str::is_empty)
    }
}

/// Result of looking up a scancode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// No binding in this slot.
    Unmapped,
    /// The slot's binding.
    Bound(&'a CommandBinding),
}

/// Checks the slot invariants of an authored table.
///
/// # Errors
///
/// Returns the first [`TableError`] found, scanning slots in index order.
pub fn validate_slots(slots: &[CommandBinding]) -> Result<(), TableError> {
    if slots.len() != NELEM {
        return Err(TableError::SlotCount {
            expected: NELEM,
            actual: slots.len(),
        });
    }

    for (index, slot) in slots.iter().enumerate() {
        match slot.scancode {
            None => {
                if slot.down.is_some() || slot.up.is_some() {
                    return Err(TableError::UnsetSlotHasCommand { index });
                }
            }
            Some(stored) => {
                if usize::from(stored) != index {
                    return Err(TableError::IndexMismatch { index, stored });
                }
                if slot.down.is_none() {
                    return Err(TableError::MissingCommand {
                        index,
                        transition: Transition::Press,
                    });
                }
                if slot.up.is_none() {
                    return Err(TableError::MissingCommand {
                        index,
                        transition: Transition::Release,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Immutable, validated scancode → command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    slots: Vec<CommandBinding>,
}

impl CommandTable {
    /// Starts an empty table builder.
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    /// Wraps an authored slot list after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if any slot invariant is violated.
    pub fn from_slots(slots: Vec<CommandBinding>) -> Result<Self, TableError> {
        validate_slots(&slots)?;
        Ok(Self { slots })
    }

    /// Re-runs the validation pass over this table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if any slot invariant is violated.
    pub fn validate(&self) -> Result<(), TableError> {
        validate_slots(&self.slots)
    }

    /// Looks up the slot for `scancode`.
    pub fn lookup(&self, scancode: ScanCode) -> Lookup<'_> {
        match self.slots.get(scancode.index()) {
            Some(slot) if slot.is_set() => Lookup::Bound(slot),
            _ => Lookup::Unmapped,
        }
    }

    /// Iterates the set slots in scancode order.
    pub fn bindings(&self) -> impl Iterator<Item = (ScanCode, &CommandBinding)> {
        ScanCode::all()
            .zip(self.slots.iter())
            .filter(|(_, slot)| slot.is_set())
    }

    /// Number of set slots.
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_set()).count()
    }
}

/// Builds a [`CommandTable`] by placing each binding at its own index.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    slots: Vec<CommandBinding>,
}

impl TableBuilder {
    fn new() -> Self {
        Self {
            slots: vec![CommandBinding::unset(); NELEM],
        }
    }

    /// Binds `down`/`up` to `scancode`, replacing any earlier binding.
    pub fn bind(
        mut self,
        scancode: impl Into<ScanCode>,
        down: impl Into<String>,
        up: impl Into<String>,
    ) -> Self {
        let scancode = scancode.into();
        if self.slots[scancode.index()].is_set() {
            debug!(%scancode, "replacing existing binding");
        }
        self.slots[scancode.index()] = CommandBinding::new(scancode, down, up);
        self
    }

    /// Validates and freezes the table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the result is inconsistent.
    pub fn build(self) -> Result<CommandTable, TableError> {
        CommandTable::from_slots(self.slots)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
