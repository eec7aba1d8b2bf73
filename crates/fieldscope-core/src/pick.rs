//! Pick input and the raw hits a renderer reports for it.

use glam::Vec2;

use crate::options::PickModifier;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Only the control key.
    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        shift: false,
        alt: false,
    };

    /// Returns whether `modifier` is held.
    pub fn holds(self, modifier: PickModifier) -> bool {
        match modifier {
            PickModifier::Control => self.control,
            PickModifier::Shift => self.shift,
            PickModifier::Alt => self.alt,
        }
    }
}

/// A click in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PickInput {
    /// Position in display pixels.
    pub position: Vec2,
    pub modifiers: Modifiers,
}

impl PickInput {
    pub fn new(position: Vec2, modifiers: Modifiers) -> Self {
        Self {
            position,
            modifiers,
        }
    }
}

/// Result of a cell pick: the closest cell within tolerance.
///
/// The cell id indexes the actor's shared cell layout (line cells first, then
/// polygon cells). Several actors may report a hit at the same cell id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPick {
    /// Names of the hit actors, nearest first.
    pub actors: Vec<String>,
    pub cell_id: usize,
}

/// Result of a point pick: the closest point within tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointPick {
    /// Names of the hit actors, nearest first.
    pub actors: Vec<String>,
    pub point_id: usize,
}
