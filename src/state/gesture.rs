//! Gesture recognizer for drag-select (mouse) and long-press range select
//! (touch).
//!
//! States: `Idle → Pressed → {Dragging | LongHeld}`. The recognizer never
//! owns a timer; the caller passes the current instant and polls the
//! long-press deadline, which keeps the whole contract testable without real
//! pointer devices.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use super::SelectionState;

/// Default hold time before a touch counts as a long press.
pub const LONG_PRESS: Duration = Duration::from_millis(240);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Pressed,
    Dragging,
    LongHeld,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tracking {
    Idle,
    Mouse {
        anchor: usize,
        target: bool,
        dragging: bool,
    },
    Touch {
        index: usize,
        anchor: Option<usize>,
        deadline: Instant,
        held: bool,
    },
    /// Touch that turned into a scroll; ignored until lifted.
    TouchMoved,
}

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    tracking: Tracking,
    long_press: Duration,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(LONG_PRESS)
    }
}

impl GestureRecognizer {
    pub fn new(long_press: Duration) -> Self {
        Self {
            tracking: Tracking::Idle,
            long_press,
        }
    }

    pub fn state(&self) -> GestureState {
        match self.tracking {
            Tracking::Idle | Tracking::TouchMoved => GestureState::Idle,
            Tracking::Mouse {
                dragging: false, ..
            } => GestureState::Pressed,
            Tracking::Mouse { dragging: true, .. } => GestureState::Dragging,
            Tracking::Touch { held: false, .. } => GestureState::Pressed,
            Tracking::Touch { held: true, .. } => GestureState::LongHeld,
        }
    }

    /// Whether the primary button is considered held.
    pub fn pointer_is_down(&self) -> bool {
        matches!(self.tracking, Tracking::Mouse { .. })
    }

    pub fn reset(&mut self) {
        self.tracking = Tracking::Idle;
    }

    /// Press on an item's checkbox: toggles it, and the resulting membership
    /// becomes what the rest of the drag applies.
    pub fn pointer_down(&mut self, selection: &mut SelectionState, index: usize) -> bool {
        let target = selection.toggle(index);
        self.tracking = Tracking::Mouse {
            anchor: index,
            target,
            dragging: false,
        };
        target
    }

    /// Pointer entered another item while held. Returns how many items
    /// changed membership.
    pub fn pointer_enter(&mut self, selection: &mut SelectionState, index: usize) -> usize {
        let Tracking::Mouse {
            anchor,
            target,
            ref mut dragging,
        } = self.tracking
        else {
            return 0;
        };
        *dragging = true;
        selection.apply_range(anchor, index, target)
    }

    pub fn pointer_up(&mut self) {
        if matches!(self.tracking, Tracking::Mouse { .. }) {
            self.tracking = Tracking::Idle;
        }
    }

    /// Leaving the viewport counts as a release, recovering from a lost
    /// button-up event.
    pub fn pointer_left_viewport(&mut self) {
        self.pointer_up();
    }

    /// Arms the long-press deadline. The item touched before this one becomes
    /// the far end of a possible range.
    pub fn touch_start(&mut self, selection: &SelectionState, index: usize, now: Instant) {
        self.tracking = Tracking::Touch {
            index,
            anchor: selection.last_touched(),
            deadline: now + self.long_press,
            held: false,
        };
    }

    /// Deadline of the pending long press, if one is armed.
    pub fn long_press_deadline(&self) -> Option<Instant> {
        match self.tracking {
            Tracking::Touch {
                deadline,
                held: false,
                ..
            } => Some(deadline),
            _ => None,
        }
    }

    /// Fires the long press once its deadline has passed, applying the
    /// inverse of the touched item's membership from the previous touch to
    /// this one. Returns how many items changed.
    pub fn poll_long_press(&mut self, selection: &mut SelectionState, now: Instant) -> usize {
        let Tracking::Touch {
            index,
            anchor,
            deadline,
            ref mut held,
        } = self.tracking
        else {
            return 0;
        };
        if *held || now < deadline {
            return 0;
        }
        *held = true;

        let member = !selection.contains(index);
        let from = anchor.unwrap_or(index);
        trace!(from, to = index, member, "Long press range select");
        selection.apply_range(from, index, member)
    }

    /// Any movement turns the touch into a scroll and cancels the long press.
    pub fn touch_move(&mut self) {
        if matches!(self.tracking, Tracking::Touch { .. }) {
            self.tracking = Tracking::TouchMoved;
        }
    }

    /// Lift. A plain tap toggles the item; after a long press the range has
    /// already been applied. Returns the item's membership when a tap toggled
    /// it.
    pub fn touch_end(&mut self, selection: &mut SelectionState, index: usize) -> Option<bool> {
        let tracking = std::mem::replace(&mut self.tracking, Tracking::Idle);
        match tracking {
            Tracking::TouchMoved => None,
            Tracking::Touch { held: true, .. } => {
                selection.set_last_touched(index);
                None
            }
            _ => {
                selection.set_last_touched(index);
                Some(selection.toggle(index))
            }
        }
    }

    pub fn touch_cancel(&mut self) {
        if matches!(
            self.tracking,
            Tracking::Touch { .. } | Tracking::TouchMoved
        ) {
            self.tracking = Tracking::Idle;
        }
    }
}
