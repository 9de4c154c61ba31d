//! Hardware-style input events.
//!
//! Front ends map their native input (keyboard, mouse, touch, physical
//! buttons) to these enums. The session core never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A platform-agnostic hardware or pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareEvent {
    /// Power button pressed down.
    PowerPress,
    /// Power button released.
    PowerRelease,
    /// Volume rocker up.
    VolumeUp,
    /// Volume rocker down.
    VolumeDown,
    /// Dedicated snapshot key.
    SnapKey,
    /// A navigation key from a physical keyboard.
    Key(Key),
    /// Pointer (mouse button or touch start) went down on the screen.
    PointerDown {
        x: i32,
        y: i32,
        region: PointerRegion,
    },
    /// Pointer moved while down.
    PointerMove { x: i32, y: i32 },
    /// Pointer (mouse button or touch end) released.
    PointerUp { x: i32, y: i32 },
    /// Pointer left the screen surface.
    PointerLeave,
    /// The platform cancelled the touch sequence.
    PointerCancel,
}

/// Keyboard keys the shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

/// What kind of element sits under a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerRegion {
    /// Bare screen background (eligible for tap and hold gestures).
    Background,
    /// An interactive child element (button, widget, media control).
    Interactive,
}

impl HardwareEvent {
    /// Whether this event belongs to the pointer stream.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. }
                | Self::PointerMove { .. }
                | Self::PointerUp { .. }
                | Self::PointerLeave
                | Self::PointerCancel
        )
    }
}
