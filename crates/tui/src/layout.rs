//! Centralized layout measurements for the TUI.
//!
//! Shared constants for the dimensions used across rendering components.

/// Height of the header bar (title and view tabs) in rows.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the message input area in rows.
pub const INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in rows.
pub const STATUS_HEIGHT: u16 = 1;

/// Minimum terminal height for useful rendering.
///
/// Below this we show a "terminal too small" message: the chat view
/// needs the header, at least a few transcript rows, the input box, and
/// the status bar.
pub const MIN_HEIGHT: u16 = 12;

/// Minimum terminal width for useful rendering.
///
/// The board overlay shows four lanes; anything narrower than this is
/// unreadable.
pub const MIN_WIDTH: u16 = 40;
