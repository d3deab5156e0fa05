//! Constants for board geometry, record defaults, and parser diagnostics.
//!
//! Board size is a runtime value taken from the record's `SZ` property, so
//! only the limits imposed by the coordinate encoding live here.

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest board the two-letter coordinate encoding can address (a-z, A-Z).
pub const MAX_SIZE: usize = 52;

/// Smallest usable board.
pub const MIN_SIZE: usize = 1;

/// Board size used for new records when none is given.
pub const DEFAULT_SIZE: usize = 19;

/// Coordinate used for both axes of a pass move.
pub const PASS_COORD: i32 = -1;

// =============================================================================
// Record Defaults
// =============================================================================

/// File format version written into new roots (`FF`).
pub const DEFAULT_FORMAT: i64 = 4;

/// Game type written into new roots (`GM`, 1 = Go).
pub const GAME_GO: i64 = 1;

// =============================================================================
// Diagnostics
// =============================================================================

/// Number of characters of unparsed input quoted in a parse error.
pub const EXCERPT_LEN: usize = 10;

/// Attempts made to find a random legal move before a playout passes.
pub const PLAYOUT_TRIES: usize = 64;
