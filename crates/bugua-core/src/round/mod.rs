//! Round domain module.
//!
//! - `phase`: `GamePhase` and `InputMode`
//! - `model`: the `Round` aggregate with its selection state machine
//!
//! ```text
//! SHUFFLING → PICKING → CATEGORY_SELECT → ANALYZING → RESULT
//!     ^          ^                                       |
//!     └──────────┴────────────── reset ──────────────────┘
//! ```

mod model;
mod phase;

pub use model::{ReadingRequest, Rejection, Round, SelectionOutcome};
pub use phase::{GamePhase, InputMode};
