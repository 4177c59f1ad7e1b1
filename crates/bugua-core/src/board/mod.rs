//! Board domain module: the five named slots and the slot → piece mapping.

mod model;
mod slot;

pub use model::Board;
pub use slot::{FLIP_ORDER, Slot};
