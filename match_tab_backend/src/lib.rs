pub mod actions;
pub mod draw;
pub mod recalculation;

pub use actions::*;
