pub mod entity;
pub mod ffa;
pub mod opponents;
pub mod round_builder;
pub mod swiss;
pub mod teams;

pub use entity::{SwissEntity, TeamEntity};
pub use opponents::{OpponentGraph, OpponentGraphOptions};
pub use round_builder::{RoundBuildError, RoundBuildOutput, RoundBuilder, RoundGenerationContext};
pub use swiss::{pair_entities, SwissPairing, SwissPairingOptions};
