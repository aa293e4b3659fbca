pub mod domain;
pub mod prelude;
pub mod standings;
pub mod store;
pub mod mock;

pub use store::{MemoryStore, StoreError, TournamentSnapshot, TournamentStore};
