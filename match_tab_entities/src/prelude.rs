pub use crate::domain::match_record::{MatchParticipant, MatchRecord, MatchStatus, TeamLabel};
pub use crate::domain::participant::Participant;
pub use crate::domain::round::{
    ConflictPolicy, FfaRoundConfig, GroupingMethod, PointSystem, RematchOptions, RoundConfig,
    SwissRoundConfig, SwissVariant, TeamFormationMethod, TeamPersistence, TeamRoundConfig,
    TournamentRound,
};
pub use crate::domain::score::ScoreVector;
pub use crate::domain::seed::{MatchSeed, SeedParticipant};
pub use crate::domain::team::{lookup_key, Team};
pub use crate::domain::tournament::{Tournament, TournamentSettings};
pub use uuid::Uuid;
