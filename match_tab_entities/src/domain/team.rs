use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const LOOKUP_KEY_DELIMITER: &str = ",";

/// A team as registered in the tournament. Its identity is the lookup key,
/// the same member set always maps to the same team.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Team {
    pub uuid: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub lookup_key: String,
    pub member_ids: Vec<Uuid>,
}

impl Team {
    pub fn new(tournament_id: Uuid, name: String, member_ids: Vec<Uuid>) -> Self {
        Team {
            uuid: Uuid::new_v4(),
            tournament_id,
            name,
            lookup_key: lookup_key(&member_ids),
            member_ids,
        }
    }
}

pub fn lookup_key<'a, I>(member_ids: I) -> String
where
    I: IntoIterator<Item = &'a Uuid>,
{
    member_ids
        .into_iter()
        .map(|id| id.to_string())
        .sorted()
        .join(LOOKUP_KEY_DELIMITER)
}
