use async_trait::async_trait;
use match_tab_entities::TournamentStore;

#[async_trait]
pub trait ActionTrait {
    type Output: Send;

    async fn execute<S>(self, store: &S) -> Result<Self::Output, anyhow::Error>
    where
        S: TournamentStore;
}
