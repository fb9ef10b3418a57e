//! Shared test utilities for deck-db unit tests.

pub(crate) mod helpers {
    use deck_core::entities::{Chunk, Task};
    use deck_core::enums::Schedule;

    use crate::DeckDb;
    use crate::repos::task::NewTask;
    use crate::service::DeckService;

    /// Create an in-memory `DeckService`.
    pub async fn test_service() -> DeckService {
        let db = DeckDb::open_local(":memory:").await.unwrap();
        DeckService::from_db(db)
    }

    /// Create a `today` task with the given title.
    pub async fn today_task(svc: &DeckService, title: &str) -> Task {
        svc.create_task(NewTask::new(title, Schedule::Today))
            .await
            .unwrap()
    }

    /// Create a named chunk owning `tasks`.
    pub async fn chunk_with(svc: &DeckService, name: &str, tasks: &[&Task]) -> Chunk {
        let ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        svc.create_chunk(Some(name), &ids).await.unwrap().chunk
    }
}
