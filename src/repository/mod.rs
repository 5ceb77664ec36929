//! Data access for camps, talks and speakers.
//!
//! A `CampRepository` is a request-scoped unit of work: reads go straight to
//! the store, writes are staged with `add`/`update`/`delete` and only reach the
//! store on `save_changes`. A `RepositoryProvider` hands out one per request.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgRepository, PgRepositoryProvider};

use crate::entities::{Camp, Entity, Speaker, Talk};
use crate::error::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait CampRepository: Send + Sync {
    /// All camps, newest event first.
    async fn get_all_camps(&self, include_talks: bool) -> Result<Vec<Camp>, RepositoryError>;

    async fn get_camp(&self, moniker: &str, include_talks: bool) -> Result<Option<Camp>, RepositoryError>;

    async fn get_all_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<Camp>, RepositoryError>;

    async fn get_talks_by_moniker(
        &self,
        moniker: &str,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, RepositoryError>;

    async fn get_talk_by_moniker(
        &self,
        moniker: &str,
        talk_id: i32,
        include_speakers: bool,
    ) -> Result<Option<Talk>, RepositoryError>;

    async fn get_speaker(&self, speaker_id: i32) -> Result<Option<Speaker>, RepositoryError>;

    fn add(&mut self, entity: Entity) -> EntryId;

    fn update(&mut self, entity: Entity) -> EntryId;

    fn delete(&mut self, entity: Entity) -> EntryId;

    /// Staged entity; carries store-assigned keys once committed.
    fn entry(&self, id: EntryId) -> Option<&Entity>;

    /// Write every staged change. `true` when at least one row changed.
    async fn save_changes(&mut self) -> Result<bool, RepositoryError>;
}

/// Source of request-scoped repositories, shared in `AppState`.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn repository(&self) -> Box<dyn CampRepository>;

    /// Cheap liveness probe against the backing store.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    Added,
    Modified,
    Deleted,
    Unchanged,
    Detached,
}

#[derive(Debug)]
struct TrackedEntry {
    state: EntryState,
    entity: Entity,
}

/// Staged writes for one unit of work, in the order they were made.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    entries: Vec<TrackedEntry>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, state: EntryState, entity: Entity) -> EntryId {
        self.entries.push(TrackedEntry { state, entity });
        EntryId(self.entries.len() - 1)
    }

    pub fn get(&self, id: EntryId) -> Option<&Entity> {
        self.entries.get(id.0).map(|e| &e.entity)
    }

    pub fn state(&self, id: EntryId) -> Option<EntryState> {
        self.entries.get(id.0).map(|e| e.state)
    }

    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(|e| is_pending(e.state))
    }

    /// Entries still waiting to be written, with mutable access so the store
    /// can fill in generated keys.
    pub fn pending_mut(&mut self) -> impl Iterator<Item = (EntryState, &mut Entity)> + Send + '_ {
        self.entries
            .iter_mut()
            .filter(|e| is_pending(e.state))
            .map(|e| (e.state, &mut e.entity))
    }

    /// Mark everything written: added/modified become unchanged, deleted become detached.
    pub fn accept_all(&mut self) {
        for e in &mut self.entries {
            e.state = match e.state {
                EntryState::Added | EntryState::Modified => EntryState::Unchanged,
                EntryState::Deleted => EntryState::Detached,
                other => other,
            };
        }
    }
}

fn is_pending(state: EntryState) -> bool {
    matches!(state, EntryState::Added | EntryState::Modified | EntryState::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talk(id: i32) -> Entity {
        Entity::Talk(Talk {
            talk_id: id,
            camp_id: 1,
            speaker_id: 1,
            title: "t".into(),
            abstract_text: "a".into(),
            level: 100,
            speaker: None,
        })
    }

    #[test]
    fn tracks_in_order_and_accepts() {
        let mut tracker = ChangeTracker::new();
        let a = tracker.track(EntryState::Added, talk(0));
        let d = tracker.track(EntryState::Deleted, talk(5));
        assert!(tracker.has_pending());
        let states: Vec<_> = tracker.pending_mut().map(|(s, _)| s).collect();
        assert_eq!(states, vec![EntryState::Added, EntryState::Deleted]);

        if let Some((_, Entity::Talk(t))) = tracker.pending_mut().next() {
            t.talk_id = 9;
        }
        tracker.accept_all();
        assert!(!tracker.has_pending());
        assert_eq!(tracker.state(a), Some(EntryState::Unchanged));
        assert_eq!(tracker.state(d), Some(EntryState::Detached));
        assert_eq!(tracker.get(a).and_then(Entity::as_talk).map(|t| t.talk_id), Some(9));
    }
}
