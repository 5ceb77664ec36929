//! In-process store. Same contract as the PostgreSQL repository, used for
//! tests and for running without a database.

use super::{CampRepository, ChangeTracker, EntryId, EntryState, RepositoryProvider};
use crate::entities::{Camp, Entity, Speaker, Talk};
use crate::error::RepositoryError;
use crate::seed::SeedData;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone, Debug, Default)]
struct StoreData {
    camps: Vec<Camp>,
    talks: Vec<Talk>,
    speakers: Vec<Speaker>,
    last_camp_id: i32,
    last_talk_id: i32,
    last_speaker_id: i32,
}

impl StoreData {
    fn speaker(&self, speaker_id: i32) -> Option<&Speaker> {
        self.speakers.iter().find(|s| s.speaker_id == speaker_id)
    }

    fn camp_id_for(&self, moniker: &str) -> Option<i32> {
        self.camps.iter().find(|c| c.moniker == moniker).map(|c| c.camp_id)
    }

    fn load_talk(&self, talk: &Talk, include_speaker: bool) -> Talk {
        let mut talk = talk.clone();
        if include_speaker {
            talk.speaker = self.speaker(talk.speaker_id).cloned();
        }
        talk
    }

    fn load_camp(&self, camp: &Camp, include_talks: bool) -> Camp {
        let mut camp = camp.clone();
        if include_talks {
            let talks = self
                .talks
                .iter()
                .filter(|t| t.camp_id == camp.camp_id)
                .map(|t| self.load_talk(t, true))
                .collect();
            camp.talks = Some(talks);
        }
        camp
    }

    fn camps_where(&self, include_talks: bool, pred: impl Fn(&Camp) -> bool) -> Vec<Camp> {
        let mut out: Vec<Camp> = self
            .camps
            .iter()
            .filter(|c| pred(c))
            .map(|c| self.load_camp(c, include_talks))
            .collect();
        out.sort_by(|a, b| b.event_date.cmp(&a.event_date));
        out
    }

    /// Apply one staged change. Returns rows affected.
    fn apply(&mut self, state: EntryState, entity: &mut Entity) -> Result<u64, RepositoryError> {
        match (state, entity) {
            (EntryState::Added, Entity::Camp(camp)) => {
                if self.camp_id_for(&camp.moniker).is_some() {
                    return Err(RepositoryError::Commit(format!("duplicate moniker {}", camp.moniker)));
                }
                self.last_camp_id += 1;
                camp.camp_id = self.last_camp_id;
                let mut stored = camp.clone();
                stored.talks = None;
                self.camps.push(stored);
                Ok(1)
            }
            (EntryState::Modified, Entity::Camp(camp)) => {
                if self
                    .camps
                    .iter()
                    .any(|c| c.moniker == camp.moniker && c.camp_id != camp.camp_id)
                {
                    return Err(RepositoryError::Commit(format!("duplicate moniker {}", camp.moniker)));
                }
                match self.camps.iter_mut().find(|c| c.camp_id == camp.camp_id) {
                    Some(stored) => {
                        *stored = camp.clone();
                        stored.talks = None;
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
            (EntryState::Deleted, Entity::Camp(camp)) => {
                let before = self.camps.len();
                self.camps.retain(|c| c.camp_id != camp.camp_id);
                let removed = (before - self.camps.len()) as u64;
                if removed > 0 {
                    self.talks.retain(|t| t.camp_id != camp.camp_id);
                }
                Ok(removed)
            }
            (EntryState::Added, Entity::Talk(talk)) => {
                self.check_talk_refs(talk)?;
                self.last_talk_id += 1;
                talk.talk_id = self.last_talk_id;
                let mut stored = talk.clone();
                stored.speaker = None;
                self.talks.push(stored);
                Ok(1)
            }
            (EntryState::Modified, Entity::Talk(talk)) => {
                self.check_talk_refs(talk)?;
                match self.talks.iter_mut().find(|t| t.talk_id == talk.talk_id) {
                    Some(stored) => {
                        *stored = talk.clone();
                        stored.speaker = None;
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
            (EntryState::Deleted, Entity::Talk(talk)) => {
                let before = self.talks.len();
                self.talks.retain(|t| t.talk_id != talk.talk_id);
                Ok((before - self.talks.len()) as u64)
            }
            _ => Ok(0),
        }
    }

    fn check_talk_refs(&self, talk: &Talk) -> Result<(), RepositoryError> {
        if !self.camps.iter().any(|c| c.camp_id == talk.camp_id) {
            return Err(RepositoryError::Commit(format!("unknown camp {}", talk.camp_id)));
        }
        if self.speaker(talk.speaker_id).is_none() {
            return Err(RepositoryError::Commit(format!("unknown speaker {}", talk.speaker_id)));
        }
        Ok(())
    }
}

/// Shared in-memory data plus a switch that makes every commit report failure.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<StoreData>>,
    fail_commits: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: SeedData) -> Self {
        let store = Self::new();
        if let Ok(mut data) = store.data.write() {
            data.last_speaker_id = seed.speakers.iter().map(|s| s.speaker_id).max().unwrap_or(0);
            data.speakers = seed.speakers;
            data.last_camp_id = seed.camp.camp_id;
            data.camps = vec![seed.camp];
            data.last_talk_id = seed.talks.iter().map(|t| t.talk_id).max().unwrap_or(0);
            data.talks = seed.talks;
        }
        store
    }

    /// Insert a speaker directly; the assigned id is returned in the copy.
    pub fn add_speaker(&self, mut speaker: Speaker) -> Result<Speaker, RepositoryError> {
        let mut data = self.data.write().map_err(|_| RepositoryError::Poisoned)?;
        data.last_speaker_id += 1;
        speaker.speaker_id = data.last_speaker_id;
        data.speakers.push(speaker.clone());
        Ok(speaker)
    }

    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn camp_count(&self) -> Result<usize, RepositoryError> {
        self.data.read().map(|d| d.camps.len()).map_err(|_| RepositoryError::Poisoned)
    }

    pub fn talk_count(&self) -> Result<usize, RepositoryError> {
        self.data.read().map(|d| d.talks.len()).map_err(|_| RepositoryError::Poisoned)
    }
}

#[async_trait]
impl RepositoryProvider for MemoryStore {
    fn repository(&self) -> Box<dyn CampRepository> {
        Box::new(MemoryRepository {
            data: Arc::clone(&self.data),
            fail_commits: Arc::clone(&self.fail_commits),
            tracker: ChangeTracker::new(),
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.data.read().map(|_| ()).map_err(|_| RepositoryError::Poisoned)
    }
}

struct MemoryRepository {
    data: Arc<RwLock<StoreData>>,
    fail_commits: Arc<AtomicBool>,
    tracker: ChangeTracker,
}

impl MemoryRepository {
    fn read<T>(&self, f: impl FnOnce(&StoreData) -> T) -> Result<T, RepositoryError> {
        let data = self.data.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(f(&data))
    }
}

#[async_trait]
impl CampRepository for MemoryRepository {
    async fn get_all_camps(&self, include_talks: bool) -> Result<Vec<Camp>, RepositoryError> {
        self.read(|d| d.camps_where(include_talks, |_| true))
    }

    async fn get_camp(&self, moniker: &str, include_talks: bool) -> Result<Option<Camp>, RepositoryError> {
        self.read(|d| {
            d.camps
                .iter()
                .find(|c| c.moniker == moniker)
                .map(|c| d.load_camp(c, include_talks))
        })
    }

    async fn get_all_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<Camp>, RepositoryError> {
        self.read(|d| d.camps_where(include_talks, |c| c.event_date == date))
    }

    async fn get_talks_by_moniker(
        &self,
        moniker: &str,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, RepositoryError> {
        self.read(|d| match d.camp_id_for(moniker) {
            Some(camp_id) => d
                .talks
                .iter()
                .filter(|t| t.camp_id == camp_id)
                .map(|t| d.load_talk(t, include_speakers))
                .collect(),
            None => Vec::new(),
        })
    }

    async fn get_talk_by_moniker(
        &self,
        moniker: &str,
        talk_id: i32,
        include_speakers: bool,
    ) -> Result<Option<Talk>, RepositoryError> {
        self.read(|d| {
            let camp_id = d.camp_id_for(moniker)?;
            d.talks
                .iter()
                .find(|t| t.talk_id == talk_id && t.camp_id == camp_id)
                .map(|t| d.load_talk(t, include_speakers))
        })
    }

    async fn get_speaker(&self, speaker_id: i32) -> Result<Option<Speaker>, RepositoryError> {
        self.read(|d| d.speaker(speaker_id).cloned())
    }

    fn add(&mut self, entity: Entity) -> EntryId {
        self.tracker.track(EntryState::Added, entity)
    }

    fn update(&mut self, entity: Entity) -> EntryId {
        self.tracker.track(EntryState::Modified, entity)
    }

    fn delete(&mut self, entity: Entity) -> EntryId {
        self.tracker.track(EntryState::Deleted, entity)
    }

    fn entry(&self, id: EntryId) -> Option<&Entity> {
        self.tracker.get(id)
    }

    async fn save_changes(&mut self) -> Result<bool, RepositoryError> {
        if self.fail_commits.load(Ordering::SeqCst) || !self.tracker.has_pending() {
            return Ok(false);
        }
        let mut data = self.data.write().map_err(|_| RepositoryError::Poisoned)?;
        // Work on a copy so a failing change leaves the store untouched.
        let mut next = data.clone();
        let mut affected = 0u64;
        for (state, entity) in self.tracker.pending_mut() {
            affected += next.apply(state, entity)?;
        }
        *data = next;
        drop(data);
        self.tracker.accept_all();
        tracing::debug!(affected, "memory store commit");
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[tokio::test]
    async fn seeded_store_reads() {
        let store = MemoryStore::seeded(seed::sample());
        let repo = store.repository();
        let camp = repo.get_camp("ATL2018", true).await.unwrap().unwrap();
        let talks = camp.talks.unwrap();
        assert_eq!(talks.len(), 2);
        assert!(talks.iter().all(|t| t.speaker.is_some()));
        let plain = repo.get_camp("ATL2018", false).await.unwrap().unwrap();
        assert!(plain.talks.is_none());
    }

    #[tokio::test]
    async fn add_assigns_ids_on_commit() {
        let store = MemoryStore::seeded(seed::sample());
        let mut repo = store.repository();
        let mut camp = seed::sample().camp;
        camp.camp_id = 0;
        camp.moniker = "NEW1".into();
        let id = repo.add(Entity::Camp(camp));
        assert!(repo.save_changes().await.unwrap());
        let stored = repo.entry(id).and_then(Entity::as_camp).unwrap();
        assert_eq!(stored.camp_id, 2);
        assert_eq!(store.camp_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_change_leaves_store_untouched() {
        let store = MemoryStore::seeded(seed::sample());
        let mut repo = store.repository();
        let mut talk = seed::sample().talks.remove(0);
        talk.talk_id = 0;
        repo.add(Entity::Talk(talk.clone()));
        talk.speaker_id = 99;
        repo.add(Entity::Talk(talk));
        assert!(repo.save_changes().await.is_err());
        assert_eq!(store.talk_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn deleting_camp_removes_its_talks() {
        let store = MemoryStore::seeded(seed::sample());
        let mut repo = store.repository();
        let camp = repo.get_camp("ATL2018", false).await.unwrap().unwrap();
        repo.delete(Entity::Camp(camp));
        assert!(repo.save_changes().await.unwrap());
        assert_eq!(store.camp_count().unwrap(), 0);
        assert_eq!(store.talk_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn fail_switch_reports_false() {
        let store = MemoryStore::seeded(seed::sample());
        store.set_fail_commits(true);
        let mut repo = store.repository();
        let camp = repo.get_camp("ATL2018", false).await.unwrap().unwrap();
        repo.delete(Entity::Camp(camp));
        assert!(!repo.save_changes().await.unwrap());
        assert_eq!(store.camp_count().unwrap(), 1);
    }

    #[test]
    fn poisoned_lock_is_an_error() {
        let store = MemoryStore::seeded(seed::sample());
        let data = Arc::clone(&store.data);
        let _ = std::thread::spawn(move || {
            let _guard = data.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(matches!(store.camp_count(), Err(RepositoryError::Poisoned)));
        assert!(matches!(store.talk_count(), Err(RepositoryError::Poisoned)));
    }
}
