//! PostgreSQL-backed repository.

use super::{CampRepository, ChangeTracker, EntryId, EntryState, RepositoryProvider};
use crate::entities::{Camp, Entity, Location, Speaker, Talk};
use crate::error::RepositoryError;
use crate::store::qualified_table;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

const CAMP_COLUMNS: &str = "camp_id, moniker, name, event_date, length, venue, address1, address2, address3, \
     city_town, state_province, postal_code, country";
const TALK_COLUMNS: &str = "t.talk_id, t.camp_id, t.speaker_id, t.title, t.abstract, t.level";
const SPEAKER_COLUMNS: &str =
    "speaker_id, first_name, last_name, middle_name, company, company_url, blog_url, twitter, git_hub";

#[derive(sqlx::FromRow)]
struct CampRow {
    camp_id: i32,
    moniker: String,
    name: String,
    event_date: NaiveDate,
    length: i32,
    venue: Option<String>,
    address1: Option<String>,
    address2: Option<String>,
    address3: Option<String>,
    city_town: Option<String>,
    state_province: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

impl From<CampRow> for Camp {
    fn from(r: CampRow) -> Self {
        Camp {
            camp_id: r.camp_id,
            moniker: r.moniker,
            name: r.name,
            event_date: r.event_date,
            length: r.length,
            location: Location {
                venue: r.venue,
                address1: r.address1,
                address2: r.address2,
                address3: r.address3,
                city_town: r.city_town,
                state_province: r.state_province,
                postal_code: r.postal_code,
                country: r.country,
            },
            talks: None,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TalkRow {
    talk_id: i32,
    camp_id: i32,
    speaker_id: i32,
    title: String,
    #[sqlx(rename = "abstract")]
    abstract_text: String,
    level: i32,
}

impl From<TalkRow> for Talk {
    fn from(r: TalkRow) -> Self {
        Talk {
            talk_id: r.talk_id,
            camp_id: r.camp_id,
            speaker_id: r.speaker_id,
            title: r.title,
            abstract_text: r.abstract_text,
            level: r.level,
            speaker: None,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SpeakerRow {
    speaker_id: i32,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    company: Option<String>,
    company_url: Option<String>,
    blog_url: Option<String>,
    twitter: Option<String>,
    git_hub: Option<String>,
}

impl From<SpeakerRow> for Speaker {
    fn from(r: SpeakerRow) -> Self {
        Speaker {
            speaker_id: r.speaker_id,
            first_name: r.first_name,
            last_name: r.last_name,
            middle_name: r.middle_name,
            company: r.company,
            company_url: r.company_url,
            blog_url: r.blog_url,
            twitter: r.twitter,
            git_hub: r.git_hub,
        }
    }
}

/// Hands out one `PgRepository` per request over a shared pool.
#[derive(Clone)]
pub struct PgRepositoryProvider {
    pool: PgPool,
}

impl PgRepositoryProvider {
    pub fn new(pool: PgPool) -> Self {
        PgRepositoryProvider { pool }
    }
}

#[async_trait]
impl RepositoryProvider for PgRepositoryProvider {
    fn repository(&self) -> Box<dyn CampRepository> {
        Box::new(PgRepository::new(self.pool.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

pub struct PgRepository {
    pool: PgPool,
    tracker: ChangeTracker,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        PgRepository {
            pool,
            tracker: ChangeTracker::new(),
        }
    }

    async fn fetch_camps(
        &self,
        filter: Option<NaiveDate>,
        include_talks: bool,
    ) -> Result<Vec<Camp>, RepositoryError> {
        let mut sql = format!("SELECT {} FROM {}", CAMP_COLUMNS, qualified_table("camps"));
        if filter.is_some() {
            sql.push_str(" WHERE event_date = $1");
        }
        sql.push_str(" ORDER BY event_date DESC, camp_id");
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query_as::<_, CampRow>(&sql);
        if let Some(date) = filter {
            query = query.bind(date);
        }
        let rows = query.fetch_all(&self.pool).await?;
        let mut camps: Vec<Camp> = rows.into_iter().map(Camp::from).collect();
        if include_talks {
            self.load_talks(&mut camps).await?;
        }
        Ok(camps)
    }

    /// Batch-load talks (with speakers) for the given camps.
    async fn load_talks(&self, camps: &mut [Camp]) -> Result<(), RepositoryError> {
        let ids: Vec<i32> = camps.iter().map(|c| c.camp_id).collect();
        let sql = format!(
            "SELECT {} FROM {} t WHERE t.camp_id = ANY($1) ORDER BY t.talk_id",
            TALK_COLUMNS,
            qualified_table("talks")
        );
        tracing::debug!(sql = %sql, camps = ids.len(), "query");
        let rows = sqlx::query_as::<_, TalkRow>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
        let mut talks: Vec<Talk> = rows.into_iter().map(Talk::from).collect();
        self.load_speakers(&mut talks).await?;
        let mut by_camp: HashMap<i32, Vec<Talk>> = HashMap::new();
        for talk in talks {
            by_camp.entry(talk.camp_id).or_default().push(talk);
        }
        for camp in camps.iter_mut() {
            camp.talks = Some(by_camp.remove(&camp.camp_id).unwrap_or_default());
        }
        Ok(())
    }

    async fn load_speakers(&self, talks: &mut [Talk]) -> Result<(), RepositoryError> {
        if talks.is_empty() {
            return Ok(());
        }
        let mut ids: Vec<i32> = talks.iter().map(|t| t.speaker_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let sql = format!(
            "SELECT {} FROM {} WHERE speaker_id = ANY($1)",
            SPEAKER_COLUMNS,
            qualified_table("speakers")
        );
        tracing::debug!(sql = %sql, speakers = ids.len(), "query");
        let rows = sqlx::query_as::<_, SpeakerRow>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
        let speakers: HashMap<i32, Speaker> = rows
            .into_iter()
            .map(|r| (r.speaker_id, Speaker::from(r)))
            .collect();
        for talk in talks.iter_mut() {
            talk.speaker = speakers.get(&talk.speaker_id).cloned();
        }
        Ok(())
    }

    async fn fetch_talks(
        &self,
        moniker: &str,
        talk_id: Option<i32>,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, RepositoryError> {
        let mut sql = format!(
            "SELECT {} FROM {} t JOIN {} c ON c.camp_id = t.camp_id WHERE c.moniker = $1",
            TALK_COLUMNS,
            qualified_table("talks"),
            qualified_table("camps")
        );
        if talk_id.is_some() {
            sql.push_str(" AND t.talk_id = $2");
        }
        sql.push_str(" ORDER BY t.talk_id");
        tracing::debug!(sql = %sql, moniker = %moniker, "query");
        let mut query = sqlx::query_as::<_, TalkRow>(&sql).bind(moniker);
        if let Some(id) = talk_id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;
        let mut talks: Vec<Talk> = rows.into_iter().map(Talk::from).collect();
        if include_speakers {
            self.load_speakers(&mut talks).await?;
        }
        Ok(talks)
    }
}

#[async_trait]
impl CampRepository for PgRepository {
    async fn get_all_camps(&self, include_talks: bool) -> Result<Vec<Camp>, RepositoryError> {
        self.fetch_camps(None, include_talks).await
    }

    async fn get_camp(&self, moniker: &str, include_talks: bool) -> Result<Option<Camp>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE moniker = $1",
            CAMP_COLUMNS,
            qualified_table("camps")
        );
        tracing::debug!(sql = %sql, moniker = %moniker, "query");
        let row = sqlx::query_as::<_, CampRow>(&sql)
            .bind(moniker)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut camps = vec![Camp::from(row)];
        if include_talks {
            self.load_talks(&mut camps).await?;
        }
        Ok(camps.pop())
    }

    async fn get_all_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<Camp>, RepositoryError> {
        self.fetch_camps(Some(date), include_talks).await
    }

    async fn get_talks_by_moniker(
        &self,
        moniker: &str,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, RepositoryError> {
        self.fetch_talks(moniker, None, include_speakers).await
    }

    async fn get_talk_by_moniker(
        &self,
        moniker: &str,
        talk_id: i32,
        include_speakers: bool,
    ) -> Result<Option<Talk>, RepositoryError> {
        let mut talks = self.fetch_talks(moniker, Some(talk_id), include_speakers).await?;
        Ok(talks.pop())
    }

    async fn get_speaker(&self, speaker_id: i32) -> Result<Option<Speaker>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE speaker_id = $1",
            SPEAKER_COLUMNS,
            qualified_table("speakers")
        );
        tracing::debug!(sql = %sql, speaker_id, "query");
        let row = sqlx::query_as::<_, SpeakerRow>(&sql)
            .bind(speaker_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Speaker::from))
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

    /// All staged changes run in one transaction; any error rolls back.
    async fn save_changes(&mut self) -> Result<bool, RepositoryError> {
        if !self.tracker.has_pending() {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let mut affected = 0u64;
        for (state, entity) in self.tracker.pending_mut() {
            affected += write_entry(&mut tx, state, entity).await?;
        }
        tx.commit().await?;
        self.tracker.accept_all();
        tracing::debug!(affected, "commit");
        Ok(affected > 0)
    }
}

async fn write_entry(
    conn: &mut PgConnection,
    state: EntryState,
    entity: &mut Entity,
) -> Result<u64, RepositoryError> {
    let camps = qualified_table("camps");
    let talks = qualified_table("talks");
    match (state, entity) {
        (EntryState::Added, Entity::Camp(c)) => {
            let sql = format!(
                "INSERT INTO {} (moniker, name, event_date, length, venue, address1, address2, address3, \
                 city_town, state_province, postal_code, country) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING camp_id",
                camps
            );
            let (id,): (i32,) = sqlx::query_as(&sql)
                .bind(&c.moniker)
                .bind(&c.name)
                .bind(c.event_date)
                .bind(c.length)
                .bind(&c.location.venue)
                .bind(&c.location.address1)
                .bind(&c.location.address2)
                .bind(&c.location.address3)
                .bind(&c.location.city_town)
                .bind(&c.location.state_province)
                .bind(&c.location.postal_code)
                .bind(&c.location.country)
                .fetch_one(&mut *conn)
                .await?;
            c.camp_id = id;
            Ok(1)
        }
        (EntryState::Modified, Entity::Camp(c)) => {
            let sql = format!(
                "UPDATE {} SET moniker = $1, name = $2, event_date = $3, length = $4, venue = $5, \
                 address1 = $6, address2 = $7, address3 = $8, city_town = $9, state_province = $10, \
                 postal_code = $11, country = $12 WHERE camp_id = $13",
                camps
            );
            let q = sqlx::query(&sql)
                .bind(&c.moniker)
                .bind(&c.name)
                .bind(c.event_date)
                .bind(c.length)
                .bind(&c.location.venue)
                .bind(&c.location.address1)
                .bind(&c.location.address2)
                .bind(&c.location.address3)
                .bind(&c.location.city_town)
                .bind(&c.location.state_province)
                .bind(&c.location.postal_code)
                .bind(&c.location.country)
                .bind(c.camp_id);
            Ok(q.execute(&mut *conn).await?.rows_affected())
        }
        (EntryState::Deleted, Entity::Camp(c)) => {
            let sql = format!("DELETE FROM {} WHERE camp_id = $1", camps);
            let r = sqlx::query(&sql).bind(c.camp_id).execute(&mut *conn).await?;
            Ok(r.rows_affected())
        }
        (EntryState::Added, Entity::Talk(t)) => {
            let sql = format!(
                "INSERT INTO {} (camp_id, speaker_id, title, abstract, level) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING talk_id",
                talks
            );
            let (id,): (i32,) = sqlx::query_as(&sql)
                .bind(t.camp_id)
                .bind(t.speaker_id)
                .bind(&t.title)
                .bind(&t.abstract_text)
                .bind(t.level)
                .fetch_one(&mut *conn)
                .await?;
            t.talk_id = id;
            Ok(1)
        }
        (EntryState::Modified, Entity::Talk(t)) => {
            let sql = format!(
                "UPDATE {} SET speaker_id = $1, title = $2, abstract = $3, level = $4 WHERE talk_id = $5",
                talks
            );
            let r = sqlx::query(&sql)
                .bind(t.speaker_id)
                .bind(&t.title)
                .bind(&t.abstract_text)
                .bind(t.level)
                .bind(t.talk_id)
                .execute(&mut *conn)
                .await?;
            Ok(r.rows_affected())
        }
        (EntryState::Deleted, Entity::Talk(t)) => {
            let sql = format!("DELETE FROM {} WHERE talk_id = $1", talks);
            let r = sqlx::query(&sql).bind(t.talk_id).execute(&mut *conn).await?;
            Ok(r.rows_affected())
        }
        _ => Ok(0),
    }
}
