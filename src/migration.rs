//! DDL for the camp tables and optional sample data.
//! Order follows foreign-key dependencies: speakers and camps before talks.

use crate::error::RepositoryError;
use crate::seed::SeedData;
use crate::store::{camp_schema, qualified_table};
use sqlx::PgPool;

/// Create the schema and tables if missing. Idempotent.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), RepositoryError> {
    let schema = camp_schema();
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;

    let speakers = qualified_table("speakers");
    let camps = qualified_table("camps");
    let talks = qualified_table("talks");

    let ddl = [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                speaker_id SERIAL PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                middle_name TEXT,
                company TEXT,
                company_url TEXT,
                blog_url TEXT,
                twitter TEXT,
                git_hub TEXT
            )
            "#,
            speakers
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                camp_id SERIAL PRIMARY KEY,
                moniker TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                event_date DATE NOT NULL,
                length INTEGER NOT NULL DEFAULT 1,
                venue TEXT,
                address1 TEXT,
                address2 TEXT,
                address3 TEXT,
                city_town TEXT,
                state_province TEXT,
                postal_code TEXT,
                country TEXT
            )
            "#,
            camps
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                talk_id SERIAL PRIMARY KEY,
                camp_id INTEGER NOT NULL REFERENCES {}(camp_id) ON DELETE CASCADE,
                speaker_id INTEGER NOT NULL REFERENCES {}(speaker_id),
                title TEXT NOT NULL,
                abstract TEXT NOT NULL,
                level INTEGER NOT NULL
            )
            "#,
            talks, camps, speakers
        ),
        format!("CREATE INDEX IF NOT EXISTS talks_camp_id_idx ON {} (camp_id)", talks),
        format!("CREATE INDEX IF NOT EXISTS camps_event_date_idx ON {} (event_date)", camps),
    ];
    for sql in &ddl {
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!(schema = %schema, "camp tables ready");
    Ok(())
}

/// Insert the sample camp, speakers and talks when the store has no speakers yet.
/// Returns whether anything was written.
pub async fn seed_sample_data(pool: &PgPool, seed: SeedData) -> Result<bool, RepositoryError> {
    let speakers = qualified_table("speakers");
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", speakers))
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    let mut speaker_ids = Vec::with_capacity(seed.speakers.len());
    for s in &seed.speakers {
        let (id,): (i32,) = sqlx::query_as(&format!(
            "INSERT INTO {} (first_name, last_name, middle_name, company, company_url, blog_url, twitter, git_hub) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING speaker_id",
            speakers
        ))
        .bind(&s.first_name)
        .bind(&s.last_name)
        .bind(&s.middle_name)
        .bind(&s.company)
        .bind(&s.company_url)
        .bind(&s.blog_url)
        .bind(&s.twitter)
        .bind(&s.git_hub)
        .fetch_one(&mut *tx)
        .await?;
        speaker_ids.push((s.speaker_id, id));
    }

    let c = &seed.camp;
    let (camp_id,): (i32,) = sqlx::query_as(&format!(
        "INSERT INTO {} (moniker, name, event_date, length, venue, address1, address2, address3, \
         city_town, state_province, postal_code, country) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (moniker) DO UPDATE SET moniker = EXCLUDED.moniker RETURNING camp_id",
        qualified_table("camps")
    ))
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
    .fetch_one(&mut *tx)
    .await?;

    for t in &seed.talks {
        let Some(&(_, speaker_id)) = speaker_ids.iter().find(|(seeded, _)| *seeded == t.speaker_id) else {
            continue;
        };
        sqlx::query(&format!(
            "INSERT INTO {} (camp_id, speaker_id, title, abstract, level) VALUES ($1, $2, $3, $4, $5)",
            qualified_table("talks")
        ))
        .bind(camp_id)
        .bind(speaker_id)
        .bind(&t.title)
        .bind(&t.abstract_text)
        .bind(t.level)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    tracing::info!(moniker = %c.moniker, "seeded sample data");
    Ok(true)
}
