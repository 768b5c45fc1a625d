//! SQLite-backed stores for countries and travel plans.
//!
//! Each operation opens a short-lived connection on the blocking pool.
//! The `UNIQUE` constraint on `countries.code` is the sole guard against
//! the concurrent write-back race in the resolver.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::domain::model::{
    Country, CountryApiData, CountryId, PlanId, TravelPlanRecord, TravelPlanView,
};
use crate::domain::ports::{CountryStore, TravelPlanStore};
use crate::utils::error::{Result, WayfareError};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS countries (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            region TEXT NOT NULL,
            subregion TEXT NOT NULL,
            capital TEXT NOT NULL,
            population INTEGER NOT NULL CHECK (population >= 0),
            flag_url TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        [],
    )?;
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS travel_plans (
            id TEXT PRIMARY KEY,
            country_id TEXT NOT NULL REFERENCES countries(id),
            title TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            notes TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        [],
    )?;
    Ok(())
}

fn open(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WayfareError::store(format!("corrupt timestamp {:?}: {}", raw, e)))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| WayfareError::store(format!("corrupt date {:?}: {}", raw, e)))
}

/// Reads a country out of a row. `offset` allows reuse when the country
/// columns are appended to a join.
fn country_from_row(row: &Row<'_>, offset: usize) -> Result<Country> {
    let created_at: String = row.get(offset + 8)?;
    let updated_at: String = row.get(offset + 9)?;
    Ok(Country {
        id: CountryId(row.get(offset)?),
        code: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        region: row.get(offset + 3)?,
        subregion: row.get(offset + 4)?,
        capital: row.get(offset + 5)?,
        population: row.get::<_, i64>(offset + 6)? as u64,
        flag_url: row.get(offset + 7)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

const COUNTRY_COLUMNS: &str =
    "id, code, name, region, subregion, capital, population, flag_url, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteCountryStore {
    db_path: PathBuf,
}

impl SqliteCountryStore {
    /// Opens the store and ensures the schema exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let conn = open(&db_path)?;
        ensure_schema(&conn)?;
        Ok(Self { db_path })
    }
}

#[async_trait]
impl CountryStore for SqliteCountryStore {
    async fn find_all(&self) -> Result<Vec<Country>> {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM countries", COUNTRY_COLUMNS))?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(country_from_row(row, 0)?);
            }
            Ok::<_, WayfareError>(out)
        })
        .await?
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Country>> {
        let db_path = self.db_path.clone();
        let code = code.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM countries WHERE code = ?1",
                COUNTRY_COLUMNS
            ))?;
            let mut rows = stmt.query(params![code])?;
            match rows.next()? {
                Some(row) => Ok(Some(country_from_row(row, 0)?)),
                None => Ok::<_, WayfareError>(None),
            }
        })
        .await?
    }

    async fn find_by_id(&self, id: &CountryId) -> Result<Option<Country>> {
        let db_path = self.db_path.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM countries WHERE id = ?1",
                COUNTRY_COLUMNS
            ))?;
            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => Ok(Some(country_from_row(row, 0)?)),
                None => Ok::<_, WayfareError>(None),
            }
        })
        .await?
    }

    async fn insert(&self, country: &CountryApiData) -> Result<()> {
        let db_path = self.db_path.clone();
        let country = country.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let now = Utc::now().to_rfc3339();
            // A concurrent insert of the same code loses quietly; the
            // caller re-reads and serves whichever row won.
            conn.execute(
                r#"
                INSERT INTO countries
                    (id, code, name, region, subregion, capital, population, flag_url, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT(code) DO NOTHING
                "#,
                params![
                    Uuid::new_v4().to_string(),
                    country.code,
                    country.name,
                    country.region,
                    country.subregion,
                    country.capital,
                    country.population as i64,
                    country.flag_url,
                    now,
                    now,
                ],
            )?;
            Ok::<_, WayfareError>(())
        })
        .await?
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool> {
        let db_path = self.db_path.clone();
        let code = code.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let affected = conn.execute("DELETE FROM countries WHERE code = ?1", params![code])?;
            Ok::<_, WayfareError>(affected > 0)
        })
        .await?
    }
}

#[derive(Clone)]
pub struct SqliteTravelPlanStore {
    db_path: PathBuf,
}

impl SqliteTravelPlanStore {
    /// Opens the store and ensures the schema exists. Safe to point at the
    /// same database file as the country store; they share the schema.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let conn = open(&db_path)?;
        ensure_schema(&conn)?;
        Ok(Self { db_path })
    }
}

const PLAN_VIEW_QUERY: &str = r#"
    SELECT p.id, p.title, p.start_date, p.end_date, p.notes, p.created_at, p.updated_at,
           c.id, c.code, c.name, c.region, c.subregion, c.capital, c.population,
           c.flag_url, c.created_at, c.updated_at
    FROM travel_plans p
    JOIN countries c ON c.id = p.country_id
"#;

fn plan_view_from_row(row: &Row<'_>) -> Result<TravelPlanView> {
    let start_date: String = row.get(2)?;
    let end_date: String = row.get(3)?;
    let notes_json: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;
    let notes: Vec<String> = serde_json::from_str(&notes_json)
        .map_err(|e| WayfareError::store(format!("corrupt notes column: {}", e)))?;
    Ok(TravelPlanView {
        id: PlanId(row.get(0)?),
        title: row.get(1)?,
        start_date: parse_date(&start_date)?,
        end_date: parse_date(&end_date)?,
        notes,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        country: country_from_row(row, 7)?,
    })
}

#[async_trait]
impl TravelPlanStore for SqliteTravelPlanStore {
    async fn insert(&self, plan: &TravelPlanRecord) -> Result<PlanId> {
        let db_path = self.db_path.clone();
        let plan = plan.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let id = Uuid::new_v4().to_string();
            let now = Utc::now().to_rfc3339();
            let notes = serde_json::to_string(&plan.notes)
                .map_err(|e| WayfareError::store(format!("notes not serializable: {}", e)))?;
            conn.execute(
                r#"
                INSERT INTO travel_plans
                    (id, country_id, title, start_date, end_date, notes, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    id,
                    plan.country_id.to_string(),
                    plan.title,
                    plan.start_date.format(DATE_FORMAT).to_string(),
                    plan.end_date.format(DATE_FORMAT).to_string(),
                    notes,
                    now,
                    now,
                ],
            )?;
            Ok::<_, WayfareError>(PlanId(id))
        })
        .await?
    }

    async fn find_all(&self) -> Result<Vec<TravelPlanView>> {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt = conn.prepare(PLAN_VIEW_QUERY)?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(plan_view_from_row(row)?);
            }
            Ok::<_, WayfareError>(out)
        })
        .await?
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<TravelPlanView>> {
        let db_path = self.db_path.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt = conn.prepare(&format!("{} WHERE p.id = ?1", PLAN_VIEW_QUERY))?;
            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => Ok(Some(plan_view_from_row(row)?)),
                None => Ok::<_, WayfareError>(None),
            }
        })
        .await?
    }
}
