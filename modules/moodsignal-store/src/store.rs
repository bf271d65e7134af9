// SQLite persistence for text scores and demographic submissions.
//
// Every operation opens its own connection and closes it when done. There is
// no pooling and no retry; concurrent writers for the same handle race and
// the last write wins.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use moodsignal_common::{Handle, Questionnaire};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tracing::{debug, info};

use crate::error::Result;

/// A row from the text_scores table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TextScoreRecord {
    pub handle: String,
    pub text_score: f64,
    pub scored_at: NaiveDateTime,
}

/// A row from the demographics table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DemographicRecord {
    pub handle: String,
    pub age: i64,
    pub gender: String,
    pub profession: String,
    pub academic_pressure: f64,
    pub work_pressure: f64,
    pub study_satisfaction: f64,
    pub job_satisfaction: f64,
    pub sleep_duration: String,
    pub dietary_habits: String,
    pub degree: String,
    pub suicidal_thoughts: String,
    pub work_study_hours: f64,
    pub financial_stress: f64,
    pub family_history: String,
    /// Class predicted when the answers were submitted. Informational only.
    pub submitted_class: i64,
    pub submitted_score: f64,
    pub submitted_at: NaiveDateTime,
}

impl DemographicRecord {
    pub fn questionnaire(&self) -> Questionnaire {
        Questionnaire {
            age: self.age,
            gender: self.gender.clone(),
            profession: self.profession.clone(),
            academic_pressure: self.academic_pressure,
            work_pressure: self.work_pressure,
            study_satisfaction: self.study_satisfaction,
            job_satisfaction: self.job_satisfaction,
            sleep_duration: self.sleep_duration.clone(),
            dietary_habits: self.dietary_habits.clone(),
            degree: self.degree.clone(),
            suicidal_thoughts: self.suicidal_thoughts.clone(),
            work_study_hours: self.work_study_hours,
            financial_stress: self.financial_stress,
            family_history: self.family_history.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Store {
    /// The database file is created on first connect if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        sqlx::migrate!("./migrations").run(&mut conn).await?;
        conn.close().await?;
        info!(path = %self.path.display(), "Database migrated");
        Ok(())
    }

    /// Insert or replace the text score for a handle.
    pub async fn upsert_text_score(&self, handle: &Handle, text_score: f64) -> Result<()> {
        let mut conn = self.connect().await?;
        sqlx::query("INSERT OR REPLACE INTO text_scores (handle, text_score) VALUES (?, ?)")
            .bind(handle.as_str())
            .bind(text_score)
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        info!(handle = %handle, text_score, "Stored text score");
        Ok(())
    }

    pub async fn text_score(&self, handle: &Handle) -> Result<Option<TextScoreRecord>> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, TextScoreRecord>(
            "SELECT handle, text_score, scored_at FROM text_scores WHERE handle = ?",
        )
        .bind(handle.as_str())
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        debug!(handle = %handle, found = row.is_some(), "Looked up text score");
        Ok(row)
    }

    /// Insert or replace the questionnaire for a handle, along with the
    /// prediction made from it at submission time.
    pub async fn upsert_demographics(
        &self,
        handle: &Handle,
        questionnaire: &Questionnaire,
        submitted_class: u8,
        submitted_score: f64,
    ) -> Result<()> {
        let mut conn = self.connect().await?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO demographics (
                handle, age, gender, profession, academic_pressure, work_pressure,
                study_satisfaction, job_satisfaction, sleep_duration, dietary_habits,
                degree, suicidal_thoughts, work_study_hours, financial_stress,
                family_history, submitted_class, submitted_score
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(handle.as_str())
        .bind(questionnaire.age)
        .bind(&questionnaire.gender)
        .bind(&questionnaire.profession)
        .bind(questionnaire.academic_pressure)
        .bind(questionnaire.work_pressure)
        .bind(questionnaire.study_satisfaction)
        .bind(questionnaire.job_satisfaction)
        .bind(&questionnaire.sleep_duration)
        .bind(&questionnaire.dietary_habits)
        .bind(&questionnaire.degree)
        .bind(&questionnaire.suicidal_thoughts)
        .bind(questionnaire.work_study_hours)
        .bind(questionnaire.financial_stress)
        .bind(&questionnaire.family_history)
        .bind(i64::from(submitted_class))
        .bind(submitted_score)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        info!(handle = %handle, submitted_class, "Stored demographics");
        Ok(())
    }

    pub async fn demographics(&self, handle: &Handle) -> Result<Option<DemographicRecord>> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, DemographicRecord>(
            r#"
            SELECT handle, age, gender, profession, academic_pressure, work_pressure,
                   study_satisfaction, job_satisfaction, sleep_duration, dietary_habits,
                   degree, suicidal_thoughts, work_study_hours, financial_stress,
                   family_history, submitted_class, submitted_score, submitted_at
            FROM demographics WHERE handle = ?
            "#,
        )
        .bind(handle.as_str())
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        debug!(handle = %handle, found = row.is_some(), "Looked up demographics");
        Ok(row)
    }

    /// Row counts of (text_scores, demographics).
    pub async fn counts(&self) -> Result<(i64, i64)> {
        let mut conn = self.connect().await?;
        let text: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM text_scores")
            .fetch_one(&mut conn)
            .await?;
        let demographics: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM demographics")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;
        Ok((text, demographics))
    }
}
