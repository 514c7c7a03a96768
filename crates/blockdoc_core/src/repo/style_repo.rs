//! Style profile repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `StyleProfile::validate()` before SQL mutations.
//! - Listing is scoped to one user and ordered `name ASC, style_id ASC`.

use crate::completion::provider::StyleLookup;
use crate::model::style::{MarketAwareness, MarketSophistication, StyleProfile};
use crate::repo::document_repo::{RepoError, RepoResult};
use crate::repo::ensure_schema;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const STYLE_SELECT_SQL: &str = "SELECT
    style_id,
    user_id,
    name,
    market_awareness,
    market_sophistication,
    product_name,
    big_problem,
    big_promise,
    problem_mechanism,
    solution_mechanism,
    proof_elements,
    training_data,
    purpose,
    created_at
FROM ai_styles";

/// Repository interface for style profile CRUD.
pub trait StyleRepository {
    /// Persists a new profile; an empty `id` gets a generated one.
    fn create_style(&self, style: &StyleProfile) -> RepoResult<String>;
    fn update_style(&self, style: &StyleProfile) -> RepoResult<()>;
    fn delete_style(&self, style_id: &str) -> RepoResult<()>;
    fn get_style(&self, style_id: &str) -> RepoResult<Option<StyleProfile>>;
    fn list_styles(&self, user_id: &str) -> RepoResult<Vec<StyleProfile>>;
}

/// SQLite-backed style repository.
pub struct SqliteStyleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStyleRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            "ai_styles",
            &["style_id", "user_id", "name", "market_awareness", "training_data"],
        )?;
        Ok(Self { conn })
    }
}

impl StyleRepository for SqliteStyleRepository<'_> {
    fn create_style(&self, style: &StyleProfile) -> RepoResult<String> {
        style
            .validate()
            .map_err(|err| RepoError::Validation(err.to_string()))?;
        let style_id = if style.id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            style.id.clone()
        };

        self.conn.execute(
            "INSERT INTO ai_styles (
                style_id,
                user_id,
                name,
                market_awareness,
                market_sophistication,
                product_name,
                big_problem,
                big_promise,
                problem_mechanism,
                solution_mechanism,
                proof_elements,
                training_data,
                purpose,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                style_id,
                style.user_id,
                style.name,
                style.market_awareness.label(),
                style.market_sophistication.label(),
                style.product_name,
                style.big_problem,
                style.big_promise,
                style.problem_mechanism,
                style.solution_mechanism,
                style.proof_elements,
                style.training_data,
                style.purpose,
                style.created_at,
            ],
        )?;

        Ok(style_id)
    }

    fn update_style(&self, style: &StyleProfile) -> RepoResult<()> {
        style
            .validate()
            .map_err(|err| RepoError::Validation(err.to_string()))?;

        let changed = self.conn.execute(
            "UPDATE ai_styles
             SET
                name = ?2,
                market_awareness = ?3,
                market_sophistication = ?4,
                product_name = ?5,
                big_problem = ?6,
                big_promise = ?7,
                problem_mechanism = ?8,
                solution_mechanism = ?9,
                proof_elements = ?10,
                training_data = ?11,
                purpose = ?12
             WHERE style_id = ?1;",
            params![
                style.id,
                style.name,
                style.market_awareness.label(),
                style.market_sophistication.label(),
                style.product_name,
                style.big_problem,
                style.big_promise,
                style.problem_mechanism,
                style.solution_mechanism,
                style.proof_elements,
                style.training_data,
                style.purpose,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(style.id.clone()));
        }
        Ok(())
    }

    fn delete_style(&self, style_id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM ai_styles WHERE style_id = ?1;", [style_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(style_id.to_string()));
        }
        Ok(())
    }

    fn get_style(&self, style_id: &str) -> RepoResult<Option<StyleProfile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STYLE_SELECT_SQL} WHERE style_id = ?1;"))?;
        let row = stmt
            .query_row([style_id], |row| Ok(parse_style_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_styles(&self, user_id: &str) -> RepoResult<Vec<StyleProfile>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STYLE_SELECT_SQL} WHERE user_id = ?1 ORDER BY name ASC, style_id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut styles = Vec::new();
        while let Some(row) = rows.next()? {
            styles.push(parse_style_row(row)?);
        }
        Ok(styles)
    }
}

impl StyleLookup for SqliteStyleRepository<'_> {
    fn find_style(&self, style_id: &str) -> Option<StyleProfile> {
        match self.get_style(style_id) {
            Ok(style) => style,
            Err(err) => {
                warn!("event=style_lookup module=repo status=error style_id={style_id} error={err}");
                None
            }
        }
    }
}

fn parse_style_row(row: &Row<'_>) -> RepoResult<StyleProfile> {
    let awareness_text: String = row.get("market_awareness")?;
    let market_awareness = MarketAwareness::from_label(&awareness_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid market awareness `{awareness_text}` in ai_styles.market_awareness"
        ))
    })?;

    let sophistication_text: String = row.get("market_sophistication")?;
    let market_sophistication = MarketSophistication::from_label(&sophistication_text)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid market sophistication `{sophistication_text}` in ai_styles.market_sophistication"
            ))
        })?;

    Ok(StyleProfile {
        id: row.get("style_id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        market_awareness,
        market_sophistication,
        product_name: row.get("product_name")?,
        big_problem: row.get("big_problem")?,
        big_promise: row.get("big_promise")?,
        problem_mechanism: row.get("problem_mechanism")?,
        solution_mechanism: row.get("solution_mechanism")?,
        proof_elements: row.get("proof_elements")?,
        training_data: row.get("training_data")?,
        purpose: row.get("purpose")?,
        created_at: row.get("created_at")?,
    })
}
