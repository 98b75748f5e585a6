use crate::config::EmptyTermPolicy;
use crate::db::models::{CardFilter, CardId, FlashCard, InsertOutcome, NewCard};
use crate::db::schema::SQLITE_INIT;
use crate::error::MenuError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::{debug, warn};

pub type SqlitePool = Pool<Sqlite>;

const SELECT_CARDS: &str = "SELECT uid, english_card, vietnamese_card FROM flash_cards";

#[derive(Clone)]
pub struct CardStore {
    pool: SqlitePool,
    empty_term: EmptyTermPolicy,
}

impl CardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            empty_term: EmptyTermPolicy::default(),
        }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, MenuError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Single connection, never recycled: one user action at a time, and
        // `sqlite::memory:` databases live exactly as long as their connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn with_empty_term_policy(mut self, policy: EmptyTermPolicy) -> Self {
        self.empty_term = policy;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), MenuError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert one card, ignoring it when the pair already exists.
    pub async fn insert(&self, card: &NewCard) -> InsertOutcome {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO flash_cards (english_card, vietnamese_card) VALUES (?, ?)",
        )
        .bind(card.english.as_deref())
        .bind(card.vietnamese.as_deref())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                let id = done.last_insert_rowid();
                debug!(id, "flash card inserted");
                InsertOutcome::Inserted(id)
            }
            Ok(_) => {
                debug!(english = ?card.english, vietnamese = ?card.vietnamese, "duplicate flash card ignored");
                InsertOutcome::Ignored
            }
            Err(e) => {
                warn!(error = %e, "flash card insert failed");
                InsertOutcome::Failed(e.to_string())
            }
        }
    }

    /// Batch insert using a single transaction. Outcomes are in input order.
    pub async fn insert_many(&self, cards: &[NewCard]) -> Result<Vec<InsertOutcome>, MenuError> {
        let mut tx = self.pool.begin().await?;
        let mut outcomes = Vec::with_capacity(cards.len());

        for card in cards {
            let done = sqlx::query(
                "INSERT OR IGNORE INTO flash_cards (english_card, vietnamese_card) VALUES (?, ?)",
            )
            .bind(card.english.as_deref())
            .bind(card.vietnamese.as_deref())
            .execute(&mut *tx)
            .await?;

            outcomes.push(if done.rows_affected() > 0 {
                InsertOutcome::Inserted(done.last_insert_rowid())
            } else {
                InsertOutcome::Ignored
            });
        }

        tx.commit().await?;
        Ok(outcomes)
    }

    pub async fn get_all(&self) -> Result<Vec<FlashCard>, MenuError> {
        let cards = sqlx::query_as::<_, FlashCard>(&format!("{SELECT_CARDS} ORDER BY uid"))
            .fetch_all(&self.pool)
            .await?;
        Ok(cards)
    }

    pub async fn get_by_id(&self, id: CardId) -> Result<Option<FlashCard>, MenuError> {
        let card = sqlx::query_as::<_, FlashCard>(&format!("{SELECT_CARDS} WHERE uid = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(card)
    }

    /// Uniform random sample without replacement; all cards when fewer than `n` exist.
    pub async fn get_random_subset(&self, n: usize) -> Result<Vec<FlashCard>, MenuError> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let cards =
            sqlx::query_as::<_, FlashCard>(&format!("{SELECT_CARDS} ORDER BY RANDOM() LIMIT ?"))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
        Ok(cards)
    }

    pub async fn get_by_pair(
        &self,
        english: Option<&str>,
        vietnamese: Option<&str>,
    ) -> Result<Option<FlashCard>, MenuError> {
        let card = sqlx::query_as::<_, FlashCard>(&format!(
            "{SELECT_CARDS} WHERE english_card IS ? AND vietnamese_card IS ? LIMIT 1"
        ))
        .bind(english)
        .bind(vietnamese)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    pub async fn get_filtered(&self, filter: &CardFilter) -> Result<Vec<FlashCard>, MenuError> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_CARDS);
        qb.push(" WHERE 1 = 1");
        self.push_term(&mut qb, "english_card", &filter.english, filter.exact_english);
        self.push_term(
            &mut qb,
            "vietnamese_card",
            &filter.vietnamese,
            filter.exact_vietnamese,
        );
        qb.push(" ORDER BY uid");

        let cards = qb
            .build_query_as::<FlashCard>()
            .fetch_all(&self.pool)
            .await?;
        debug!(?filter, found = cards.len(), "filtered search");
        Ok(cards)
    }

    fn push_term(&self, qb: &mut QueryBuilder<'_, Sqlite>, column: &str, term: &str, exact: bool) {
        if term.is_empty() {
            if self.empty_term == EmptyTermPolicy::MatchNone {
                qb.push(" AND 0");
            }
            return;
        }
        if exact {
            qb.push(format_args!(" AND {column} = "));
            qb.push_bind(term.to_owned());
        } else {
            qb.push(format_args!(" AND instr({column}, "));
            qb.push_bind(term.to_owned());
            qb.push(") > 0");
        }
    }

    /// Returns the number of rows changed (0 when `id` does not exist).
    pub async fn update_by_id(
        &self,
        id: CardId,
        english: Option<&str>,
        vietnamese: Option<&str>,
    ) -> Result<u64, MenuError> {
        let done =
            sqlx::query("UPDATE flash_cards SET english_card = ?, vietnamese_card = ? WHERE uid = ?")
                .bind(english)
                .bind(vietnamese)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(MenuError::from_write)?;
        Ok(done.rows_affected())
    }

    pub async fn update_by_pair(
        &self,
        old_english: Option<&str>,
        old_vietnamese: Option<&str>,
        new_english: Option<&str>,
        new_vietnamese: Option<&str>,
    ) -> Result<u64, MenuError> {
        let done = sqlx::query(
            r#"UPDATE flash_cards SET english_card = ?, vietnamese_card = ?
               WHERE english_card IS ? AND vietnamese_card IS ?"#,
        )
        .bind(new_english)
        .bind(new_vietnamese)
        .bind(old_english)
        .bind(old_vietnamese)
        .execute(&self.pool)
        .await
        .map_err(MenuError::from_write)?;
        Ok(done.rows_affected())
    }

    pub async fn delete_by_id(&self, id: CardId) -> Result<bool, MenuError> {
        let done = sqlx::query("DELETE FROM flash_cards WHERE uid = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn delete_by_pair(
        &self,
        english: Option<&str>,
        vietnamese: Option<&str>,
    ) -> Result<u64, MenuError> {
        let done =
            sqlx::query("DELETE FROM flash_cards WHERE english_card IS ? AND vietnamese_card IS ?")
                .bind(english)
                .bind(vietnamese)
                .execute(&self.pool)
                .await?;
        Ok(done.rows_affected())
    }

    pub async fn count(&self) -> Result<i64, MenuError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flash_cards")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}
