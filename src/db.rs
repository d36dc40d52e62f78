use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio::task::JoinHandle;
use tokio_postgres::Row;
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::{CreateMcqRequest, CreateUserRequest, Mcq, UpdateMcqRequest, User};

/// How often the background task looks for idle connections to evict.
const RECYCLE_CHECK_INTERVAL: Duration = Duration::from_secs(30);

const MCQ_COLUMNS: &str = "id, subject, chapter, question, correctanswer, option1, option2, option3, option4";
const USER_COLUMNS: &str = "id, username";

/// Schema bootstrap, applied in order. Every statement is idempotent.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "users table",
        r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                username VARCHAR NOT NULL
            )
        "#,
    ),
    (
        "users username index",
        "CREATE INDEX IF NOT EXISTS ix_users_username ON users(username)",
    ),
    (
        "mcqs table",
        r#"
            CREATE TABLE IF NOT EXISTS mcqs (
                id SERIAL PRIMARY KEY,
                subject VARCHAR NOT NULL,
                chapter VARCHAR NOT NULL,
                question VARCHAR NOT NULL,
                correctanswer VARCHAR NOT NULL,
                option1 VARCHAR NOT NULL,
                option2 VARCHAR NOT NULL,
                option3 VARCHAR,
                option4 VARCHAR
            )
        "#,
    ),
    (
        "mcqs subject index",
        "CREATE INDEX IF NOT EXISTS ix_mcqs_subject ON mcqs(subject)",
    ),
    (
        "mcqs question index",
        "CREATE INDEX IF NOT EXISTS ix_mcqs_question ON mcqs(question)",
    ),
];

/// Long-lived handle on the PostgreSQL connection pool.
///
/// Built once at startup and shared with every handler through axum state.
/// Handlers never touch the pool directly: they open a [`Session`].
#[derive(Clone)]
pub struct Database {
    pool: Pool,
    recycle_after: Duration,
}

/// One pooled connection, checked out for the duration of a single request.
///
/// The underlying [`Object`] returns the connection to the pool when the
/// session is dropped, whether the handler succeeded, failed or panicked.
pub struct Session {
    client: Object,
}

impl Database {
    /// Builds the pool and runs `SELECT 1` so a bad `DATABASE_URL` fails at
    /// startup rather than on the first request.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}", config.display_host());

        let db = Self::connect_lazy(config)?;
        db.test_connection().await?;

        Ok(db)
    }

    /// Builds the pool without opening any connection.
    pub fn connect_lazy(config: DatabaseConfig) -> Result<Self, ApiError> {
        let recycle_after = config.recycle_after;
        let pool = Self::create_pool(config)?;

        Ok(Database { pool, recycle_after })
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        // Neon and most hosted Postgres only accept TLS
        let tls_connector = TlsConnector::builder()
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Database(format!("TLS connector creation failed: {}", e))
            })?;
        let tls = MakeTlsConnector::new(tls_connector);

        let manager = Manager::from_config(
            config.pg,
            tls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    /// Checks one connection out of the pool for the current request.
    pub async fn session(&self) -> Result<Session, ApiError> {
        let client = self.pool.get().await?;
        Ok(Session { client })
    }

    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let session = self.session().await?;

        session.client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::Database(format!("Connection test failed: {}", e))
            })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// Creates both tables and their indexes if they do not exist yet.
    /// Safe to run against an already initialised database.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let session = self.session().await?;

        for (label, statement) in MIGRATIONS {
            session.client.batch_execute(statement)
                .await
                .map_err(|e| {
                    error!("Failed to apply {}: {}", label, e);
                    ApiError::Database(format!("Migration '{}' failed: {}", label, e))
                })?;
            debug!("Applied {}", label);
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Evicts connections that have sat idle in the pool for longer than the
    /// configured recycle interval. Runs until the runtime shuts down.
    pub fn spawn_recycler(&self) -> JoinHandle<()> {
        let pool = self.pool.clone();
        let max_idle = self.recycle_after;

        info!("Recycling pooled connections idle for more than {}s", max_idle.as_secs());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(RECYCLE_CHECK_INTERVAL.min(max_idle));
            loop {
                ticker.tick().await;

                let before = pool.status().size;
                pool.retain(|_, metrics| metrics.last_used() < max_idle);
                let after = pool.status().size;

                if after < before {
                    debug!("Recycled {} idle database connections", before - after);
                }
            }
        })
    }
}

fn mcq_from_row(row: &Row) -> Mcq {
    Mcq {
        id: row.get("id"),
        subject: row.get("subject"),
        chapter: row.get("chapter"),
        question: row.get("question"),
        correct_answer: row.get("correctanswer"),
        option1: row.get("option1"),
        option2: row.get("option2"),
        option3: row.get("option3"),
        option4: row.get("option4"),
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
    }
}

impl Session {
    // Mcq operations

    pub async fn create_mcq(&self, request: CreateMcqRequest) -> Result<Mcq, ApiError> {
        let query = format!(
            "INSERT INTO mcqs (subject, chapter, question, correctanswer, option1, option2, option3, option4) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            MCQ_COLUMNS
        );

        let row = self.client.query_one(
            query.as_str(),
            &[
                &request.subject,
                &request.chapter,
                &request.question,
                &request.correct_answer,
                &request.option1,
                &request.option2,
                &request.option3,
                &request.option4,
            ],
        )
        .await?;

        let mcq = mcq_from_row(&row);
        info!("Created mcq with id: {}", mcq.id);
        Ok(mcq)
    }

    pub async fn find_mcq(&self, id: i32) -> Result<Option<Mcq>, ApiError> {
        let query = format!("SELECT {} FROM mcqs WHERE id = $1", MCQ_COLUMNS);

        let row = self.client.query_opt(query.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(mcq_from_row))
    }

    pub async fn mcqs_by_subject(&self, subject: &str) -> Result<Vec<Mcq>, ApiError> {
        let query = format!("SELECT {} FROM mcqs WHERE subject = $1 ORDER BY id", MCQ_COLUMNS);

        let rows = self.client.query(query.as_str(), &[&subject]).await?;
        Ok(rows.iter().map(mcq_from_row).collect())
    }

    pub async fn mcqs_by_subject_and_chapter(&self, subject: &str, chapter: &str) -> Result<Vec<Mcq>, ApiError> {
        let query = format!(
            "SELECT {} FROM mcqs WHERE subject = $1 AND chapter = $2 ORDER BY id",
            MCQ_COLUMNS
        );

        let rows = self.client.query(query.as_str(), &[&subject, &chapter]).await?;
        Ok(rows.iter().map(mcq_from_row).collect())
    }

    /// Loads the record, overlays the supplied fields and writes the merged
    /// row back. An empty patch returns the stored record without writing.
    /// No row lock is taken: concurrent patches are last-write-wins.
    pub async fn update_mcq(&self, id: i32, patch: UpdateMcqRequest) -> Result<Mcq, ApiError> {
        let mut mcq = self.find_mcq(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("mcq {}", id)))?;

        if patch.is_empty() {
            debug!("Empty patch for mcq {}, nothing to write", id);
            return Ok(mcq);
        }

        mcq.apply_patch(patch);

        let query = format!(
            "UPDATE mcqs SET subject = $1, chapter = $2, question = $3, correctanswer = $4, \
             option1 = $5, option2 = $6, option3 = $7, option4 = $8 \
             WHERE id = $9 \
             RETURNING {}",
            MCQ_COLUMNS
        );

        let row = self.client.query_opt(
            query.as_str(),
            &[
                &mcq.subject,
                &mcq.chapter,
                &mcq.question,
                &mcq.correct_answer,
                &mcq.option1,
                &mcq.option2,
                &mcq.option3,
                &mcq.option4,
                &id,
            ],
        )
        .await?;

        // The row can vanish between the read and the write
        let updated = row
            .as_ref()
            .map(mcq_from_row)
            .ok_or_else(|| ApiError::not_found(format!("mcq {}", id)))?;

        info!("Updated mcq with id: {}", updated.id);
        Ok(updated)
    }

    /// Removes the record and returns its last stored values.
    pub async fn delete_mcq(&self, id: i32) -> Result<Mcq, ApiError> {
        let query = format!("DELETE FROM mcqs WHERE id = $1 RETURNING {}", MCQ_COLUMNS);

        let row = self.client.query_opt(query.as_str(), &[&id]).await?;

        match row {
            Some(row) => {
                let mcq = mcq_from_row(&row);
                info!("Deleted mcq with id: {}", mcq.id);
                Ok(mcq)
            }
            None => Err(ApiError::not_found(format!("mcq {}", id))),
        }
    }

    // User operations

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let query = format!("INSERT INTO users (username) VALUES ($1) RETURNING {}", USER_COLUMNS);

        let row = self.client.query_one(query.as_str(), &[&request.username]).await?;

        let user = user_from_row(&row);
        info!("Created user with id: {}", user.id);
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        let rows = self.client.query(query.as_str(), &[]).await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    pub async fn delete_user(&self, id: i32) -> Result<User, ApiError> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS);

        let row = self.client.query_opt(query.as_str(), &[&id]).await?;

        match row {
            Some(row) => {
                let user = user_from_row(&row);
                info!("Deleted user with id: {}", user.id);
                Ok(user)
            }
            None => Err(ApiError::not_found(format!("user {}", id))),
        }
    }
}
