#![allow(dead_code)]
use anyhow::Result;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub struct DbUnderTest {
    pub db: DatabaseConnection,
    // Keeps the database file alive for the test duration.
    _dir: TempDir,
}

/// File-backed SQLite with a tiny schema exercising every constraint the
/// classifier recognizes. Single connection so pragmas stick.
#[cfg(feature = "sqlite")]
pub async fn bring_up_sqlite() -> Result<DbUnderTest> {
    use sea_orm::{ConnectionTrait, ConnectOptions, Database};

    let dir = TempDir::new()?;
    let path = dir.path().join(format!("modkit_tx_{}.db", std::process::id()));

    let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opts.max_connections(1);
    let db = Database::connect(opts).await?;

    db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
    db.execute_unprepared(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            display_name TEXT
        )",
    )
    .await?;
    db.execute_unprepared(
        "CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            author INTEGER NOT NULL REFERENCES users(id),
            title TEXT NOT NULL CONSTRAINT posts_title_nonempty CHECK (length(title) > 0)
        )",
    )
    .await?;

    Ok(DbUnderTest { db, _dir: dir })
}

#[cfg(feature = "sqlite")]
pub async fn user_count(db: &DatabaseConnection) -> Result<i64> {
    use sea_orm::{ConnectionTrait, DbBackend, Statement};

    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM users".to_owned(),
        ))
        .await?
        .expect("count query returns a row");
    let n: i64 = row.try_get("", "n")?;
    Ok(n)
}
