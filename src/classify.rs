//! Known-error classification (SQLSTATE / driver-code categorization).
//!
//! A [`sea_orm::DbErr`] coming out of a failed statement usually wraps a
//! driver-level [`sqlx::error::DatabaseError`] carrying a machine-readable
//! code and free-form metadata. The predicates here turn that into a yes/no
//! answer at the call site: "was this a unique violation on `users.email`?"
//! instead of string-matching in application code.

use sea_orm::{DbErr, RuntimeErr};
use sqlx::error::{DatabaseError, ErrorKind};

/// Error categories the classifier can recognize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    NotNullViolation,
    CheckViolation,
    /// SeaORM-level "no such row" error ([`DbErr::RecordNotFound`]).
    RecordNotFound,
}

/// Classify a SeaORM error, if it represents a known database error.
///
/// Returns `None` for errors carrying no driver payload (`DbErr::Custom`,
/// type conversion failures, connection acquisition, ...).
pub fn classify(err: &DbErr) -> Option<DbErrorKind> {
    if matches!(err, DbErr::RecordNotFound(_)) {
        return Some(DbErrorKind::RecordNotFound);
    }
    database_error(err).and_then(classify_database_error)
}

/// Classify a driver-level error directly.
pub fn classify_database_error(db: &dyn DatabaseError) -> Option<DbErrorKind> {
    match db.kind() {
        ErrorKind::UniqueViolation => return Some(DbErrorKind::UniqueViolation),
        ErrorKind::ForeignKeyViolation => return Some(DbErrorKind::ForeignKeyViolation),
        ErrorKind::NotNullViolation => return Some(DbErrorKind::NotNullViolation),
        ErrorKind::CheckViolation => return Some(DbErrorKind::CheckViolation),
        _ => {}
    }
    // Drivers that report `ErrorKind::Other` still expose the raw code.
    db.code().and_then(|code| kind_for_code(code.as_ref()))
}

/// Map a backend error code to a kind across popular backends
/// (SQLSTATE for Postgres, extended result codes for SQLite, errno for MySQL).
pub fn kind_for_code(code: &str) -> Option<DbErrorKind> {
    match code {
        // Postgres 23505, SQLite 1555/2067, MySQL 1062
        "23505" | "1555" | "2067" | "1062" => Some(DbErrorKind::UniqueViolation),
        // Postgres 23503, SQLite 787, MySQL 1216/1217/1451/1452
        "23503" | "787" | "1216" | "1217" | "1451" | "1452" => {
            Some(DbErrorKind::ForeignKeyViolation)
        }
        // Postgres 23502, SQLite 1299, MySQL 1048/1364
        "23502" | "1299" | "1048" | "1364" => Some(DbErrorKind::NotNullViolation),
        // Postgres 23514, SQLite 275, MySQL 3819
        "23514" | "275" | "3819" => Some(DbErrorKind::CheckViolation),
        _ => None,
    }
}

/// The driver-level error wrapped by a SeaORM error, if any.
pub fn database_error(err: &DbErr) -> Option<&(dyn DatabaseError + 'static)> {
    match err {
        DbErr::Conn(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e)) => e.as_database_error(),
        _ => None,
    }
}

/// The raw backend error code of the wrapped driver error, if any.
pub fn error_code(err: &DbErr) -> Option<String> {
    database_error(err).and_then(|db| db.code().map(|code| code.into_owned()))
}

/// Does `err` match `kind`, optionally scoped to a table and affected columns?
///
/// Scoping is a "mention" check: the table must appear in the driver's table
/// metadata, constraint name or message, and each column must appear in the
/// constraint name or message. Drivers expose affected-field metadata as
/// free-form text (SQLite only in the message), so substring matching is as
/// precise as it gets across backends. Filters only narrow: an error of a
/// different kind never matches, whatever the scoping says.
pub fn is_db_error(
    err: &DbErr,
    kind: DbErrorKind,
    table: Option<&str>,
    columns: Option<&[&str]>,
) -> bool {
    if classify(err) != Some(kind) {
        return false;
    }
    match database_error(err) {
        Some(db) => {
            table.map_or(true, |t| mentions_table(db, t))
                && columns.map_or(true, |cols| cols.iter().all(|col| mentions(db, col)))
        }
        // RecordNotFound only carries a message
        None => {
            let text = err.to_string();
            table.map_or(true, |t| text.contains(t))
                && columns.map_or(true, |cols| cols.iter().all(|col| text.contains(col)))
        }
    }
}

/// Shorthand for [`is_db_error`] with [`DbErrorKind::UniqueViolation`].
pub fn is_unique_violation(err: &DbErr, table: Option<&str>, columns: Option<&[&str]>) -> bool {
    is_db_error(err, DbErrorKind::UniqueViolation, table, columns)
}

/// Shorthand for [`is_db_error`] with [`DbErrorKind::ForeignKeyViolation`].
pub fn is_foreign_key_violation(
    err: &DbErr,
    table: Option<&str>,
    columns: Option<&[&str]>,
) -> bool {
    is_db_error(err, DbErrorKind::ForeignKeyViolation, table, columns)
}

/// Shorthand for [`is_db_error`] with [`DbErrorKind::RecordNotFound`],
/// optionally scoped to the entity named in the message.
pub fn is_record_not_found(err: &DbErr, entity: Option<&str>) -> bool {
    is_db_error(err, DbErrorKind::RecordNotFound, entity, None)
}

fn mentions_table(db: &dyn DatabaseError, table: &str) -> bool {
    db.table() == Some(table) || mentions(db, table)
}

fn mentions(db: &dyn DatabaseError, name: &str) -> bool {
    db.constraint().is_some_and(|c| c.contains(name)) || db.message().contains(name)
}

// ===================== tests =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_table_covers_popular_backends() {
        assert_eq!(kind_for_code("23505"), Some(DbErrorKind::UniqueViolation));
        assert_eq!(kind_for_code("2067"), Some(DbErrorKind::UniqueViolation));
        assert_eq!(kind_for_code("1062"), Some(DbErrorKind::UniqueViolation));
        assert_eq!(
            kind_for_code("23503"),
            Some(DbErrorKind::ForeignKeyViolation)
        );
        assert_eq!(kind_for_code("1452"), Some(DbErrorKind::ForeignKeyViolation));
        assert_eq!(kind_for_code("23502"), Some(DbErrorKind::NotNullViolation));
        assert_eq!(kind_for_code("23514"), Some(DbErrorKind::CheckViolation));
        // serialization failure is not a constraint violation
        assert_eq!(kind_for_code("40001"), None);
    }

    #[test]
    fn errors_without_driver_payload_do_not_classify() {
        assert_eq!(classify(&DbErr::Custom("boom".into())), None);
        assert_eq!(classify(&DbErr::Type("bad decode".into())), None);
        assert!(!is_unique_violation(&DbErr::Custom("boom".into()), None, None));
    }

    #[test]
    fn record_not_found_scopes_by_message() {
        let err = DbErr::RecordNotFound("users: row not found".into());
        assert_eq!(classify(&err), Some(DbErrorKind::RecordNotFound));
        assert!(is_record_not_found(&err, None));
        assert!(is_record_not_found(&err, Some("users")));
        assert!(!is_record_not_found(&err, Some("posts")));
        // kind mismatch beats any scoping
        assert!(!is_unique_violation(&err, Some("users"), None));
    }
}
