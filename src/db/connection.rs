use rusqlite::Connection;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{PipelineError, PipelineResult};

// Thread-local connection slot, tagged with the file it was opened on.
thread_local! {
    static DB_CONN: RefCell<Option<(PathBuf, Connection)>> = const { RefCell::new(None) };
}

#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> PipelineResult<T>
    where
        F: FnOnce(&mut Connection) -> PipelineResult<T>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let stale = !matches!(slot.as_ref(), Some((p, _)) if *p == self.path);
                if stale {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| PipelineError::Db(format!("Open DB failed: {e}")))?;
                    *slot = Some((self.path.clone(), conn));
                }
                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(PipelineError::Db("Connection slot empty".into())),
                }
            })
            .map_err(|_| PipelineError::Db("Thread-local connection unavailable".into()))?
    }
}

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Creates the catalog tables if they do not exist yet.
pub fn init_db(db: &Database) -> PipelineResult<()> {
    apply_schema(db, SCHEMA_SQL)?;
    info!(db = %db.path().display(), "Database initialized");
    Ok(())
}

pub fn apply_schema(db: &Database, schema_sql: &str) -> PipelineResult<()> {
    db.with_conn(|conn| {
        conn.execute_batch(schema_sql)
            .map_err(|e| PipelineError::Db(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })
}
