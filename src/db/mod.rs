//! Read-only access to the analytical SQLite store.
//!
//! A dedicated worker thread owns the connection for the lifetime of the
//! `Database`; callers submit closures and await the reply over a oneshot
//! channel. The connection is released exactly once, when the handle drops,
//! regardless of how individual queries end.

use std::{
    path::PathBuf,
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use log::{error, info};
use rusqlite::{types::ValueRef, Connection, OpenFlags};
use serde_json::Value;
use tokio::sync::oneshot;

pub mod schema;

use crate::models::Row;
use crate::safety::starts_with_select;

type DbTask = Box<dyn FnOnce(&Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

/// Handle to the analytical store. Cheap to clone; all clones share the same
/// worker thread and read-only connection.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Open the store read-only. Fails if the file does not exist or is not
    /// a SQLite database.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("nyc311-db".into())
            .spawn(move || {
                let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                let conn = match Connection::open_with_flags(&path_for_thread, flags) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err).context(format!(
                            "failed to open analytical store at {}",
                            path_for_thread.display()
                        ))));
                        return;
                    }
                };

                // Belt-and-suspenders on top of the read-only open flags.
                if let Err(err) = conn.pragma_update(None, "query_only", "ON") {
                    error!("Failed to enable query_only mode: {err}");
                }

                if ready_tx.send(Ok(())).is_err() {
                    error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database thread shutting down");
            })
            .with_context(|| "failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Analytical store opened read-only at {}", db_path.display());

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                // Caller abandoned the run; the connection stays owned by the
                // worker, so nothing leaks.
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }

    /// Run a gated query and materialize every row eagerly, each as an
    /// ordered column-name-to-value map. Either the full result set comes
    /// back or an error; there are no partial results and no retries.
    pub async fn query_rows(&self, sql: &str) -> Result<Vec<Row>> {
        // Final defensive check; the safety gate has already run by the time
        // the engine sees the query.
        if !starts_with_select(sql) {
            bail!("refusing to execute non-SELECT query");
        }

        let sql = sql.to_string();
        let rows = self
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(&sql)
                    .with_context(|| "failed to prepare query")?;
                let columns: Vec<String> =
                    stmt.column_names().iter().map(|c| c.to_string()).collect();

                let mut rows = stmt.query([]).with_context(|| "failed to run query")?;
                let mut out: Vec<Row> = Vec::new();
                while let Some(row) = rows.next().with_context(|| "failed to read row")? {
                    let mut record: Row = IndexMap::with_capacity(columns.len());
                    for (index, name) in columns.iter().enumerate() {
                        let value = row
                            .get_ref(index)
                            .with_context(|| format!("failed to read column {name}"))?;
                        record.insert(name.clone(), value_to_json(value));
                    }
                    out.push(record);
                }
                Ok(out)
            })
            .await?;

        info!("Query returned {} rows", rows.len());
        Ok(rows)
    }
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<blob: {} bytes>", bytes.len())),
    }
}
