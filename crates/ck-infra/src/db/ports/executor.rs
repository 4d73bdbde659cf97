use diesel::{Connection, SqliteConnection};

/// Runs blocking diesel work on a pooled SQLite connection.
pub trait DbExecutor: Send + Sync {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T>;

    /// [`DbExecutor::run`] inside one transaction: every statement in `f`
    /// commits, or none does.
    fn run_in_transaction<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        self.run(|conn| conn.transaction::<_, anyhow::Error, _>(f))
    }
}
