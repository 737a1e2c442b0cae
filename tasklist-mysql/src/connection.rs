//! MySQL connection wrapper.

use mysql_async::prelude::*;
use mysql_async::{Conn, Params, Value};
use tracing::debug;

use crate::error::MysqlResult;

/// A wrapper around a single MySQL connection.
///
/// The wrapper exposes the handful of typed operations the migration
/// engine needs. Release is explicit: callers own the connection for one
/// scope and call [`disconnect`](Self::disconnect) on every exit path.
#[derive(Debug)]
pub struct MysqlConnection {
    conn: Conn,
}

impl MysqlConnection {
    /// Create a new connection wrapper.
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Execute a statement and return the number of affected rows.
    pub async fn execute(&mut self, statement: &str) -> MysqlResult<u64> {
        debug!(statement = %statement, "Executing statement");
        self.conn.query_drop(statement).await?;
        Ok(self.conn.affected_rows())
    }

    /// Execute a parameterized statement and return the number of
    /// affected rows.
    pub async fn execute_params<P>(&mut self, statement: &str, params: P) -> MysqlResult<u64>
    where
        P: Into<Params> + Send,
    {
        debug!(statement = %statement, "Executing parameterized statement");
        self.conn.exec_drop(statement, params).await?;
        Ok(self.conn.affected_rows())
    }

    /// Execute a parameterized query and return all rows.
    pub async fn query_params<T, P>(&mut self, query: &str, params: P) -> MysqlResult<Vec<T>>
    where
        T: FromRow + Send + 'static,
        P: Into<Params> + Send,
    {
        debug!(query = %query, "Executing parameterized query");
        let rows: Vec<T> = self.conn.exec(query, params).await?;
        Ok(rows)
    }

    /// Execute a parameterized query and return the first row, if any.
    pub async fn query_first_params<T, P>(
        &mut self,
        query: &str,
        params: P,
    ) -> MysqlResult<Option<T>>
    where
        T: FromRow + Send + 'static,
        P: Into<Params> + Send,
    {
        debug!(query = %query, "Executing parameterized query_first");
        let row: Option<T> = self.conn.exec_first(query, params).await?;
        Ok(row)
    }

    /// Get a single scalar value from a parameterized query, if any row
    /// matched.
    pub async fn query_scalar_params<T, P>(
        &mut self,
        query: &str,
        params: P,
    ) -> MysqlResult<Option<T>>
    where
        T: FromValue + Send,
        P: Into<Params> + Send,
    {
        debug!(query = %query, "Executing parameterized scalar query");
        let value: Option<Value> = self.conn.exec_first(query, params).await?;
        Ok(value.map(T::from_value))
    }

    /// Cleanly close the connection.
    pub async fn disconnect(self) -> MysqlResult<()> {
        debug!("Disconnecting");
        self.conn.disconnect().await?;
        Ok(())
    }
}

impl From<Conn> for MysqlConnection {
    fn from(conn: Conn) -> Self {
        Self::new(conn)
    }
}
