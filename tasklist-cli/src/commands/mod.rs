//! CLI command implementations.

pub mod migrate;
pub mod setup;
pub mod status;

use tasklist_mysql::MysqlConfig;

use crate::cli::ConnectionArgs;
use crate::error::CliResult;

/// Resolve the connection configuration: `--url` (or `DATABASE_URL`)
/// wins, otherwise the `MYSQL_*` environment variables with their
/// documented defaults.
pub(crate) fn resolve_config(connection: &ConnectionArgs) -> CliResult<MysqlConfig> {
    match &connection.url {
        Some(url) => Ok(MysqlConfig::from_url(url)?),
        None => Ok(MysqlConfig::from_env()?),
    }
}
