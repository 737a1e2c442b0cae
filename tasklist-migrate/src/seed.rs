//! Administrative account bootstrap.

use tracing::warn;

use crate::credential;
use crate::error::{MigrateResult, MigrationError};
use crate::history::MigrationStore;

/// Reserved administrative username; the idempotence key for seeding.
pub const ADMIN_USERNAME: &str = "admin";
/// Email recorded on the seeded account.
pub const ADMIN_EMAIL: &str = "admin@example.com";
/// Elevated role value.
pub const ADMIN_ROLE: &str = "admin";
/// Environment override for the initial admin password.
pub const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
/// Password used when no override is set.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin@123";

/// What the seeder did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The admin account was created with the elevated role.
    Created,
    /// The admin account was created without a role column; the schema
    /// predates the role domain.
    CreatedWithoutRole,
    /// The reserved username already existed; nothing was done.
    AlreadyExists,
}

/// The admin password from the environment, or the documented default.
pub fn admin_password_from_env() -> String {
    std::env::var(ENV_ADMIN_PASSWORD).unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string())
}

/// Ensure the reserved administrative account exists.
///
/// Exactly one admin row exists after a successful pass regardless of
/// how many times this runs: the lookup on [`ADMIN_USERNAME`] gates the
/// insert, and the uniqueness constraint on usernames backs the gate up.
/// When the insert is rejected because the schema has no usable role
/// column, the account is inserted without one rather than failing the
/// run.
pub async fn ensure_admin<S>(store: &mut S, password: impl AsRef<str>) -> MigrateResult<SeedOutcome>
where
    S: MigrationStore + ?Sized,
{
    if store.user_exists(ADMIN_USERNAME).await? {
        return Ok(SeedOutcome::AlreadyExists);
    }

    let hash = credential::hash_password(password.as_ref())?;

    match store
        .insert_user(ADMIN_USERNAME, ADMIN_EMAIL, &hash, Some(ADMIN_ROLE))
        .await
    {
        Ok(()) => Ok(SeedOutcome::Created),
        Err(e @ MigrationError::Constraint(_)) => Err(e),
        Err(e) => {
            warn!(
                error = %e,
                "Admin insert with role rejected; retrying without role column"
            );
            store
                .insert_user(ADMIN_USERNAME, ADMIN_EMAIL, &hash, None)
                .await?;
            Ok(SeedOutcome::CreatedWithoutRole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::MemoryStore;

    #[tokio::test]
    async fn test_seed_creates_admin_once() {
        let mut store = MemoryStore::default();

        let first = ensure_admin(&mut store, "admin@123").await.unwrap();
        assert_eq!(first, SeedOutcome::Created);
        assert_eq!(store.users.len(), 1);

        let second = ensure_admin(&mut store, "admin@123").await.unwrap();
        assert_eq!(second, SeedOutcome::AlreadyExists);
        assert_eq!(store.users.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_falls_back_without_role() {
        let mut store = MemoryStore {
            reject_role_inserts: true,
            ..Default::default()
        };

        let outcome = ensure_admin(&mut store, "admin@123").await.unwrap();
        assert_eq!(outcome, SeedOutcome::CreatedWithoutRole);
        assert!(store.users.contains(ADMIN_USERNAME));
    }

    #[test]
    fn test_default_password_when_env_unset() {
        // The variable is not set in the test environment.
        if std::env::var(ENV_ADMIN_PASSWORD).is_err() {
            assert_eq!(admin_password_from_env(), DEFAULT_ADMIN_PASSWORD);
        }
    }
}
