//! Startup seeding of the administrator account.

use tracing::info;

use clientdesk_auth::password::PasswordHasher;
use clientdesk_core::config::BootstrapConfig;
use clientdesk_core::result::AppResult;
use clientdesk_database::store::{Database, UnitOfWork, UserRepository};
use clientdesk_entity::user::{NewUser, UserRole};

/// Create the configured admin unless a user with that email exists.
///
/// Returns `true` when a user was created.
pub async fn seed_admin(
    db: &dyn Database,
    hasher: &PasswordHasher,
    config: &BootstrapConfig,
) -> AppResult<bool> {
    let mut uow = db.begin().await?;
    if uow.find_user_by_email(&config.email).await?.is_some() {
        return Ok(false);
    }

    let user = uow
        .insert_user(&NewUser {
            name: config.name.clone(),
            email: config.email.clone(),
            password_hash: hasher.hash_password(&config.password)?,
            role: UserRole::Admin,
        })
        .await?;
    uow.commit().await?;

    info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
