//! Authentication commands.
//!
//! Each command builds a [`SessionStore`] from the environment, restores any
//! persisted session, and performs one operation against the remote auth
//! endpoints.

use gearstock_client::{ClientConfig, SessionStore};
use gearstock_core::Role;

/// Build the session store and restore a persisted session, if any.
async fn store() -> Result<SessionStore, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let sessions = SessionStore::new(&config)?;
    sessions.restore().await;
    Ok(sessions)
}

/// Log in and persist the session.
pub async fn login(username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = store().await?;
    let session = sessions.login(username, password).await?;
    tracing::info!("Logged in as {} ({})", session.username, session.role);
    Ok(())
}

/// Register a new account and persist the session.
pub async fn signup(
    name: &str,
    username: &str,
    password: &str,
    role: Role,
) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = store().await?;
    let session = sessions.signup(name, username, password, role).await?;
    tracing::info!("Account created: {} ({})", session.username, session.role);
    Ok(())
}

/// Clear the stored session.
pub async fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let sessions = store().await?;
    sessions.logout().await?;
    tracing::info!("Logged out");
    Ok(())
}

/// Change the active user's password.
pub async fn change_password(
    old_password: &str,
    new_password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let sessions = store().await?;
    let message = sessions.change_password(old_password, new_password).await?;
    tracing::info!("{message}");
    Ok(())
}

/// Show the active session.
pub async fn whoami() -> Result<(), Box<dyn std::error::Error>> {
    let sessions = store().await?;
    match sessions.current().await {
        Some(session) => {
            tracing::info!(
                "{} (@{}) - {}, logged in {}",
                session.name,
                session.username,
                session.role,
                session.logged_in_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        None => tracing::info!("Not logged in"),
    }
    Ok(())
}
