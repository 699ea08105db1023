//! Connection commands: connect, disconnect and the messaging list.

use anyhow::{Context, Result};

use profesionales_core::text;
use profesionales_types::UserId;

use super::Env;

/// Connect the signed-in client with a professional.
pub async fn connect(env: &Env, professional: &str) -> Result<()> {
    let mut screen = env.app.profile_screen()?;
    screen.enter(UserId::new(professional)).await?;

    let banner = screen.connect().await;
    let state = screen.state().await;
    screen.leave().await;

    match (state.connection_id(), banner) {
        (Some(id), banner) => {
            // No banner: the pair was already connected on entry
            println!("{}", banner.as_deref().unwrap_or(text::ALREADY_CONNECTED));
            println!("  Connection: {id}");
            Ok(())
        }
        (None, Some(message)) => anyhow::bail!(message),
        (None, None) => anyhow::bail!("Could not connect with {professional}"),
    }
}

/// Remove the connection with a professional.
pub async fn disconnect(env: &Env, professional: &str) -> Result<()> {
    let mut screen = env.app.profile_screen()?;
    screen.enter(UserId::new(professional)).await?;
    if !screen.state().await.is_connected() {
        screen.leave().await;
        anyhow::bail!("Not connected with {professional}");
    }

    let banner = screen.disconnect().await;
    let state = screen.state().await;
    screen.leave().await;

    let message = banner.unwrap_or_default();
    if state.is_connected() {
        anyhow::bail!(message);
    }
    println!("{message}");
    Ok(())
}

/// List the client's active connections, optionally filtered.
pub async fn messages(env: &Env, filter: Option<&str>) -> Result<()> {
    env.identity()?;
    let mut screen = env.app.messaging_screen()?;
    screen
        .on_enter()
        .await
        .context("Failed to load conversations")?;

    if let Some(query) = filter {
        screen.set_filter(query);
    }

    let visible = screen.visible();
    if screen.list().is_empty() {
        println!("No conversations yet. Connect with a professional to start one.");
        return Ok(());
    }
    if visible.is_empty() {
        println!("No conversations match '{}'.", screen.list().filter());
        return Ok(());
    }

    for connection in visible {
        let professional = &connection.professional;
        println!(
            "  {:<34} {:<28} {}",
            connection.id,
            professional.display_name(),
            professional.profession.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{logged_in_env, mock_env};
    use tempfile::tempdir;

    #[tokio::test]
    async fn connect_then_list_then_disconnect() {
        let dir = tempdir().unwrap();
        let env = logged_in_env(dir.path()).await;

        connect(&env, "p1").await.unwrap();
        assert!(messages(&env, None).await.is_ok());
        assert!(messages(&env, Some("plomero")).await.is_ok());

        disconnect(&env, "p1").await.unwrap();
        let err = disconnect(&env, "p1").await.unwrap_err();
        assert!(err.to_string().contains("Not connected"));
    }

    #[tokio::test]
    async fn connecting_twice_reports_already_connected() {
        let dir = tempdir().unwrap();
        let env = logged_in_env(dir.path()).await;

        connect(&env, "p1").await.unwrap();
        assert!(connect(&env, "p1").await.is_ok());
        assert_eq!(env.app.messaging_screen().unwrap().refresh().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn connect_requires_login() {
        let dir = tempdir().unwrap();
        let env = mock_env(dir.path()).await;

        let err = connect(&env, "p1").await.unwrap_err();
        assert_eq!(err.to_string(), text::LOGIN_TO_CONNECT);
        assert!(messages(&env, None).await.is_err());
    }

    #[tokio::test]
    async fn connections_persist_in_mock_backend() {
        let dir = tempdir().unwrap();
        let env = logged_in_env(dir.path()).await;
        connect(&env, "p3").await.unwrap();
        env.finish().await.unwrap();

        let env = mock_env(dir.path()).await;
        let mut screen = env.app.messaging_screen().unwrap();
        let list = screen.refresh().await.unwrap();
        assert_eq!(list.len(), 1);
    }
}
