//! Local state for prof-cli: the persisted session and the mock backend.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use profesionales_client::{MockBackend, MockGateway};
use profesionales_types::Identity;

const SESSION_FILE: &str = "session.json";
const MOCK_BACKEND_FILE: &str = "mock-backend.json";

/// Signed-in session stored between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    /// The signed-in user.
    pub identity: Identity,
    /// Bearer token returned at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// When the session was saved.
    pub saved_at: u64,
}

impl SessionFile {
    /// Create a session record stamped with the current time.
    pub fn new(identity: Identity, token: Option<String>) -> Self {
        Self {
            identity,
            token,
            saved_at: now_secs(),
        }
    }

    /// Load the session, if one was saved.
    pub async fn load(data_dir: &Path) -> Result<Option<Self>> {
        let path = data_dir.join(SESSION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = tokio::fs::read_to_string(&path)
            .await
            .context("Failed to read session")?;
        let session = serde_json::from_str(&contents)
            .context("Invalid session file. Run 'prof-cli logout' to reset it.")?;
        Ok(Some(session))
    }

    /// Save the session (0600: it holds a bearer token).
    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(SESSION_FILE);
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, contents)
            .await
            .context("Failed to save session")?;
        set_file_permissions_0600(&path).await?;
        Ok(())
    }

    /// Remove the saved session.
    pub async fn clear(data_dir: &Path) -> Result<()> {
        let path = data_dir.join(SESSION_FILE);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .context("Failed to remove session")?;
        }
        Ok(())
    }

    /// True when the identity and token match `other`'s.
    pub fn same_login(&self, other: &SessionFile) -> bool {
        self.identity == other.identity && self.token == other.token
    }
}

/// Load the mock backend, seeding it on first use.
pub async fn load_mock_backend(data_dir: &Path) -> Result<MockGateway> {
    let path = data_dir.join(MOCK_BACKEND_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Seeding mock backend");
        return Ok(MockGateway::seeded());
    }
    let contents = tokio::fs::read_to_string(&path)
        .await
        .context("Failed to read mock backend")?;
    let backend: MockBackend =
        serde_json::from_str(&contents).context("Invalid mock backend file")?;
    Ok(MockGateway::from_backend(backend))
}

/// Persist the mock backend so later invocations see the same data.
pub async fn save_mock_backend(data_dir: &Path, gateway: &MockGateway) -> Result<()> {
    let path = data_dir.join(MOCK_BACKEND_FILE);
    let contents = serde_json::to_string_pretty(&gateway.backend())?;
    tokio::fs::write(&path, contents)
        .await
        .context("Failed to save mock backend")?;
    set_file_permissions_0600(&path).await?;
    Ok(())
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to set file permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// Set directory permissions to 0700 (owner only) on Unix.
/// No-op on non-Unix platforms.
pub async fn set_dir_permissions_0700(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
            .await
            .context("Failed to set directory permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
