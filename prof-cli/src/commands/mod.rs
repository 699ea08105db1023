//! CLI command implementations.

pub mod account;
pub mod browse;
pub mod connections;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use profesionales_client::{App, Gateway, LogNavigator, MockGateway, Navigator};
use profesionales_types::Identity;

use crate::config::{self, SessionFile};

/// Everything a command needs: the wired app plus local state to persist.
pub struct Env {
    /// The client app.
    pub app: App,
    data_dir: PathBuf,
    mock: Option<MockGateway>,
    restored: Option<SessionFile>,
}

impl Env {
    /// Build the app and restore the saved session.
    ///
    /// With `mock`, the backend is an in-memory one persisted in the data
    /// directory; otherwise `config_path` (defaults if missing) picks the
    /// real backend.
    pub async fn open(data_dir: &Path, config_path: &Path, mock: bool) -> Result<Self> {
        let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
        let (app, mock) = if mock {
            let gateway = config::load_mock_backend(data_dir).await?;
            (App::mock(gateway.clone(), navigator), Some(gateway))
        } else {
            let app = App::load(config_path, navigator).context("Failed to load configuration")?;
            (app, None)
        };

        let restored = SessionFile::load(data_dir).await?;
        if let Some(session) = &restored {
            app.restore(session.identity.clone(), session.token.clone())?;
        }

        Ok(Self {
            app,
            data_dir: data_dir.to_path_buf(),
            mock,
            restored,
        })
    }

    /// The signed-in identity, or an error telling the user to log in.
    pub fn identity(&self) -> Result<Arc<Identity>> {
        self.app
            .session()?
            .current()
            .context("Not logged in. Run 'prof-cli login' first.")
    }

    /// The session as it was when the command started.
    pub fn restored(&self) -> Option<&SessionFile> {
        self.restored.as_ref()
    }

    /// Persist whatever the command changed: the session and, with
    /// `--mock`, the backend.
    pub async fn finish(self) -> Result<()> {
        if let Some(gateway) = &self.mock {
            config::save_mock_backend(&self.data_dir, gateway).await?;
        }

        match self.app.session()?.current() {
            Some(identity) => {
                let session = SessionFile::new((*identity).clone(), self.app.gateway().token());
                let unchanged = self
                    .restored
                    .as_ref()
                    .is_some_and(|saved| saved.same_login(&session));
                if !unchanged {
                    session.save(&self.data_dir).await?;
                }
            }
            None if self.restored.is_some() => SessionFile::clear(&self.data_dir).await?,
            None => {}
        }
        Ok(())
    }
}

/// Prompt for a password with echo suppression.
pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}
