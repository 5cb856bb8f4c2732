//! JSON cookie file
//!
//! The blob is written to a temporary sibling and renamed into place, so a
//! reader never sees a half-written file and concurrent writers are
//! overwrite-safe.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::entities::CookieBlob;
use crate::domain::ports::CookieStore;
use crate::error::StoreError;

pub struct FileCookieStore {
    path: PathBuf,
}

impl FileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cookies.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CookieStore for FileCookieStore {
    async fn load(&self) -> Result<Option<CookieBlob>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let cookies: CookieBlob =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(cookies))
    }

    async fn save(&self, cookies: &CookieBlob) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(cookies)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json.as_bytes()).await?;

        // Session cookies are bearer credentials
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            cookies = cookies.0.len(),
            "Saved session cookies"
        );
        Ok(())
    }
}
