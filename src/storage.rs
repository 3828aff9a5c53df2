use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create upload dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn save(
        &self,
        original_name: Option<&str>,
        contents: &[u8],
    ) -> anyhow::Result<StoredUpload> {
        let file_name = generate_name(original_name);
        let path = self.dir.join(&file_name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(contents).await?;
        file.flush().await?;

        info!("Stored upload {} ({} bytes)", file_name, contents.len());
        Ok(StoredUpload { file_name, path })
    }
}

fn generate_name(original_name: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let id = Uuid::new_v4().simple().to_string();
    let ext = original_name.and_then(extension).unwrap_or_default();
    format!("{}-{}{}", millis, &id[..8], ext)
}

fn extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}
