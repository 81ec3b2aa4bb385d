use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use std::sync::Arc;
use std::env;
use tokio::sync::Mutex;
use sha2::{Sha256, Digest};
use log;

/// File name the trained model is published under.
pub const DEFAULT_MODEL_FILE: &str = "best_personality_model.onnx";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    NotFound(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("Download of {url} failed with status {status}")]
    DownloadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Hash mismatch for {path}: expected {expected}, got {actual}")]
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Locates the model artifact on disk, optionally fetching and verifying it.
#[derive(Clone, Debug)]
pub struct ModelStore {
    model_path: PathBuf,
    source_url: Option<String>,
    expected_sha256: Option<String>,
    download_lock: Arc<Mutex<()>>,
}

impl ModelStore {
    /// Returns the model path used when none is given on the command line
    pub fn default_model_path() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("PERSONALITY_MODEL") {
            return PathBuf::from(path);
        }

        // 2. Working directory, where the app has always looked
        let local = PathBuf::from(DEFAULT_MODEL_FILE);
        if local.exists() {
            return local;
        }

        // 3. Platform-specific cache directory, the download target
        Self::default_cache_dir().join(DEFAULT_MODEL_FILE)
    }

    /// Returns the directory downloaded models are cached in
    pub fn default_cache_dir() -> PathBuf {
        if let Ok(path) = env::var("PERSONALITY_CACHE") {
            return PathBuf::from(path).join("models");
        }
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("personality-predictor").join("models");
        }
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("personality-predictor").join("models");
        }
        env::temp_dir().join("personality-predictor").join("models")
    }

    pub fn new<P: AsRef<Path>>(model_path: P) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
            source_url: None,
            expected_sha256: None,
            download_lock: Arc::new(Mutex::new(())),
        }
    }

    /// URL to download the model from when the file is missing
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Hex SHA-256 digest the model file must match
    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.expected_sha256 = Some(digest.into().to_lowercase());
        self
    }

    /// Sidecar file holding the class labels, `<model>.classes.json`
    pub fn classes_path(&self) -> PathBuf {
        self.model_path.with_extension("classes.json")
    }

    pub fn is_present(&self) -> bool {
        let present = self.model_path.exists();
        log::debug!("Model path: {:?} (exists: {})", self.model_path, present);
        present
    }

    fn file_digest(path: &Path) -> Result<String, ModelError> {
        let bytes = fs::read(path)?;
        log::debug!("Read {} bytes from {:?}", bytes.len(), path);
        Ok(Self::digest(&bytes))
    }

    fn digest(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    /// Checks the model file against the configured digest.
    /// Without a configured digest any existing file passes.
    pub fn verify(&self) -> Result<bool, ModelError> {
        if !self.is_present() {
            return Ok(false);
        }
        let Some(expected) = &self.expected_sha256 else {
            return Ok(true);
        };
        let actual = Self::file_digest(&self.model_path)?;
        log::info!("Model hash: {} (expected {})", actual, expected);
        Ok(&actual == expected)
    }

    /// Ensures the model file exists and matches the configured digest,
    /// downloading it when a source URL is configured.
    pub async fn ensure_available(&self) -> Result<PathBuf, ModelError> {
        let _lock = self.download_lock.lock().await;

        if self.is_present() {
            if self.verify()? {
                log::info!("Using model at {:?}", self.model_path);
                return Ok(self.model_path.clone());
            }
            let Some(url) = &self.source_url else {
                let actual = Self::file_digest(&self.model_path)?;
                return Err(ModelError::HashMismatch {
                    path: self.model_path.display().to_string(),
                    expected: self.expected_sha256.clone().unwrap_or_default(),
                    actual,
                });
            };
            log::warn!("Model file verification failed, removing it and redownloading");
            self.remove()?;
            self.download_and_verify(url).await?;
            return Ok(self.model_path.clone());
        }

        match &self.source_url {
            Some(url) => {
                log::info!("Model file does not exist, downloading...");
                self.download_and_verify(url).await?;
                Ok(self.model_path.clone())
            }
            None => Err(ModelError::NotFound(self.model_path.display().to_string())),
        }
    }

    async fn download_and_verify(&self, url: &str) -> Result<(), ModelError> {
        log::info!("Downloading model from {} to {:?}", url, self.model_path);
        let response = reqwest::get(url).await?;
        log::info!("Download response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ModelError::DownloadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        if let Some(expected) = &self.expected_sha256 {
            let actual = Self::digest(&bytes);
            if &actual != expected {
                log::error!("Model hash mismatch: expected {}, got {}", expected, actual);
                return Err(ModelError::HashMismatch {
                    path: url.to_string(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        if let Some(parent) = self.model_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.model_path, bytes)?;
        log::info!("Model downloaded and verified successfully");
        Ok(())
    }

    /// Deletes the model file if present.
    /// A file that fails verification is removed before it is downloaded again.
    pub fn remove(&self) -> Result<(), ModelError> {
        if self.model_path.exists() {
            fs::remove_file(&self.model_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_verify_digest() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("model.onnx");
        fs::write(&path, "hello")?;

        assert!(ModelStore::new(&path).verify()?);
        assert!(ModelStore::new(&path).with_sha256(HELLO_SHA256).verify()?);
        assert!(ModelStore::new(&path).with_sha256(HELLO_SHA256.to_uppercase()).verify()?);
        assert!(!ModelStore::new(&path).with_sha256("00").verify()?);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_model_without_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("missing.onnx"));
        assert!(!store.is_present());
        assert!(matches!(store.ensure_available().await, Err(ModelError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_corrupt_model_without_source() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("model.onnx");
        fs::write(&path, "corrupted data")?;

        let store = ModelStore::new(&path).with_sha256(HELLO_SHA256);
        assert!(matches!(store.ensure_available().await, Err(ModelError::HashMismatch { .. })));
        Ok(())
    }

    #[test]
    fn test_classes_path() {
        let store = ModelStore::new("models/best_personality_model.onnx");
        assert_eq!(store.classes_path(), PathBuf::from("models/best_personality_model.classes.json"));
    }

    #[test]
    fn test_remove() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("model.onnx");
        fs::write(&path, "hello")?;
        let store = ModelStore::new(&path);
        store.remove()?;
        assert!(!store.is_present());
        store.remove()?; // Removing twice is fine
        Ok(())
    }

    #[test]
    fn test_default_cache_dir() {
        env::set_var("PERSONALITY_CACHE", "/tmp/test-personality-cache");
        let path = ModelStore::default_cache_dir();
        assert!(path.to_str().unwrap().contains("/tmp/test-personality-cache/models"));
        env::remove_var("PERSONALITY_CACHE");

        let path = ModelStore::default_cache_dir();
        assert!(path.to_str().unwrap().contains("personality-predictor/models"));
    }
}
