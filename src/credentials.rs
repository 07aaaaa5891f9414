//! API key storage
//!
//! Keys live in the OS keyring with a 0600 file fallback for headless
//! machines. The `OPENAI_API_KEY` environment variable overrides both, which
//! also keeps `.env`-style workflows working.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const SERVICE_NAME: &str = "postplan";
const API_KEY_USERNAME: &str = "openai-api-key";
const API_KEY_FILE: &str = "api_key.txt";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Get the path for the fallback API key file
fn api_key_file_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "postplan", "postplan")
        .context("Failed to get project directories")?;
    let dir = base.config_dir();
    fs::create_dir_all(dir).context("Failed to create config directory")?;
    Ok(dir.join(API_KEY_FILE))
}

/// Set API key - tries keyring first, falls back to file
pub fn set_api_key(key: &str) -> Result<()> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        if entry.set_password(key).is_ok() {
            // Also save to file as backup in case keyring retrieval fails
            let _ = save_to_file(key);
            return Ok(());
        }
    }

    save_to_file(key)?;
    println!("Note: Using file-based storage (keyring unavailable)");
    Ok(())
}

fn save_to_file(key: &str) -> Result<()> {
    let path = api_key_file_path()?;
    fs::write(&path, key).context("Failed to write API key file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .context("Failed to set file permissions")?;
    }

    Ok(())
}

/// Get the API key. Checks the environment, then the keyring, then the
/// fallback file. A missing key is a hard error: there is no degraded mode.
pub fn get_api_key() -> Result<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }

    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        if let Ok(key) = entry.get_password() {
            return Ok(key);
        }
    }

    let path = api_key_file_path()?;
    let key = fs::read_to_string(&path).context(
        "API key not found. Set OPENAI_API_KEY or run 'postplan config --set-api-key YOUR_KEY' first.",
    )?;
    Ok(key.trim().to_string())
}

/// Delete API key from both keyring and file
pub fn delete_api_key() -> Result<()> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        let _ = entry.delete_credential();
    }

    let path = api_key_file_path()?;
    if path.exists() {
        fs::remove_file(&path).context("Failed to delete API key file")?;
    }

    Ok(())
}

/// Check if an API key is available from any source
pub fn has_api_key() -> bool {
    if std::env::var(API_KEY_ENV).map(|k| !k.trim().is_empty()).unwrap_or(false) {
        return true;
    }

    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        if entry.get_password().is_ok() {
            return true;
        }
    }

    api_key_file_path().map(|p| p.exists()).unwrap_or(false)
}
