//! Persisted key/value credential storage

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::AuthError;

/// A small JSON key/value file that outlives a single command
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Open the store at `path`, starting empty when the file does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AuthError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), AuthError> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies to new files; tighten older ones before writing
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_persist_across_opens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".folio/credentials.json");

        let mut store = CredentialStore::open(&path).unwrap();
        assert_eq!(store.get("github-token"), None);
        store.set("github-token", "abc").unwrap();

        let mut reopened = CredentialStore::open(&path).unwrap();
        assert_eq!(reopened.get("github-token"), Some("abc"));

        reopened.remove("github-token").unwrap();
        let again = CredentialStore::open(&path).unwrap();
        assert_eq!(again.get("github-token"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credentials.json");
        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;

        let mut store = CredentialStore::open(&path).unwrap();
        store.set("github-token", "abc").unwrap();
        assert_eq!(mode(&path), 0o600);

        // A file left world-readable is tightened on the next write
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        store.set("github-token", "def").unwrap();
        assert_eq!(mode(&path), 0o600);
        assert_eq!(CredentialStore::open(&path).unwrap().get("github-token"), Some("def"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(CredentialStore::open(&path), Err(AuthError::Format(_))));
    }
}
