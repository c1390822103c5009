use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use vibenav_contracts::store::{LocalStore, StoreError};

/// Storage key of the obfuscated secret inside the local store.
pub const VAULT_KEY: &str = "_aimb_vault";

/// Keeps one user-entered secret in the local store.
///
/// The stored form is base64 with its characters reversed. That keeps the
/// secret out of casual view; it is not encryption.
#[derive(Debug, Clone)]
pub struct CredentialVault {
    store: LocalStore,
}

impl CredentialVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: LocalStore::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Overwrites any previously stored secret.
    pub fn save(&self, secret: &str) -> Result<(), StoreError> {
        self.store.set(VAULT_KEY, &obfuscate(secret))?;
        tracing::debug!(path = %self.path().display(), "credential saved to vault");
        Ok(())
    }

    /// The stored secret, or `None` when nothing usable is stored. A payload
    /// that no longer decodes reads as absent rather than failing.
    pub fn load(&self) -> Option<String> {
        let stored = self.store.get(VAULT_KEY)?;
        match reveal(&stored) {
            Some(secret) if !secret.is_empty() => Some(secret),
            Some(_) => None,
            None => {
                tracing::warn!(
                    path = %self.path().display(),
                    "vault entry is not decodable, ignoring it"
                );
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(VAULT_KEY)
    }
}

pub fn obfuscate(secret: &str) -> String {
    BASE64.encode(secret.as_bytes()).chars().rev().collect()
}

pub fn reveal(stored: &str) -> Option<String> {
    let forward: String = stored.chars().rev().collect();
    let bytes = BASE64.decode(forward.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use vibenav_contracts::store::LocalStore;

    use super::{obfuscate, reveal, CredentialVault, VAULT_KEY};

    #[test]
    fn save_then_load_returns_the_exact_secret() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let vault = CredentialVault::new(temp.path().join("vault.json"));
        for secret in ["AIzaSyExample", " padded secret ", "비밀-키", "a"] {
            vault.save(secret)?;
            assert_eq!(vault.load().as_deref(), Some(secret));
        }
        Ok(())
    }

    #[test]
    fn stored_form_is_reversed_base64() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("vault.json");
        let vault = CredentialVault::new(&path);
        vault.save("abc")?;
        assert_eq!(obfuscate("abc"), "jJWY");
        let stored = LocalStore::new(&path).get(VAULT_KEY);
        assert_eq!(stored.as_deref(), Some("jJWY"));
        let raw = std::fs::read_to_string(&path)?;
        assert!(!raw.contains("abc"));
        Ok(())
    }

    #[test]
    fn clear_removes_the_secret_and_is_idempotent() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let vault = CredentialVault::new(temp.path().join("vault.json"));
        vault.save("secret")?;
        vault.clear()?;
        assert!(vault.load().is_none());
        vault.clear()?;
        assert!(vault.load().is_none());
        Ok(())
    }

    #[test]
    fn empty_or_missing_vault_loads_nothing() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let vault = CredentialVault::new(temp.path().join("missing").join("vault.json"));
        assert!(vault.load().is_none());
        vault.save("")?;
        assert!(vault.load().is_none());
        Ok(())
    }

    #[test]
    fn undecodable_entry_reads_as_absent() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("vault.json");
        LocalStore::new(&path).set(VAULT_KEY, "%%% not base64 %%%")?;
        assert!(CredentialVault::new(&path).load().is_none());
        assert!(reveal("%%%").is_none());
        Ok(())
    }

    #[test]
    fn vault_shares_the_store_with_other_keys() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("vault.json");
        let store = LocalStore::new(&path);
        store.set("theme", "dark")?;
        let vault = CredentialVault::new(&path);
        vault.save("k")?;
        vault.clear()?;
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        Ok(())
    }
}
