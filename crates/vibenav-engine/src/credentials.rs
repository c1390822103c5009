use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use vibenav_contracts::registry::{Named, NamedRegistry};

use crate::config::EngineConfig;
use crate::vault::CredentialVault;

pub const ENV_CREDENTIAL_KEYS: [&str; 3] = ["VIBENAV_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Opaque provider secret. Never printed; logs carry [`Credential::fingerprint`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trims surrounding whitespace; `None` for blank input.
    pub fn new(secret: impl AsRef<str>) -> Option<Self> {
        let secret = secret.as_ref().trim();
        if secret.is_empty() {
            return None;
        }
        Some(Self(secret.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First four bytes of the SHA-256 digest, hex encoded.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..4])
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.fingerprint())
    }
}

/// Where a credential comes from at startup.
pub trait CredentialSource: Named + Send + Sync {
    fn resolve(&self) -> Option<Credential>;
}

/// Secret placed in a file by the hosting environment.
#[derive(Debug, Clone)]
pub struct HostInjected {
    path: Option<PathBuf>,
}

impl HostInjected {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl Named for HostInjected {
    fn name(&self) -> &str {
        "host"
    }
}

impl CredentialSource for HostInjected {
    fn resolve(&self) -> Option<Credential> {
        let path = self.path.as_ref()?;
        match fs::read_to_string(path) {
            Ok(contents) => Credential::new(contents),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "host credential file unreadable"
                );
                None
            }
        }
    }
}

/// Secret the user typed in earlier, read back from the vault.
#[derive(Debug, Clone)]
pub struct UserEntered {
    vault: CredentialVault,
}

impl UserEntered {
    pub fn new(vault: CredentialVault) -> Self {
        Self { vault }
    }
}

impl Named for UserEntered {
    fn name(&self) -> &str {
        "user"
    }
}

impl CredentialSource for UserEntered {
    fn resolve(&self) -> Option<Credential> {
        self.vault.load().and_then(Credential::new)
    }
}

/// First non-empty variable among `keys`.
#[derive(Debug, Clone)]
pub struct Environment {
    keys: Vec<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(ENV_CREDENTIAL_KEYS)
    }
}

impl Environment {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Named for Environment {
    fn name(&self) -> &str {
        "env"
    }
}

impl CredentialSource for Environment {
    fn resolve(&self) -> Option<Credential> {
        self.keys
            .iter()
            .find_map(|key| non_empty_env(key))
            .and_then(Credential::new)
    }
}

pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn default_sources(config: &EngineConfig) -> NamedRegistry<Box<dyn CredentialSource>> {
    let sources: Vec<Box<dyn CredentialSource>> = vec![
        Box::new(HostInjected::new(config.host_credential_file.clone())),
        Box::new(UserEntered::new(CredentialVault::new(config.vault_path.clone()))),
        Box::new(Environment::default()),
    ];
    NamedRegistry::new(sources)
}

#[cfg(test)]
mod tests {
    use std::env;

    use vibenav_contracts::registry::Named;

    use super::{
        default_sources, Credential, CredentialSource, Environment, HostInjected, UserEntered,
    };
    use crate::config::EngineConfig;
    use crate::vault::CredentialVault;

    #[test]
    fn blank_secrets_are_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new(" \n\t").is_none());
        assert_eq!(
            Credential::new(" AIzaSy\n").map(|c| c.expose().to_string()),
            Some("AIzaSy".to_string())
        );
    }

    #[test]
    fn debug_output_is_redacted() -> anyhow::Result<()> {
        let credential =
            Credential::new("AIzaSySuperSecret").ok_or_else(|| anyhow::anyhow!("credential"))?;
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("SuperSecret"));
        assert_eq!(
            rendered,
            format!("Credential({})", credential.fingerprint())
        );
        assert_eq!(credential.fingerprint().len(), 8);
        Ok(())
    }

    #[test]
    fn fingerprint_is_stable_and_distinguishes_secrets() -> anyhow::Result<()> {
        let a = Credential::new("one").ok_or_else(|| anyhow::anyhow!("a"))?;
        let b = Credential::new("two").ok_or_else(|| anyhow::anyhow!("b"))?;
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        Ok(())
    }

    #[test]
    fn host_source_reads_trimmed_file() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("key.txt");
        std::fs::write(&path, "  host-secret\n")?;
        let source = HostInjected::new(Some(path));
        assert_eq!(source.name(), "host");
        assert_eq!(
            source.resolve().map(|c| c.expose().to_string()),
            Some("host-secret".to_string())
        );
        assert!(HostInjected::new(None).resolve().is_none());
        let missing = HostInjected::new(Some(temp.path().join("absent")));
        assert!(missing.resolve().is_none());
        Ok(())
    }

    #[test]
    fn user_source_reads_the_vault() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let vault = CredentialVault::new(temp.path().join("vault.json"));
        let source = UserEntered::new(vault.clone());
        assert!(source.resolve().is_none());
        vault.save("typed-key")?;
        assert_eq!(
            source.resolve().map(|c| c.expose().to_string()),
            Some("typed-key".to_string())
        );
        Ok(())
    }

    #[test]
    fn env_source_with_unset_keys_resolves_nothing() {
        let source = Environment::new([
            "VIBENAV_TEST_SURELY_UNSET_KEY_A",
            "VIBENAV_TEST_SURELY_UNSET_KEY_B",
        ]);
        assert_eq!(source.name(), "env");
        assert!(source.resolve().is_none());
    }

    #[test]
    fn env_source_skips_blank_values_and_trims_the_first_set_one() {
        let keys = [
            "VIBENAV_TEST_ENV_ORDER_BLANK",
            "VIBENAV_TEST_ENV_ORDER_PADDED",
            "VIBENAV_TEST_ENV_ORDER_LATER",
        ];
        env::set_var(keys[0], "   ");
        env::set_var(keys[1], "  second-key \n");
        env::set_var(keys[2], "third-key");
        let resolved = Environment::new(keys).resolve();
        for key in keys {
            env::remove_var(key);
        }
        assert_eq!(
            resolved.map(|c| c.expose().to_string()),
            Some("second-key".to_string())
        );
    }

    #[test]
    fn env_source_checks_the_documented_keys_in_order() {
        assert_eq!(
            Environment::default().keys,
            ["VIBENAV_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"]
        );
    }

    #[test]
    fn default_sources_are_selectable_by_name() {
        let sources = default_sources(&EngineConfig::default());
        assert_eq!(sources.list(), vec!["env", "host", "user"]);
        assert_eq!(sources.entries()[0].name(), "host");
        assert_eq!(
            sources.get("user").map(|source| source.name()),
            Some("user")
        );
        assert!(sources.get("vault").is_none());
    }
}
