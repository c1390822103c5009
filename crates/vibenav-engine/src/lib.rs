pub mod config;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod probe;
pub mod provider;
pub mod vault;

use vibenav_contracts::blueprint::{Blueprint, GenerationRequest};
use vibenav_contracts::prompt::PromptComposer;
use vibenav_contracts::registry::Named;
use vibenav_contracts::store::StoreError;

pub use config::EngineConfig;
pub use credentials::{Credential, CredentialSource};
pub use error::{ErrorKind, GenerationError, ProviderError};
pub use gemini::GeminiProvider;
pub use generator::BlueprintGenerator;
pub use probe::ConnectionProbe;
pub use provider::{StructuredProvider, StructuredRequest, StructuredResponse};
pub use vault::CredentialVault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Verified,
    Rejected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Verified => "verified",
            ConnectionState::Rejected => "rejected",
        }
    }
}

/// Stateful front door: one provider, one vault, at most one active credential.
pub struct BlueprintService {
    provider: Box<dyn StructuredProvider>,
    vault: CredentialVault,
    probe: ConnectionProbe,
    generation_model: String,
    composer: PromptComposer,
    state: ConnectionState,
    credential: Option<Credential>,
}

impl BlueprintService {
    pub fn new(config: &EngineConfig, provider: Box<dyn StructuredProvider>) -> Self {
        Self {
            provider,
            vault: CredentialVault::new(config.vault_path.clone()),
            probe: ConnectionProbe::new(config.probe_model.clone()),
            generation_model: config.generation_model.clone(),
            composer: PromptComposer::new(config.output_language.clone()),
            state: ConnectionState::Disconnected,
            credential: None,
        }
    }

    /// Service backed by the Gemini HTTP provider.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config, Box::new(GeminiProvider::from_config(config)))
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    pub fn generation_model(&self) -> &str {
        &self.generation_model
    }

    pub fn active_fingerprint(&self) -> Option<String> {
        self.credential.as_ref().map(Credential::fingerprint)
    }

    /// Resolves a credential from `source` and probes it. Nothing found
    /// leaves the service disconnected.
    pub fn startup(&mut self, source: &dyn CredentialSource) -> ConnectionState {
        match source.resolve() {
            Some(credential) => {
                tracing::info!(
                    source = source.name(),
                    credential = %credential.fingerprint(),
                    "credential found at startup"
                );
                self.adopt(credential);
            }
            None => {
                tracing::info!(source = source.name(), "no credential available at startup");
                self.credential = None;
                self.state = ConnectionState::Disconnected;
            }
        }
        self.state
    }

    /// Probes a freshly entered secret and keeps it only when it works.
    /// A rejected secret is not written to the vault.
    pub fn connect(&mut self, secret: &str) -> Result<ConnectionState, StoreError> {
        let Some(credential) = Credential::new(secret) else {
            self.credential = None;
            self.state = ConnectionState::Rejected;
            return Ok(self.state);
        };
        if self.adopt(credential.clone()) == ConnectionState::Verified {
            self.vault.save(credential.expose())?;
        }
        Ok(self.state)
    }

    /// Forgets the active credential and clears the vault.
    pub fn disconnect(&mut self) -> Result<(), StoreError> {
        self.credential = None;
        self.state = ConnectionState::Disconnected;
        self.vault.clear()
    }

    pub fn probe_connection(&self, credential: &Credential) -> bool {
        self.probe.probe(self.provider.as_ref(), credential)
    }

    /// Runs one generation with the verified credential. An auth failure
    /// drops the credential locally; the vault entry stays for the user to
    /// replace or clear.
    pub fn generate_blueprint(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<Blueprint, GenerationError> {
        if !request.has_content() {
            return Err(GenerationError::EmptyInput);
        }
        let credential = match (&self.credential, self.state) {
            (Some(credential), ConnectionState::Verified) => credential,
            _ => return Err(GenerationError::MissingCredential),
        };
        let model = self.generation_model.clone();
        let generator = BlueprintGenerator::new(self.provider.as_ref(), model)
            .with_composer(self.composer.clone());
        let outcome = generator.generate(Some(credential), request);
        if let Err(err) = &outcome {
            if err.invalidates_credential() {
                tracing::warn!(
                    credential = %credential.fingerprint(),
                    "credential rejected by provider, dropping it"
                );
                self.credential = None;
                self.state = ConnectionState::Rejected;
            }
        }
        outcome
    }

    fn adopt(&mut self, credential: Credential) -> ConnectionState {
        if self.probe_connection(&credential) {
            self.credential = Some(credential);
            self.state = ConnectionState::Verified;
        } else {
            self.credential = None;
            self.state = ConnectionState::Rejected;
        }
        self.state
    }
}

/// One-shot probe outside of a [`BlueprintService`].
pub fn probe_connection(
    provider: &dyn StructuredProvider,
    model: &str,
    credential: &Credential,
) -> bool {
    ConnectionProbe::new(model).probe(provider, credential)
}

/// One-shot generation outside of a [`BlueprintService`].
pub fn generate_blueprint(
    provider: &dyn StructuredProvider,
    model: &str,
    credential: Option<&Credential>,
    request: &GenerationRequest,
) -> Result<Blueprint, GenerationError> {
    BlueprintGenerator::new(provider, model).generate(credential, request)
}
