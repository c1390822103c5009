use super::registry::{ModelRegistry, ModelSpec, ModelTier};

/// Model chosen for one slot (generation or probe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub name: String,
    /// `None` when the name was taken as given and is not in the registry.
    pub tier: Option<ModelTier>,
    pub note: Option<String>,
}

impl ModelSelection {
    pub fn is_registered(&self) -> bool {
        self.tier.is_some()
    }

    fn registered(model: ModelSpec, note: Option<String>) -> Self {
        Self {
            name: model.name,
            tier: Some(model.tier),
            note,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelSelector {
    registry: ModelRegistry,
}

impl ModelSelector {
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    /// An explicit, non-blank request always wins, registered or not. Without
    /// one, the first `tier` model supporting `capability` is used, then any
    /// model supporting it.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        capability: &str,
        tier: ModelTier,
    ) -> Result<ModelSelection, String> {
        let requested = requested.map(str::trim).filter(|name| !name.is_empty());
        if let Some(requested) = requested {
            return Ok(self.take_requested(requested, capability));
        }

        if let Some(model) = self.registry.by_tier(capability, tier).into_iter().next() {
            return Ok(ModelSelection::registered(model, None));
        }
        let Some(model) = self.registry.by_capability(capability).into_iter().next() else {
            return Err(format!("No models available for capability '{capability}'."));
        };
        let note = format!(
            "No {} model supports '{capability}'; using '{}'.",
            tier.as_str(),
            model.name
        );
        Ok(ModelSelection::registered(model, Some(note)))
    }

    fn take_requested(&self, requested: &str, capability: &str) -> ModelSelection {
        match self.registry.get(requested) {
            Some(model) if model.supports(capability) => {
                ModelSelection::registered(model.clone(), None)
            }
            Some(model) => ModelSelection::registered(
                model.clone(),
                Some(format!(
                    "Model '{requested}' is not listed for '{capability}'; using it as given."
                )),
            ),
            None => ModelSelection {
                name: requested.to_string(),
                tier: None,
                note: Some(format!("Model '{requested}' is not registered; using it as given.")),
            },
        }
    }
}
