use indexmap::IndexMap;

/// Cost/quality class of a model. Generation prefers `Pro`, probes use `Flash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Pro,
    Flash,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Pro => "pro",
            ModelTier::Flash => "flash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub provider: String,
    pub tier: ModelTier,
    pub capabilities: Vec<String>,
    pub context_window: Option<u64>,
}

impl ModelSpec {
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|item| item == capability)
    }
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelSpec>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ModelRegistry {
    pub fn new(models: Option<IndexMap<String, ModelSpec>>) -> Self {
        Self {
            models: models.unwrap_or_else(default_models),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelSpec> {
        self.models.get(name)
    }

    pub fn by_capability(&self, capability: &str) -> Vec<ModelSpec> {
        self.models
            .values()
            .filter(|model| model.supports(capability))
            .cloned()
            .collect()
    }

    pub fn by_tier(&self, capability: &str, tier: ModelTier) -> Vec<ModelSpec> {
        self.models
            .values()
            .filter(|model| model.tier == tier && model.supports(capability))
            .cloned()
            .collect()
    }
}

fn default_models() -> IndexMap<String, ModelSpec> {
    let mut map = IndexMap::new();

    let mut insert =
        |name: &str, tier: ModelTier, capabilities: &[&str], context_window: Option<u64>| {
            map.insert(
                name.to_string(),
                ModelSpec {
                    name: name.to_string(),
                    provider: "gemini".to_string(),
                    tier,
                    capabilities: capabilities
                        .iter()
                        .map(|item| (*item).to_string())
                        .collect(),
                    context_window,
                },
            );
        };

    insert(
        "gemini-3-pro-preview",
        ModelTier::Pro,
        &["structured", "text", "vision"],
        Some(1_048_576),
    );
    insert(
        "gemini-2.5-pro",
        ModelTier::Pro,
        &["structured", "text", "vision"],
        Some(1_048_576),
    );
    insert(
        "gemini-3-flash-preview",
        ModelTier::Flash,
        &["structured", "text", "vision"],
        Some(1_048_576),
    );
    insert(
        "gemini-2.5-flash",
        ModelTier::Flash,
        &["structured", "text", "vision"],
        Some(1_048_576),
    );

    map
}
