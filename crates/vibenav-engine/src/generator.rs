use std::time::Instant;

use serde_json::Value;
use vibenav_contracts::blueprint::{is_known_animation, Blueprint, GenerationRequest};
use vibenav_contracts::extract::extract_json;
use vibenav_contracts::prompt::PromptComposer;
use vibenav_contracts::schema::{SchemaContract, SchemaViolation};

use crate::credentials::Credential;
use crate::error::{classify, GenerationError};
use crate::gemini::truncate_text;
use crate::provider::{Contents, ResponseFormat, StructuredProvider, StructuredRequest};

const SNIPPET_LIMIT: usize = 512;
const EXPECTED_COPY_OPTIONS: usize = 3;

/// Turns one [`GenerationRequest`] into a validated [`Blueprint`] with a
/// single provider call. Holds no state between calls.
pub struct BlueprintGenerator<'a> {
    provider: &'a dyn StructuredProvider,
    model: String,
    composer: PromptComposer,
    contract: SchemaContract,
}

impl<'a> BlueprintGenerator<'a> {
    pub fn new(provider: &'a dyn StructuredProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            composer: PromptComposer::default(),
            contract: SchemaContract::blueprint(),
        }
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generate(
        &self,
        credential: Option<&Credential>,
        request: &GenerationRequest,
    ) -> Result<Blueprint, GenerationError> {
        if !request.has_content() {
            return Err(GenerationError::EmptyInput);
        }
        let Some(credential) = credential else {
            return Err(GenerationError::MissingCredential);
        };

        let structured = self.build_request(request);
        let started = Instant::now();
        tracing::info!(
            provider = self.provider.name(),
            model = %self.model,
            credential = %credential.fingerprint(),
            sections = request.sections.enabled_count(),
            attachment = structured.contents.attachment().is_some(),
            "blueprint generation started"
        );

        let outcome = self
            .provider
            .generate_structured(credential, &structured)
            .map_err(classify)
            .and_then(|response| {
                let text = response
                    .non_empty_text()
                    .ok_or(GenerationError::EmptyResponse)?;
                self.finish(text, request)
            });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(blueprint) => tracing::info!(
                model = %self.model,
                sections = blueprint.sections.len(),
                elapsed_ms,
                "blueprint generation finished"
            ),
            Err(err) => tracing::error!(
                model = %self.model,
                kind = err.kind().as_str(),
                error = %err,
                elapsed_ms,
                "blueprint generation failed"
            ),
        }
        outcome
    }

    /// The single provider request for `request`: prompt, optional
    /// attachment, JSON output bound to the blueprint schema.
    pub fn build_request(&self, request: &GenerationRequest) -> StructuredRequest {
        let text = self.composer.compose(request);
        let contents = match request.attachment.as_ref().filter(|file| !file.is_empty()) {
            Some(attachment) => Contents::TextWithAttachment {
                text,
                attachment: attachment.clone(),
            },
            None => Contents::Text(text),
        };
        StructuredRequest {
            model: self.model.clone(),
            contents,
            response_format: ResponseFormat::Json,
            schema: Some(self.contract.to_provider_schema()),
        }
    }

    /// Everything after the provider answered: extract, parse, check, enrich.
    pub fn finish(
        &self,
        raw_text: &str,
        request: &GenerationRequest,
    ) -> Result<Blueprint, GenerationError> {
        let extracted = extract_json(raw_text);
        let parsed: Value = serde_json::from_str(&extracted).map_err(|source| {
            let snippet = truncate_text(&extracted, SNIPPET_LIMIT);
            tracing::debug!(%snippet, "unparseable model response");
            GenerationError::MalformedJson { snippet, source }
        })?;

        let conformed = self.contract.conform(parsed)?;
        for path in &conformed.dropped {
            tracing::warn!(%path, "optional field had the wrong shape and was dropped");
        }

        let mut value = conformed.value;
        enrich(&mut value, request);
        let blueprint: Blueprint = serde_json::from_value(value).map_err(|err| {
            tracing::debug!(error = %err, "conformed response did not map onto the blueprint");
            SchemaViolation {
                path: "$".to_string(),
                expected: "blueprint",
                found: "incompatible value",
            }
        })?;
        flag_soft_issues(&blueprint);
        Ok(blueprint)
    }
}

/// Presentation fields always come from the request, never from the model.
fn enrich(value: &mut Value, request: &GenerationRequest) {
    let Some(map) = value.as_object_mut() else {
        return;
    };
    map.insert(
        "primaryColor".to_string(),
        Value::String(request.primary_color.trim().to_string()),
    );
    map.insert(
        "style".to_string(),
        Value::String(request.style.trim().to_string()),
    );
    map.insert(
        "industryProfile".to_string(),
        Value::String(request.industry_profile.as_str().to_string()),
    );
    map.insert(
        "seoKeywords".to_string(),
        Value::String(request.seo_keywords().unwrap_or_default().to_string()),
    );
}

fn flag_soft_issues(blueprint: &Blueprint) {
    for section in &blueprint.sections {
        if section.copy_options.len() != EXPECTED_COPY_OPTIONS {
            tracing::warn!(
                section = %section.section_id,
                count = section.copy_options.len(),
                "section does not carry exactly three copy options"
            );
        }
        if !is_known_animation(&section.motion_directive.animation) {
            tracing::warn!(
                section = %section.section_id,
                animation = %section.motion_directive.animation,
                "unknown motion animation label"
            );
        }
    }
}
