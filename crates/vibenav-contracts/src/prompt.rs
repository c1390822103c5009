use crate::blueprint::{GenerationRequest, IndustryProfile, MOTION_VOCABULARY};

pub const DEFAULT_OUTPUT_LANGUAGE: &str = "Korean";

const ROLE_FRAMING: &str = "You are an expert brand strategist and UX architect who plans \
high-converting brand websites section by section.";

const GENERAL_PROFILE_BLOCK: &str = "[General business] Lead with persuasive, \
credibility-oriented copy: expertise, proof points, concrete outcomes and trust signals. \
Visual notes should support the argument rather than carry it.";

const VISUAL_PROFILE_BLOCK: &str = "[Visual-first business] Imagery is the main sales tool. \
For every section you MUST fill visualDirection.assetConcept, visualDirection.lighting and \
visualDirection.composition with concrete, sensory detail: light source and time of day, lens \
and framing, textures, colour temperature, what is in focus.";

const NO_DETAILS_LINE: &str =
    "- Brand details: (none provided; rely on the brand name and any attached file)\n";

const ATTACHMENT_RULE: &str = "treat its contents as primary brand data.";

const COPY_OPTIONS_RULE: &str =
    "- Write exactly 3 copy options (headline + body) in `copyOptions` for every section.\n";

const COMPARISON_RULE: &str = "- The `comparison` section MUST fill `comparisonRows` with at \
least 4 rows (feature, ours, competitor) comparing this brand with a typical competitor.\n";

const FAQ_RULE: &str =
    "- The `faq` section MUST fill `faqRows` with at least 4 question/answer pairs.\n";

const INTERACTION_RULE: &str = "- Where a section benefits from engagement, add an \
`interactionProposal` (kind, description, userBenefit).\n";

const LANGUAGE_RULE: &str = "Keep JSON keys and animation labels in English.";

/// Builds the instruction text for one blueprint request. Pure: same request, same prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptComposer {
    output_language: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_LANGUAGE)
    }
}

impl PromptComposer {
    pub fn new(output_language: impl Into<String>) -> Self {
        let output_language = output_language.into();
        let output_language = if output_language.trim().is_empty() {
            DEFAULT_OUTPUT_LANGUAGE.to_string()
        } else {
            output_language.trim().to_string()
        };
        Self { output_language }
    }

    pub fn output_language(&self) -> &str {
        &self.output_language
    }

    pub fn compose(&self, request: &GenerationRequest) -> String {
        let mut out = String::new();
        out.push_str(ROLE_FRAMING);
        out.push_str("\n\n## Brand data\n");
        let brand_name = request.brand_name().unwrap_or("(unspecified)");
        out.push_str(&format!("- Brand name: {brand_name}\n"));
        let details = request.free_text.trim();
        if details.is_empty() {
            out.push_str(NO_DETAILS_LINE);
        } else {
            out.push_str(&format!("- Brand details: {details}\n"));
        }
        if let Some(keywords) = request.seo_keywords() {
            out.push_str(&format!("- SEO keywords: {keywords}\n"));
        }
        if let Some(attachment) = request.attachment.as_ref().filter(|file| !file.is_empty()) {
            out.push_str(&format!(
                "- An attached reference file ({}) accompanies this request; {ATTACHMENT_RULE}\n",
                attachment.mime_type
            ));
        }

        out.push_str("\n## Sections to plan (in this order)\n");
        for entry in request.sections.enabled() {
            out.push_str(&format!("- {}: {}\n", entry.id, entry.display_name));
        }

        out.push_str("\n## Visual direction\n");
        out.push_str(&format!("- Style: {}\n", request.style.trim()));
        out.push_str(&format!("- Primary color: {}\n", request.primary_color.trim()));

        out.push_str("\n## Industry focus\n");
        out.push_str(profile_block(request.industry_profile));
        out.push('\n');

        out.push_str("\n## Output rules\n");
        out.push_str(COPY_OPTIONS_RULE);
        out.push_str("- Use each section id above as `sectionId` and keep the listed order.\n");
        if request.sections.is_enabled("comparison") {
            out.push_str(COMPARISON_RULE);
        }
        if request.sections.is_enabled("faq") {
            out.push_str(FAQ_RULE);
        }
        out.push_str(INTERACTION_RULE);
        out.push_str("- `motionDirective.animation` must be exactly one of:\n");
        for (label, rationale) in MOTION_VOCABULARY {
            out.push_str(&format!("  - {label}: {rationale}\n"));
        }
        out.push_str(&format!(
            "- Write every user-facing string in {}. {LANGUAGE_RULE}\n",
            self.output_language
        ));
        out.push_str("- Respond only with JSON that matches the provided response schema.\n");

        if let Some(extra) = request.extra_instructions() {
            out.push_str("\n## Additional instructions\n");
            out.push_str(extra);
            out.push('\n');
        }

        out
    }
}

fn profile_block(profile: IndustryProfile) -> &'static str {
    match profile {
        IndustryProfile::General => GENERAL_PROFILE_BLOCK,
        IndustryProfile::Visual => VISUAL_PROFILE_BLOCK,
    }
}

/// Composes with the default output language.
pub fn compose_prompt(request: &GenerationRequest) -> String {
    PromptComposer::default().compose(request)
}
