//! Website blueprint data model: the request a caller composes and the
//! strongly-typed result handed back after validation.

pub mod export;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sections::SectionSelection;

pub const DEFAULT_PRIMARY_COLOR: &str = "#6366f1";

pub const STYLE_PRESETS: [&str; 5] = [
    "고급스러움",
    "전문적인/기업형",
    "레트로/빈티지",
    "귀여운/친근한",
    "미니멀/모던",
];

/// Selects the industry-specific instruction block of the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustryProfile {
    /// Persuasive, credibility-oriented copy.
    #[default]
    General,
    /// Visual-first businesses (restaurants, cafes, stays): lighting and
    /// composition detail is mandatory.
    Visual,
}

impl IndustryProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndustryProfile::General => "general",
            IndustryProfile::Visual => "visual",
        }
    }
}

impl fmt::Display for IndustryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndustryProfile {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(IndustryProfile::General),
            "visual" => Ok(IndustryProfile::Visual),
            other => Err(format!(
                "unknown industry profile '{other}' (expected general or visual)"
            )),
        }
    }
}

/// One file forwarded to the model alongside the prompt.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Reads `path`, guessing the MIME type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let mime_type = mime_for_path(path).unwrap_or("application/octet-stream");
        Ok(Self::new(mime_type, data))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "html" | "htm" => Some("text/html"),
        _ => None,
    }
}

/// Everything the caller supplies for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub brand_name: Option<String>,
    pub free_text: String,
    pub sections: SectionSelection,
    pub primary_color: String,
    pub style: String,
    pub industry_profile: IndustryProfile,
    pub seo_keywords: Option<String>,
    pub attachment: Option<Attachment>,
    pub extra_instructions: Option<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            brand_name: None,
            free_text: String::new(),
            sections: SectionSelection::default_catalog(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            style: STYLE_PRESETS[0].to_string(),
            industry_profile: IndustryProfile::General,
            seo_keywords: None,
            attachment: None,
            extra_instructions: None,
        }
    }
}

impl GenerationRequest {
    /// True when at least one of brand name, free text or attachment carries content.
    pub fn has_content(&self) -> bool {
        let brand = self
            .brand_name
            .as_deref()
            .map(|name| !name.trim().is_empty())
            .unwrap_or(false);
        let text = !self.free_text.trim().is_empty();
        let file = self
            .attachment
            .as_ref()
            .map(|attachment| !attachment.is_empty())
            .unwrap_or(false);
        brand || text || file
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn seo_keywords(&self) -> Option<&str> {
        self.seo_keywords
            .as_deref()
            .map(str::trim)
            .filter(|keywords| !keywords.is_empty())
    }

    pub fn extra_instructions(&self) -> Option<&str> {
        self.extra_instructions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub brand_name: String,
    pub brand_story: String,
    pub seo_title: String,
    pub meta_description: String,
    pub global_design_guideline: String,
    pub sections: Vec<Section>,
    pub primary_color: String,
    pub style: String,
    pub industry_profile: IndustryProfile,
    #[serde(default)]
    pub seo_keywords: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: String,
    pub title: String,
    pub copy_options: Vec<CopyOption>,
    pub analysis: String,
    pub visual_direction: VisualDirection,
    pub motion_directive: MotionDirective,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_proposal: Option<InteractionProposal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparison_rows: Vec<ComparisonRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq_rows: Vec<FaqRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOption {
    pub headline: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualDirection {
    pub asset_concept: String,
    pub mood_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionDirective {
    pub animation: String,
    pub button_style: String,
    pub typography: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition_and_shapes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionProposal {
    pub kind: String,
    pub description: String,
    pub user_benefit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub feature: String,
    pub ours: String,
    pub competitor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRow {
    pub question: String,
    pub answer: String,
}

/// Named transition styles the model may use for `motionDirective.animation`.
pub const MOTION_VOCABULARY: [(&str, &str); 8] = [
    (
        "fade-up",
        "default for headline and body blocks entering the viewport",
    ),
    (
        "stagger-reveal",
        "lists, cards and menu grids where items should arrive one after another",
    ),
    (
        "parallax-depth",
        "hero or gallery imagery that benefits from layered depth while scrolling",
    ),
    (
        "scale-in",
        "product shots and call-to-action buttons that need a moment of focus",
    ),
    (
        "slide-alternate",
        "alternating feature or problem/solution rows that read left-right",
    ),
    (
        "blur-focus",
        "story and mood sections where the image sharpens as the reader arrives",
    ),
    (
        "marquee-loop",
        "reviews, logos or keywords that scroll continuously",
    ),
    (
        "static",
        "dense content such as FAQ, comparison tables and the footer",
    ),
];

pub fn is_known_animation(label: &str) -> bool {
    let normalized = label.trim().to_ascii_lowercase();
    MOTION_VOCABULARY
        .iter()
        .any(|(name, _)| *name == normalized)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;

    #[test]
    fn has_content_requires_brand_text_or_file() {
        let mut request = GenerationRequest {
            brand_name: Some("  ".to_string()),
            ..GenerationRequest::default()
        };
        assert!(!request.has_content());

        request.free_text = "specialty coffee".to_string();
        assert!(request.has_content());

        request.free_text.clear();
        request.attachment = Some(Attachment::new("application/pdf", Vec::new()));
        assert!(!request.has_content());

        request.attachment = Some(Attachment::new("application/pdf", vec![1, 2, 3]));
        assert!(request.has_content());
    }

    #[test]
    fn industry_profile_parses_case_insensitively() {
        assert_eq!(
            "Visual".parse::<IndustryProfile>(),
            Ok(IndustryProfile::Visual)
        );
        assert_eq!(
            " general ".parse::<IndustryProfile>(),
            Ok(IndustryProfile::General)
        );
        assert!("luxury".parse::<IndustryProfile>().is_err());
        assert_eq!(
            serde_json::to_value(IndustryProfile::Visual).ok(),
            Some(json!("visual"))
        );
    }

    #[test]
    fn section_optional_fields_default_when_absent() -> anyhow::Result<()> {
        let section: Section = serde_json::from_value(json!({
            "sectionId": "hero",
            "title": "Hero",
            "copyOptions": [{"headline": "h", "body": "b"}],
            "analysis": "a",
            "visualDirection": {"assetConcept": "video", "moodDescription": "warm"},
            "motionDirective": {
                "animation": "fade-up",
                "buttonStyle": "pill",
                "typography": "serif"
            }
        }))?;
        assert!(section.interaction_proposal.is_none());
        assert!(section.comparison_rows.is_empty());
        assert!(section.visual_direction.lighting.is_none());

        let encoded = serde_json::to_value(&section)?;
        assert!(encoded.get("faqRows").is_none());
        assert!(encoded["visualDirection"].get("composition").is_none());
        Ok(())
    }

    #[test]
    fn attachment_debug_hides_payload() {
        let attachment = Attachment::new("image/png", vec![0; 64]);
        let rendered = format!("{attachment:?}");
        assert!(rendered.contains("bytes: 64"));
        assert!(!rendered.contains("[0, 0"));
    }

    #[test]
    fn mime_guess_covers_documents_and_images() {
        assert_eq!(
            mime_for_path(Path::new("menu.PDF")),
            Some("application/pdf")
        );
        assert_eq!(mime_for_path(Path::new("shot.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("notes")), None);
    }

    #[test]
    fn animation_vocabulary_lookup_normalizes() {
        assert!(is_known_animation(" Fade-Up "));
        assert!(!is_known_animation("spin-wildly"));
    }
}
