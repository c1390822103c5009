use super::{Blueprint, ComparisonRow};

const COMPARISON_HEADER: &str = "| 특징 항목 | 우리 브랜드 | 일반 경쟁사 |\n";
const COMPARISON_ALIGN: &str = "| :--- | :--- | :--- |\n";

/// Flat text brief of the whole blueprint, suitable for pasting into a doc or chat.
pub fn plain_text(blueprint: &Blueprint) -> String {
    let mut out = format!("[MASTER BRAND STRATEGY: {}]\n\n", blueprint.brand_name);
    out.push_str(&format!("--- BRAND STORY ---\n{}\n\n", blueprint.brand_story));
    out.push_str(&format!(
        "--- SEO CONFIG ---\nTITLE: {}\nDESC: {}\nKEYWORDS: {}\n\n",
        blueprint.seo_title, blueprint.meta_description, blueprint.seo_keywords
    ));
    out.push_str(&format!(
        "--- DESIGN GUIDELINE ---\n{}\n",
        blueprint.global_design_guideline
    ));
    out.push_str(&format!(
        "STYLE: {} | PRIMARY COLOR: {} | PROFILE: {}\n\n",
        blueprint.style, blueprint.primary_color, blueprint.industry_profile
    ));

    for (idx, section) in blueprint.sections.iter().enumerate() {
        out.push_str(&format!("[SECTION {}: {}]\n", idx + 1, section.title));
        out.push_str(&format!("ANALYSIS: {}\n", section.analysis));
        for (option_idx, option) in section.copy_options.iter().enumerate() {
            out.push_str(&format!(
                "COPY OPTION {}: {} | {}\n",
                option_idx + 1,
                option.headline,
                option.body
            ));
        }
        let visual = &section.visual_direction;
        out.push_str(&format!(
            "VISUAL: {} ({})\n",
            visual.asset_concept, visual.mood_description
        ));
        if let Some(interaction) = &section.interaction_proposal {
            out.push_str(&format!(
                "UX INTERACTION: {} - {}\n",
                interaction.kind, interaction.description
            ));
        }
        out.push_str(&format!("ANIMATION: {}\n", section.motion_directive.animation));
        if !section.comparison_rows.is_empty() {
            out.push_str(&comparison_markdown(&section.comparison_rows));
        }
        out.push('\n');
    }

    out
}

/// Three-column markdown table: feature, this brand, a typical competitor.
pub fn comparison_markdown(rows: &[ComparisonRow]) -> String {
    let mut out = format!("{COMPARISON_HEADER}{COMPARISON_ALIGN}");
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&row.feature),
            escape_cell(&row.ours),
            escape_cell(&row.competitor)
        ));
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use crate::blueprint::{
        Blueprint, ComparisonRow, CopyOption, IndustryProfile, InteractionProposal,
        MotionDirective, Section, VisualDirection,
    };

    use super::{comparison_markdown, plain_text};

    fn row(feature: &str, ours: &str, competitor: &str) -> ComparisonRow {
        ComparisonRow {
            feature: feature.to_string(),
            ours: ours.to_string(),
            competitor: competitor.to_string(),
        }
    }

    fn sample_blueprint() -> Blueprint {
        Blueprint {
            brand_name: "Test Cafe".to_string(),
            brand_story: "Roasted in-house since 2015.".to_string(),
            seo_title: "Test Cafe | Specialty Coffee".to_string(),
            meta_description: "Single-origin pour over.".to_string(),
            global_design_guideline: "Warm neutrals, generous whitespace.".to_string(),
            sections: vec![Section {
                section_id: "hero".to_string(),
                title: "First sip".to_string(),
                copy_options: vec![
                    CopyOption {
                        headline: "Slow coffee".to_string(),
                        body: "Brewed to order.".to_string(),
                    },
                    CopyOption {
                        headline: "Morning light".to_string(),
                        body: "A seat by the window.".to_string(),
                    },
                ],
                analysis: "Sets the calm tone.".to_string(),
                visual_direction: VisualDirection {
                    asset_concept: "looping pour-over video".to_string(),
                    mood_description: "quiet".to_string(),
                    lighting: Some("soft window light".to_string()),
                    composition: None,
                },
                motion_directive: MotionDirective {
                    animation: "fade-up".to_string(),
                    button_style: "outlined pill".to_string(),
                    typography: "serif headline".to_string(),
                    divider: None,
                    layout_strategy: None,
                    composition_and_shapes: None,
                },
                interaction_proposal: Some(InteractionProposal {
                    kind: "hover".to_string(),
                    description: "steam rises on hover".to_string(),
                    user_benefit: "delight".to_string(),
                }),
                comparison_rows: vec![row("Beans", "Single origin", "Blend")],
                faq_rows: Vec::new(),
            }],
            primary_color: "#112233".to_string(),
            style: "미니멀/모던".to_string(),
            industry_profile: IndustryProfile::Visual,
            seo_keywords: "coffee, seoul".to_string(),
        }
    }

    #[test]
    fn plain_text_lists_every_block_in_order() {
        let text = plain_text(&sample_blueprint());
        assert!(text.starts_with("[MASTER BRAND STRATEGY: Test Cafe]\n"));
        assert!(text.contains("KEYWORDS: coffee, seoul"));
        assert!(text.contains("--- DESIGN GUIDELINE ---\nWarm neutrals, generous whitespace.\n"));
        assert!(text.contains("STYLE: 미니멀/모던 | PRIMARY COLOR: #112233 | PROFILE: visual"));
        assert!(text.contains("[SECTION 1: First sip]"));
        assert!(text.contains("COPY OPTION 2: Morning light | A seat by the window."));
        assert!(text.contains("UX INTERACTION: hover - steam rises on hover"));
        assert!(text.contains("ANIMATION: fade-up"));
        let story = text.find("--- BRAND STORY ---").unwrap_or(usize::MAX);
        let section = text.find("[SECTION 1").unwrap_or(0);
        assert!(story < section);
    }

    #[test]
    fn comparison_table_escapes_pipes() {
        let table = comparison_markdown(&[row("Price", "₩5,000 | refill", "₩6,000")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "| 특징 항목 | 우리 브랜드 | 일반 경쟁사 |");
        assert_eq!(lines[1], "| :--- | :--- | :--- |");
        assert_eq!(lines[2], "| Price | ₩5,000 \\| refill | ₩6,000 |");
    }
}
