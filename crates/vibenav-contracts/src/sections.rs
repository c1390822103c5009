use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEntry {
    pub id: String,
    pub display_name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    #[error("section id cannot be empty")]
    EmptyId,
    #[error("section '{0}' already exists")]
    Duplicate(String),
    #[error("unknown section '{0}'")]
    Unknown(String),
}

/// Ordered, id-unique list of page sections. Only enabled entries reach the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSelection {
    entries: IndexMap<String, SectionEntry>,
}

const DEFAULT_CATALOG: [(&str, &str); 14] = [
    ("navbar", "1. 네비게이션 바"),
    ("hero", "2. 히어로 섹션"),
    ("philosophy", "3. 오너의 철학 (신뢰/전문성)"),
    ("product-feature", "4. 상품 소개 (비주얼 중심)"),
    ("story", "5. 브랜드 스토리 (감성 중심)"),
    ("signature-menu", "6. 메뉴/시그니처/객실 상세"),
    ("problem-solution", "7. 문제 & 해결"),
    ("unique-solution", "8. 우리만의 차별점"),
    ("review", "9. 고객 리얼 후기"),
    ("cta", "10. 요약 & CTA"),
    ("faq", "11. 자주하는 질문"),
    ("comparison", "12. 제품/서비스 비교"),
    ("gallery", "13. 비주얼 갤러리 (캐러셀/비디오/무드보드)"),
    ("footer", "14. 푸터"),
];

impl SectionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock fourteen-section landing page, all enabled.
    pub fn default_catalog() -> Self {
        let mut selection = Self::new();
        for (id, name) in DEFAULT_CATALOG {
            selection.entries.insert(
                id.to_string(),
                SectionEntry {
                    id: id.to_string(),
                    display_name: name.to_string(),
                    enabled: true,
                },
            );
        }
        selection
    }

    /// Builds a selection from caller entries, rejecting empty or repeated ids.
    pub fn from_entries(
        entries: impl IntoIterator<Item = SectionEntry>,
    ) -> Result<Self, SectionError> {
        let mut selection = Self::new();
        for entry in entries {
            selection.insert(entry)?;
        }
        Ok(selection)
    }

    /// Appends an enabled user-defined section at the end of the list.
    pub fn append_custom(
        &mut self,
        id: &str,
        display_name: &str,
    ) -> Result<&SectionEntry, SectionError> {
        let display_name = match display_name.trim() {
            "" => id.trim(),
            name => name,
        };
        let entry = SectionEntry {
            id: id.trim().to_string(),
            display_name: display_name.to_string(),
            enabled: true,
        };
        let key = entry.id.clone();
        self.insert(entry)?;
        self.entries
            .get(&key)
            .ok_or(SectionError::Unknown(key.clone()))
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool, SectionError> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| SectionError::Unknown(id.to_string()))?;
        entry.enabled = !entry.enabled;
        Ok(entry.enabled)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), SectionError> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| SectionError::Unknown(id.to_string()))?;
        entry.enabled = enabled;
        Ok(())
    }

    /// Disables every entry; handy before enabling an explicit subset.
    pub fn disable_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.enabled = false;
        }
    }

    pub fn get(&self, id: &str) -> Option<&SectionEntry> {
        self.entries.get(id)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .map(|entry| entry.enabled)
            .unwrap_or(false)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &SectionEntry> {
        self.entries.values().filter(|entry| entry.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SectionEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: SectionEntry) -> Result<(), SectionError> {
        if entry.id.trim().is_empty() {
            return Err(SectionError::EmptyId);
        }
        if self.entries.contains_key(&entry.id) {
            return Err(SectionError::Duplicate(entry.id));
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }
}
