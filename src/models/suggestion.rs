use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_POSES: [&str; 6] = [
    "Berdiri tegak",
    "Duduk santai",
    "Melipat tangan di dada",
    "Berjalan ke depan",
    "Bersandar ke dinding",
    "Tangan di pinggang",
];

pub const DEFAULT_EXPRESSIONS: [&str; 6] = [
    "Senyum lebar",
    "Senyum tipis",
    "Tertawa lepas",
    "Serius",
    "Terkejut",
    "Termenung",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Pose,
    #[serde(rename = "ekspresi")]
    Expression,
}

impl SuggestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionCategory::Pose => "pose",
            SuggestionCategory::Expression => "ekspresi",
        }
    }

    pub fn default_options(&self) -> Vec<String> {
        let options: &[&str] = match self {
            SuggestionCategory::Pose => &DEFAULT_POSES,
            SuggestionCategory::Expression => &DEFAULT_EXPRESSIONS,
        };
        options.iter().map(|s| s.to_string()).collect()
    }
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a lookup produced. Failures are values, not errors, so the caller
/// decides whether to show the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionOutcome {
    Suggestions(Vec<String>),
    Failed { reason: String, placeholder: String },
}

impl SuggestionOutcome {
    pub fn failed(category: SuggestionCategory, keyword: &str, reason: impl Into<String>) -> Self {
        SuggestionOutcome::Failed {
            reason: reason.into(),
            placeholder: format!("Gagal mendapatkan saran {} untuk \"{}\"", category, keyword),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SuggestionOutcome::Failed { .. })
    }

    /// The raw list the service returned, or the single placeholder entry on
    /// failure.
    pub fn into_suggestions(self) -> Vec<String> {
        match self {
            SuggestionOutcome::Suggestions(items) => items,
            SuggestionOutcome::Failed { placeholder, .. } => vec![placeholder],
        }
    }

    /// A list that is never empty, ready for an option picker.
    pub fn into_options(self, keyword: &str) -> Vec<String> {
        match self.into_suggestions() {
            items if items.is_empty() => vec![format!("Tidak ada hasil untuk \"{}\"", keyword)],
            items => items,
        }
    }
}
