#![forbid(unsafe_code)]

//! Loading-phrase tables per language, with fallback.
//!
//! Translation lookup in general lives outside this crate; the boot overlay
//! only needs a precomputed, ordered phrase list for the active language.
//! Lookup order: exact tag, then primary subtag (`pt` for `pt-BR`), then the
//! default language. A catalog that has nothing for the default language
//! yields an empty list, which the rotator treats as "show nothing".

use std::collections::BTreeMap;

/// Language used when the requested one has no phrases.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Ordered loading phrases keyed by language tag.
#[derive(Debug, Clone, Default)]
pub struct PhraseCatalog {
    default_language: String,
    tables: BTreeMap<String, Vec<String>>,
}

impl PhraseCatalog {
    /// Empty catalog falling back to [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_owned(),
            tables: BTreeMap::new(),
        }
    }

    /// The site's built-in English and European-Portuguese phrases.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with(
                "en",
                [
                    "Preparing the perfect experience",
                    "Loading premium design",
                    "Almost ready to impress",
                ],
            )
            .with(
                "pt-PT",
                [
                    "Preparando a experiência perfeita",
                    "Carregando design premium",
                    "Quase pronto para impressionar",
                ],
            )
    }

    /// Add or replace the phrases for `language`.
    #[must_use]
    pub fn with<I, S>(mut self, language: &str, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.trim().is_empty())
            .collect();
        self.tables.insert(normalize_tag(language), phrases);
        self
    }

    /// Change the fallback language.
    #[must_use]
    pub fn default_language(mut self, language: &str) -> Self {
        self.default_language = normalize_tag(language);
        self
    }

    fn non_empty(&self, tag: &str) -> Option<&[String]> {
        self.tables
            .get(tag)
            .map(Vec::as_slice)
            .filter(|p| !p.is_empty())
    }

    /// Phrases for `language`, falling back as described in the module docs.
    #[must_use]
    pub fn phrases_for(&self, language: &str) -> Vec<String> {
        let tag = normalize_tag(language);
        if let Some(found) = self.non_empty(&tag) {
            return found.to_vec();
        }

        let primary = primary_subtag(&tag);
        let by_primary = self
            .non_empty(primary)
            .or_else(|| {
                self.tables
                    .iter()
                    .find(|(k, v)| primary_subtag(k) == primary && !v.is_empty())
                    .map(|(_, v)| v.as_slice())
            });
        if let Some(found) = by_primary {
            return found.to_vec();
        }

        tracing::debug!(
            requested = %tag,
            fallback = %self.default_language,
            "no loading phrases for language, using fallback"
        );
        self.non_empty(&self.default_language)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// Languages with at least one phrase.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.as_str())
    }
}

/// Canonicalise a BCP-47-ish tag: `pt_pt.UTF-8` → `pt-PT`.
fn normalize_tag(raw: &str) -> String {
    let base = raw.split(['.', '@']).next().unwrap_or("").trim();
    let mut parts = base.split(['-', '_']).filter(|p| !p.is_empty());
    let Some(lang) = parts.next() else {
        return String::new();
    };
    let mut out = lang.to_ascii_lowercase();
    for part in parts {
        out.push('-');
        if part.len() == 2 {
            out.push_str(&part.to_ascii_uppercase());
        } else {
            out.push_str(&part.to_ascii_lowercase());
        }
    }
    out
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_variants() {
        assert_eq!(normalize_tag("pt_pt.UTF-8"), "pt-PT");
        assert_eq!(normalize_tag("EN"), "en");
        assert_eq!(normalize_tag("zh-hant-tw"), "zh-hant-TW");
        assert_eq!(normalize_tag(""), "");
    }

    #[test]
    fn exact_match() {
        let c = PhraseCatalog::builtin();
        assert_eq!(c.phrases_for("pt-PT")[0], "Preparando a experiência perfeita");
    }

    #[test]
    fn primary_subtag_match() {
        let c = PhraseCatalog::builtin();
        assert_eq!(c.phrases_for("pt")[1], "Carregando design premium");
        assert_eq!(c.phrases_for("pt-BR")[2], "Quase pronto para impressionar");
        assert_eq!(c.phrases_for("en-GB")[0], "Preparing the perfect experience");
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let c = PhraseCatalog::builtin();
        assert_eq!(c.phrases_for("de"), c.phrases_for("en"));
        assert_eq!(c.phrases_for(""), c.phrases_for("en"));
    }

    #[test]
    fn empty_table_is_skipped() {
        let c = PhraseCatalog::builtin().with("fr", Vec::<String>::new());
        assert_eq!(c.phrases_for("fr"), c.phrases_for("en"));
        assert!(!c.languages().any(|l| l == "fr"));
    }

    #[test]
    fn custom_default_language() {
        let c = PhraseCatalog::builtin().default_language("pt-PT");
        assert_eq!(c.phrases_for("ja"), c.phrases_for("pt-PT"));
    }

    #[test]
    fn missing_default_yields_empty() {
        let c = PhraseCatalog::new().with("pt-PT", ["Olá"]);
        assert!(c.phrases_for("de").is_empty());
    }

    #[test]
    fn blank_phrases_are_dropped() {
        let c = PhraseCatalog::new().with("en", ["A", "  ", "B"]);
        assert_eq!(c.phrases_for("en"), vec!["A".to_owned(), "B".to_owned()]);
    }
}
