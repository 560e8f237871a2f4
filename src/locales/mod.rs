//! Localization of the dialog messages
//!
//! The dialog needs three strings (loading, no-result, search-error) plus a
//! little chrome; they are negotiated from the Accept-Language header.

use std::collections::HashMap;

/// Languages with a message catalog
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "de", "fr", "zh"];

/// Parse an Accept-Language header and return the best supported language
pub fn negotiate_language(header: &str) -> Option<&'static str> {
    // Header like "en-US,en;q=0.9,de;q=0.8"
    let mut candidates: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut parts = part.trim().split(';');
            let lang = parts.next()?.trim().to_string();

            let quality = parts
                .next()
                .and_then(|q| q.trim().strip_prefix("q=").and_then(|v| v.parse().ok()))
                .unwrap_or(1.0);

            Some((lang, quality))
        })
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (lang, _) in candidates {
        let base = lang.split('-').next().unwrap_or(&lang);
        if let Some(supported) = SUPPORTED_LANGUAGES.iter().find(|l| **l == base) {
            return Some(*supported);
        }
    }

    None
}

/// Message catalog for the dialog strings
pub struct Translations {
    translations: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    pub fn new() -> Self {
        let mut translations = HashMap::new();

        let catalog = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };

        translations.insert(
            "en".to_string(),
            catalog(&[
                ("loading", "Loading..."),
                ("no_result", "No result found! Please try another keyword."),
                ("search_error", "Error searching for metadata"),
                ("search", "Search"),
                ("fetch_metadata", "Fetch Metadata"),
            ]),
        );

        translations.insert(
            "de".to_string(),
            catalog(&[
                ("loading", "Lade..."),
                (
                    "no_result",
                    "Kein Ergebnis gefunden! Bitte anderes Stichwort versuchen.",
                ),
                ("search_error", "Fehler bei der Metadaten-Suche"),
                ("search", "Suchen"),
                ("fetch_metadata", "Metadaten laden"),
            ]),
        );

        translations.insert(
            "fr".to_string(),
            catalog(&[
                ("loading", "Chargement..."),
                (
                    "no_result",
                    "Aucun résultat ! Essayez un autre mot-clé.",
                ),
                ("search_error", "Erreur lors de la recherche de métadonnées"),
                ("search", "Rechercher"),
                ("fetch_metadata", "Récupérer les métadonnées"),
            ]),
        );

        translations.insert(
            "zh".to_string(),
            catalog(&[
                ("loading", "加载中..."),
                ("no_result", "无查询结果，请尝试其他关键字"),
                ("search_error", "查询元数据出错"),
                ("search", "搜索"),
                ("fetch_metadata", "获取元数据"),
            ]),
        );

        Self { translations }
    }

    /// Get a translation for a key, falling back to English
    pub fn get(&self, lang: &str, key: &str) -> Option<&str> {
        let base = lang.split('-').next().unwrap_or(lang);

        self.translations
            .get(base)
            .and_then(|t| t.get(key))
            .map(|s| s.as_str())
            .or_else(|| {
                self.translations
                    .get("en")
                    .and_then(|t| t.get(key))
                    .map(|s| s.as_str())
            })
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiation_picks_highest_quality_supported() {
        assert_eq!(negotiate_language("en-US,en;q=0.9,de;q=0.8"), Some("en"));
        assert_eq!(negotiate_language("zh-CN,zh;q=0.9"), Some("zh"));
        assert_eq!(negotiate_language("xx-YY"), None);
    }

    #[test]
    fn lookup_falls_back_to_english() {
        let t = Translations::new();
        assert_eq!(t.get("de", "loading"), Some("Lade..."));
        // "es" has no catalog
        assert_eq!(t.get("es", "loading"), Some("Loading..."));
        assert!(t.get("en", "missing_key").is_none());
    }
}
