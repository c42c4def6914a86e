//! Lightweight language detection for extracted contract text.
//!
//! Character-class frequency scoring over the languages hotel contracts
//! actually arrive in. This is a heuristic, not a statistical classifier —
//! short or mixed-language text may be misclassified, so the result is a
//! display hint and a prompt-localization signal, nothing more.

use std::sync::LazyLock;

use regex::Regex;

/// One character-class pattern per supported language, in declaration order.
/// English is first: ties and empty input resolve to "en".
static LANGUAGE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("en", r"[a-zA-Z]"),
        ("es", r"[ñáéíóúü¿¡]"),
        ("fr", r"[àâäéèêëïîôùûÿœæç]"),
        ("de", r"[äöüß]"),
        ("it", r"[àèéìòù]"),
        ("pt", r"[ãõáéíóúâêîôû]"),
        ("ru", r"[а-яА-Я]"),
        ("zh", r"[\u{4e00}-\u{9fff}]"),
        ("ja", r"[\u{3040}-\u{309f}\u{30a0}-\u{30ff}]"),
        ("ar", r"[\u{0600}-\u{06ff}]"),
    ]
    .into_iter()
    .map(|(tag, pattern)| (tag, Regex::new(pattern).expect("valid language pattern")))
    .collect()
});

/// Detect the dominant language of a text. Returns a lowercase
/// ISO-639-1-like tag ("en", "es", ...). Empty input or no scoring pattern
/// yields "en".
pub fn detect_language(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count == 0 {
        return "en".to_string();
    }

    let mut best = "en";
    let mut best_score = 0.0_f64;

    for (tag, pattern) in LANGUAGE_PATTERNS.iter() {
        let matches = pattern.find_iter(text).count();
        let score = matches as f64 / char_count as f64;
        if score > best_score {
            best_score = score;
            best = tag;
        }
    }

    best.to_string()
}
