//! Italian orthographic normalization.
//!
//! Normattiva exports often spell accented vowels the typewriter way, with an
//! ASCII apostrophe after the vowel ("liberta'", "E' vietato"). This module
//! restores the accented characters and undoes the few corrections that would
//! otherwise be wrong.

/// Apostrophe spellings and their accented replacements, applied in order.
const ACCENTS: [(&str, &str); 7] = [
    ("a'", "à"),
    ("e'", "é"),
    ("i'", "ì"),
    ("A'", "À"),
    ("o'", "ò"),
    ("u'", "ù"),
    ("E'", "È"),
];

/// Contextual fixes applied after the accent pass, in order.
///
/// "po'" is a truncation, not an accent; the conjunction "è" takes a grave
/// accent; "e\'" shows up when the export escapes the apostrophe.
const CONTEXTUAL: [(&str, &str); 4] = [
    ("pò", "po'"),
    ("Pò", "Po'"),
    ("e\\'", "è"),
    ("cioé", "cioè"),
];

/// Restore accented characters in Italian text.
///
/// Total and deterministic: every input has exactly one output and text
/// without any targeted pattern is returned unchanged.
///
/// # Examples
/// ```
/// use normattiva_converter::text::normalize_accents;
///
/// assert_eq!(normalize_accents("liberta'"), "libertà");
/// assert_eq!(normalize_accents("un po' di piu'"), "un po' di più");
/// assert_eq!(normalize_accents("cio' che e' previsto"), "ciò che è previsto");
/// ```
pub fn normalize_accents(text: &str) -> String {
    let mut result = text.to_string();

    for (from, to) in ACCENTS {
        result = result.replace(from, to);
    }

    let (truncations, escapes) = CONTEXTUAL.split_at(2);
    for (from, to) in truncations {
        result = result.replace(from, to);
    }

    // Loop until no more replacements needed (" é é " shares the middle space)
    loop {
        let replaced = result.replace(" é ", " è ");
        if replaced == result {
            break;
        }
        result = replaced;
    }

    for (from, to) in escapes {
        result = result.replace(from, to);
    }

    if let Some(head) = result.strip_suffix(" é") {
        result = format!("{head} è");
    }
    if let Some(tail) = result.strip_prefix("é ") {
        result = format!("è {tail}");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vowels_restored() {
        assert_eq!(normalize_accents("liberta'"), "libertà");
        assert_eq!(normalize_accents("perche'"), "perché");
        assert_eq!(normalize_accents("cosi'"), "così");
        assert_eq!(normalize_accents("pero'"), "però");
        assert_eq!(normalize_accents("piu'"), "più");
        assert_eq!(normalize_accents("CITTA'"), "CITTÀ");
        assert_eq!(normalize_accents("E' vietato"), "È vietato");
    }

    #[test]
    fn test_round_trip_of_each_accent() {
        for word in ["libertà", "perché", "così", "però", "più", "CITTÀ", "È"] {
            let legacy = word
                .replace('à', "a'")
                .replace('é', "e'")
                .replace('ì', "i'")
                .replace('ò', "o'")
                .replace('ù', "u'")
                .replace('À', "A'")
                .replace('È', "E'");
            assert_eq!(normalize_accents(&legacy), word, "legacy spelling {legacy}");
        }
    }

    #[test]
    fn test_po_is_a_truncation() {
        assert_eq!(normalize_accents("un po' di tempo"), "un po' di tempo");
        assert_eq!(normalize_accents("Po' di tempo"), "Po' di tempo");
    }

    #[test]
    fn test_conjunction_takes_grave_accent() {
        assert_eq!(normalize_accents("il dato e' pubblico"), "il dato è pubblico");
        assert_eq!(normalize_accents("a e' e' b"), "a è è b");
    }

    #[test]
    fn test_escaped_apostrophe() {
        assert_eq!(normalize_accents("il dato e\\' pubblico"), "il dato è pubblico");
    }

    #[test]
    fn test_cioe() {
        assert_eq!(normalize_accents("cioe' il documento"), "cioè il documento");
    }

    #[test]
    fn test_leading_and_trailing_conjunction() {
        assert_eq!(normalize_accents("e' pubblico"), "è pubblico");
        assert_eq!(normalize_accents("il dato e'"), "il dato è");
        assert_eq!(normalize_accents("é é"), "è è");
    }

    #[test]
    fn test_untouched_text() {
        let samples = [
            "",
            "Art. 20",
            "dell'amministrazione digitale",
            "l'accesso all'archivio",
            "Capo I. Principi generali",
            "1) testo",
        ];
        for s in samples {
            assert_eq!(normalize_accents(s), s);
        }
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "liberta' e responsabilita'",
            " e' e' e' ",
            "é é é",
            "un po' pò Pò",
            "cioe' e\\' gia'",
            "e'",
            "E' vero e'",
            "qualita' dei dati, cioé",
        ];
        for s in samples {
            let once = normalize_accents(s);
            assert_eq!(normalize_accents(&once), once, "input {s:?}");
        }
    }
}
