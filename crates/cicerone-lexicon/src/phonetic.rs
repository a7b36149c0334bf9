// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phonetic normalization of speech-to-text misrecognitions.
//!
//! Voice transcription mangles proper nouns ("tie burn" for Tyburn, "fawny"
//! for Thorney). A static surface-form table rewrites known misrecognitions
//! to canonical spellings before any lookup or retrieval runs. Rules are
//! applied longest-surface-form-first so a multi-word rule is never shadowed
//! by a shorter one.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Known speech-to-text misrecognitions of corpus proper nouns.
///
/// Surface form on the left, canonical spelling on the right. Multi-word
/// surface forms match across a single space.
const CORRECTIONS: &[(&str, &str)] = &[
    // People
    ("ignacio", "ignatius"),
    ("ignasio", "ignatius"),
    ("ignacius", "ignatius"),
    ("ignasius", "ignatius"),
    ("shakespear", "shakespeare"),
    ("shakespere", "shakespeare"),
    ("shakspeare", "shakespeare"),
    // Thorney Island attracts the most variants
    ("thorny", "thorney"),
    ("thornay", "thorney"),
    ("thornie", "thorney"),
    ("fawny", "thorney"),
    ("fawney", "thorney"),
    ("fauny", "thorney"),
    ("fauney", "thorney"),
    ("forney", "thorney"),
    ("forny", "thorney"),
    ("thorn ey", "thorney"),
    ("forn ey", "thorney"),
    ("fourney", "thorney"),
    ("fourny", "thorney"),
    ("forn", "thorney"),
    ("phornee", "thorney"),
    // Tyburn
    ("tie burn", "tyburn"),
    ("tieburn", "tyburn"),
    ("tyeburn", "tyburn"),
    ("tiburn", "tyburn"),
    ("tybourne", "tyburn"),
    // Royal Aquarium
    ("aquarim", "aquarium"),
    ("aquariam", "aquarium"),
    ("aquareum", "aquarium"),
    ("aquaruim", "aquarium"),
    ("royale", "royal"),
    // Crystal Palace
    ("cristal", "crystal"),
    ("crystle", "crystal"),
    ("chrystal", "crystal"),
    // Westminster / Whitehall / Parliament
    ("westmister", "westminster"),
    ("westminister", "westminster"),
    ("west minster", "westminster"),
    ("white hall", "whitehall"),
    ("parliment", "parliament"),
    ("parlement", "parliament"),
    // The Thames
    ("tems", "thames"),
    ("tames", "thames"),
    ("temms", "thames"),
    // Devil's Acre
    ("devils acre", "devil's acre"),
    ("devil acre", "devil's acre"),
    ("devils aker", "devil's acre"),
    // Other London places
    ("voxhall", "vauxhall"),
    ("vox hall", "vauxhall"),
    ("vaux hall", "vauxhall"),
    ("southwork", "southwark"),
    ("south work", "southwark"),
    ("suthark", "southwark"),
    ("grenwich", "greenwich"),
    ("green witch", "greenwich"),
    ("grenidge", "greenwich"),
    ("wolwich", "woolwich"),
    ("wool witch", "woolwich"),
    ("bermondsy", "bermondsey"),
    ("burmondsey", "bermondsey"),
    ("holbourn", "holborn"),
    ("holeborn", "holborn"),
    ("aldwich", "aldwych"),
    ("old witch", "aldwych"),
    ("chisick", "chiswick"),
    ("chis wick", "chiswick"),
    ("dulwitch", "dulwich"),
    ("dull witch", "dulwich"),
    ("pickadilly", "piccadilly"),
    ("picadilly", "piccadilly"),
    ("marleybone", "marylebone"),
    ("marley bone", "marylebone"),
    ("smith field", "smithfield"),
    ("clerken well", "clerkenwell"),
    ("clarkenwell", "clerkenwell"),
];

/// Compiled rules, ordered longest surface form first.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let mut table: Vec<&(&str, &str)> = CORRECTIONS.iter().collect();
    table.sort_by_key(|(surface, _)| std::cmp::Reverse(surface.len()));
    table
        .into_iter()
        .map(|(surface, canonical)| {
            let pattern = format!(r"\b{}\b", regex::escape(surface));
            let re = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("invalid phonetic rule {surface:?}: {e}"));
            (re, *canonical)
        })
        .collect()
});

/// Rewrite known misheard proper nouns to canonical spellings.
///
/// Pure function: lowercases and trims the utterance, then applies each rule
/// on word boundaries. Unmatched input passes through unchanged and already
/// canonical input is a fixed point.
pub fn normalize_utterance(utterance: &str) -> String {
    let mut normalized = utterance.trim().to_lowercase();
    for (re, canonical) in RULES.iter() {
        if re.is_match(&normalized) {
            normalized = re.replace_all(&normalized, *canonical).into_owned();
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrects_common_misrecognitions() {
        assert_eq!(normalize_utterance("tell me about tie burn"), "tell me about tyburn");
        assert_eq!(normalize_utterance("what is fawny island"), "what is thorney island");
        assert_eq!(
            normalize_utterance("the royal aquariam please"),
            "the royal aquarium please"
        );
        assert_eq!(normalize_utterance("Westminister abbey"), "westminster abbey");
    }

    #[test]
    fn longest_rule_wins_over_shorter() {
        // "tie burn" must apply as a unit; "forn ey" must not leave a
        // stranded "forn" -> "thorney" rewrite behind.
        assert_eq!(normalize_utterance("forn ey island"), "thorney island");
        assert_eq!(normalize_utterance("devils aker"), "devil's acre");
    }

    #[test]
    fn idempotent_on_canonical_input() {
        let canonical = [
            "tell me about tyburn",
            "thorney island",
            "the royal aquarium in westminster",
            "devil's acre",
            "where is greenwich",
        ];
        for text in canonical {
            assert_eq!(normalize_utterance(text), text, "must be a fixed point");
        }
    }

    #[test]
    fn unmatched_input_passes_through() {
        assert_eq!(
            normalize_utterance("what happened at the great fire"),
            "what happened at the great fire"
        );
    }

    #[test]
    fn matches_are_case_insensitive_and_word_bounded() {
        assert_eq!(normalize_utterance("TIE BURN"), "tyburn");
        // "tems" inside a longer word must not trigger.
        assert_eq!(normalize_utterance("systems of government"), "systems of government");
    }

    #[test]
    fn double_application_is_stable() {
        let once = normalize_utterance("fawney island near the tems");
        let twice = normalize_utterance(&once);
        assert_eq!(once, twice);
    }
}
