// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Historical era detection and per-era timeline tables.
//!
//! Era labels come from explicit keywords when an article names its period,
//! otherwise from a year scan: collect 4-digit years from the text, average
//! them, and map the average into an era range.

use std::sync::LazyLock;

use regex::Regex;

use cicerone_core::types::TimelineEvent;

/// Explicit era keywords checked before the year scan.
const ERA_KEYWORDS: &[(&str, &str)] = &[
    ("victorian", "Victorian Era (1837-1901)"),
    ("georgian", "Georgian Era (1714-1830)"),
    ("elizabethan", "Elizabethan Era (1558-1603)"),
    ("medieval", "Medieval Period (500-1500)"),
    ("tudor", "Tudor Period (1485-1603)"),
    ("stuart", "Stuart Period (1603-1714)"),
    ("regency", "Regency Era (1811-1820)"),
    ("edwardian", "Edwardian Era (1901-1910)"),
    ("roman", "Roman Britain (43-410 AD)"),
];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[0-9]{3})\b").expect("year pattern"));

/// Detect the historical era an article belongs to.
pub fn detect_era(content: &str) -> Option<String> {
    let content_lower = content.to_lowercase();

    for (keyword, era) in ERA_KEYWORDS {
        if content_lower.contains(keyword) {
            return Some((*era).to_string());
        }
    }

    // No explicit keyword: average the 4-digit years mentioned and map the
    // average into an era range.
    let years: Vec<i32> = YEAR_RE
        .captures_iter(content)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    if years.is_empty() {
        return None;
    }
    let avg = years.iter().sum::<i32>() / years.len() as i32;

    let era = match avg {
        1837..=1901 => "Victorian Era (1837-1901)",
        1714..=1836 => "Georgian Era (1714-1830)",
        1902..=1910 => "Edwardian Era (1901-1910)",
        1603..=1713 => "Stuart Period (1603-1714)",
        1485..=1602 => "Tudor Period (1485-1603)",
        500..=1484 => "Medieval Period (500-1500)",
        _ => return None,
    };
    Some(era.to_string())
}

/// Timeline events for eras with curated entries.
///
/// Matches on the era label's leading keyword so both "victorian" and the
/// full "Victorian Era (1837-1901)" label resolve.
pub fn timeline_for(era: &str) -> Option<Vec<TimelineEvent>> {
    let era_lower = era.to_lowercase();

    let events: &[(i32, &str, &str)] = if era_lower.contains("victorian") {
        &[
            (1837, "Queen Victoria's Coronation", "Beginning of the Victorian era"),
            (1851, "Great Exhibition", "Crystal Palace opens in Hyde Park"),
            (1863, "First Underground", "Metropolitan Railway opens"),
            (1876, "Royal Aquarium Opens", "Entertainment venue in Westminster"),
            (1901, "End of Era", "Death of Queen Victoria"),
        ]
    } else if era_lower.contains("georgian") {
        &[
            (1714, "George I", "House of Hanover begins"),
            (1750, "Westminster Bridge", "Second Thames crossing opens"),
            (1780, "Gordon Riots", "Anti-Catholic riots in London"),
            (1830, "End of Era", "Death of George IV"),
        ]
    } else if era_lower.contains("tudor") {
        &[
            (1485, "Henry VII", "Tudor dynasty begins"),
            (1534, "Reformation", "Break with Rome"),
            (1558, "Elizabeth I", "Elizabethan era begins"),
            (1603, "End of Era", "Death of Elizabeth I"),
        ]
    } else if era_lower.contains("medieval") {
        &[
            (1066, "Norman Conquest", "William the Conqueror"),
            (1215, "Magna Carta", "Foundation of English law"),
            (1348, "Black Death", "Plague reaches London"),
            (1485, "End of Era", "Tudor period begins"),
        ]
    } else {
        return None;
    };

    Some(
        events
            .iter()
            .map(|(year, title, description)| TimelineEvent {
                year: *year,
                title: (*title).to_string(),
                description: (*description).to_string(),
            })
            .collect(),
    )
}
