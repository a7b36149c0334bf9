// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A small vanished-London topic and chunk set shared across integration
//! tests. Three topics, each with phonetic keyword variants and a couple of
//! content chunks carrying distinct facts.

use cicerone_core::types::{ArticleChunk, ChunkId, TopicId, TopicRecord};

pub fn topics() -> Vec<TopicRecord> {
    vec![
        TopicRecord {
            id: TopicId("royal-aquarium".into()),
            title: "Royal Aquarium".into(),
            hook: "it was a grand aquarium that rarely contained any fish.".into(),
            era: Some("Victorian".into()),
            location: Some("Westminster".into()),
            keywords: vec![
                "royal aquarium".into(),
                "aquarium".into(),
                "aquarim".into(),
            ],
        },
        TopicRecord {
            id: TopicId("tyburn".into()),
            title: "Tyburn".into(),
            hook: "London's most notorious execution site stood near today's Marble Arch.".into(),
            era: Some("Georgian".into()),
            location: Some("Marble Arch".into()),
            keywords: vec!["tyburn".into(), "tyburn tree".into(), "gallows".into()],
        },
        TopicRecord {
            id: TopicId("thorney-island".into()),
            title: "Thorney Island".into(),
            hook: "Westminster Abbey was built on a marshy island in the Thames.".into(),
            era: Some("Medieval".into()),
            location: Some("Westminster".into()),
            keywords: vec!["thorney island".into(), "thorney".into()],
        },
    ]
}

pub fn chunks() -> Vec<ArticleChunk> {
    vec![
        ArticleChunk {
            id: ChunkId("aq-1".into()),
            title: "Royal Aquarium".into(),
            content: "The Royal Aquarium opened in Westminster in 1876 opposite the Abbey. \
                 Its great tanks were meant for sea creatures but stood empty for years. \
                 The building hosted boxing matches and beauty shows instead of fish."
                .into(),
        },
        ArticleChunk {
            id: ChunkId("aq-2".into()),
            title: "Royal Aquarium entertainments".into(),
            content: "A human cannonball act drew enormous crowds to the Royal Aquarium. \
                 The roof was designed to open so balloons could ascend from the main hall. \
                 The site was cleared in 1903 to make way for the Methodist Central Hall."
                .into(),
        },
        ArticleChunk {
            id: ChunkId("ty-1".into()),
            title: "Tyburn gallows".into(),
            content: "The Tyburn gallows stood near present-day Marble Arch for six centuries. \
                 Condemned prisoners were carted three miles from Newgate through crowded streets. \
                 Hanging days were public holidays that drew tens of thousands of spectators."
                .into(),
        },
        ArticleChunk {
            id: ChunkId("th-1".into()),
            title: "Thorney Island".into(),
            content: "Thorney Island was a marshy eyot between two branches of the Tyburn stream. \
                 Edward the Confessor raised his abbey church there in the eleventh century. \
                 The island's outline survives in the street plan around Westminster Abbey."
                .into(),
        },
    ]
}
