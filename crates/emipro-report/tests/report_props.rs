// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for topic resolution and section formatting.

use emipro_core::GroundingCitation;
use emipro_report::catalog;
use emipro_report::formatter::{extract_sources, group_by_category, BudgetItem};
use proptest::prelude::*;

fn citation() -> impl Strategy<Value = GroundingCitation> {
    (
        proptest::option::of("[a-c]{0,2}"),
        proptest::option::of("[x-z]{0,2}"),
    )
        .prop_map(|(title, uri)| GroundingCitation { title, uri })
}

proptest! {
    #[test]
    fn resolution_follows_catalog_order(picks in proptest::sample::subsequence(vec!["healthcare", "finance", "situation", "visa"], 1..=4), seed in any::<u64>()) {
        let mut shuffled = picks.clone();
        // Deterministic shuffle from the seed.
        let len = shuffled.len();
        for i in 0..len {
            let j = ((seed >> (i * 8)) as usize) % len;
            shuffled.swap(i, j);
        }

        let resolved: Vec<&str> = catalog::resolve(&shuffled[..]).unwrap().iter().map(|t| t.id).collect();
        prop_assert_eq!(resolved, picks);
    }

    #[test]
    fn sources_are_unique_complete_and_ordered(citations in proptest::collection::vec(citation(), 0..20)) {
        let sources = extract_sources(&citations);

        let mut uris: Vec<&str> = sources.iter().map(|s| s.uri.as_str()).collect();
        let before = uris.len();
        uris.sort_unstable();
        uris.dedup();
        prop_assert_eq!(uris.len(), before);

        for source in &sources {
            prop_assert!(!source.title.is_empty());
            prop_assert!(!source.uri.is_empty());
        }

        // Each kept source is the first complete citation with its URI.
        for source in &sources {
            let first = citations
                .iter()
                .find(|c| {
                    c.uri.as_deref() == Some(source.uri.as_str())
                        && c.title.as_deref().is_some_and(|t| !t.is_empty())
                })
                .unwrap();
            prop_assert_eq!(first.title.as_deref(), Some(source.title.as_str()));
        }
    }

    #[test]
    fn grouping_keeps_every_item_once(categories in proptest::collection::vec("[A-C]", 0..15)) {
        let items: Vec<BudgetItem> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| BudgetItem { category: c.clone(), item: i.to_string(), ..BudgetItem::default() })
            .collect();

        let groups = group_by_category(&items);

        let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
        prop_assert_eq!(total, items.len());

        let mut first_seen: Vec<&str> = Vec::new();
        for c in &categories {
            if !first_seen.contains(&c.as_str()) {
                first_seen.push(c);
            }
        }
        let group_names: Vec<&str> = groups.iter().map(|(name, _)| *name).collect();
        prop_assert_eq!(group_names, first_seen);

        for (_, members) in &groups {
            let order: Vec<usize> = members.iter().map(|m| m.item.parse().unwrap()).collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
