use crate::analysis::ordered::InsertionOrderedMap;
use crate::models::{LanguageShare, Repository};

struct LanguageTotal {
    color: Option<String>,
    size: u64,
}

/// Every language across all repositories, ranked by total bytes.
///
/// Sizes are merged by language name; the color kept is the one seen first.
/// Equal sizes keep encounter order. Returns an empty list when there are no
/// language bytes at all, since no share can be computed.
pub fn rank_languages(repositories: &[Repository]) -> Vec<LanguageShare> {
    let mut totals: InsertionOrderedMap<String, LanguageTotal> = InsertionOrderedMap::new();

    for repo in repositories {
        for entry in &repo.languages {
            let name = entry.language.name.clone();
            let total = totals.entry_or_insert_with(name, || LanguageTotal {
                color: entry.language.color.clone(),
                size: 0,
            });
            total.size += entry.size;
        }
    }

    let total_size: u64 = totals.iter().map(|(_, t)| t.size).sum();
    if total_size == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<LanguageShare> = totals
        .into_entries()
        .into_iter()
        .map(|(name, total)| LanguageShare {
            name,
            color: total.color,
            size: total.size,
            percentage: round1(total.size as f64 / total_size as f64 * 100.0),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.size.cmp(&a.size));
    ranked
}

/// Rounds a percentage to one decimal the way a fixed-point formatter does:
/// the nearest tenth to the exact stored value, with exact ties going up.
fn round1(value: f64) -> f64 {
    // .x5 is only ever exact in binary when value * 4 is odd
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        return (value * 10.0).round() / 10.0;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}
