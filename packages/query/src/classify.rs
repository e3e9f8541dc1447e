//! Keyword classifier for the free-text search box.
//!
//! Lowercases and whitespace-tokenizes the search text, then classifies
//! each token in a fixed precedence order: year pattern, borough, vehicle
//! category, injury type, person type, weekday, contributing factor.
//! Anything unrecognized becomes a residual free-text term. Matching is
//! exact after normalization; no stemming or fuzzy matching.

use std::sync::LazyLock;

use collision_dash_collision_models::{FilterColumn, PersonType, Weekday};
use collision_dash_query_models::{Diagnostic, ParsedQuery};
use regex::Regex;

use crate::vocabulary::Vocabulary;

/// Four-digit year tokens in the 2000s (e.g. `2022`).
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^20\d{2}$").expect("valid regex"));

/// Classifies raw search text into a [`ParsedQuery`].
///
/// Every input token appears in exactly one output bucket; ties resolve
/// to the earliest matching category in the precedence order. Empty or
/// whitespace-only input yields an empty query. Tokens matching the year
/// pattern but failing integer conversion are dropped with a diagnostic.
#[must_use]
pub fn classify(search_text: &str, vocabulary: &Vocabulary) -> (ParsedQuery, Vec<Diagnostic>) {
    let mut parsed = ParsedQuery::default();
    let mut diagnostics = Vec::new();

    for token in search_text.to_lowercase().split_whitespace() {
        if YEAR_RE.is_match(token) {
            match token.parse::<i32>() {
                Ok(year) => {
                    parsed.years.insert(year);
                }
                Err(_) => {
                    log::warn!("search token {token:?} matched year pattern but failed to parse");
                    diagnostics.push(Diagnostic::MalformedYearToken {
                        token: token.to_string(),
                    });
                }
            }
            continue;
        }

        if let Some(borough) = vocabulary.values_for(FilterColumn::Borough).resolve(token) {
            parsed.boroughs.insert(borough.to_string());
            continue;
        }

        if let Some(category) = vocabulary
            .values_for(FilterColumn::VehicleCategory)
            .resolve(token)
        {
            parsed.vehicle_categories.insert(category.to_string());
            continue;
        }

        if let Some(injury) = vocabulary
            .values_for(FilterColumn::InjuryType)
            .resolve(token)
        {
            parsed.injury_types.insert(injury.to_string());
            continue;
        }

        if let Ok(person_type) = token.parse::<PersonType>() {
            parsed.person_types.insert(person_type);
            continue;
        }

        if let Some(weekday) = Weekday::from_token(token) {
            parsed.weekdays.insert(weekday);
            continue;
        }

        if let Some(factor) = vocabulary
            .values_for(FilterColumn::ContributingFactor)
            .resolve(token)
        {
            parsed.contributing_factors.insert(factor.to_string());
            continue;
        }

        parsed.free_text_terms.push(token.to_string());
    }

    (parsed, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(
            vec![
                "BRONX".to_string(),
                "BROOKLYN".to_string(),
                "MANHATTAN".to_string(),
                "QUEENS".to_string(),
                "STATEN ISLAND".to_string(),
            ],
            vec![2020, 2021, 2022],
            vec!["SEDAN".to_string(), "TAXI".to_string(), "BICYCLE".to_string()],
            vec!["SPEEDING".to_string(), "GLARE".to_string()],
            vec!["INJURED".to_string(), "KILLED".to_string()],
        )
    }

    #[test]
    fn empty_text_yields_empty_query() {
        let (parsed, diagnostics) = classify("   ", &vocabulary());
        assert!(parsed.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn year_tokens_parse_as_integers() {
        let (parsed, _) = classify("2022 crashes", &vocabulary());
        assert!(parsed.years.contains(&2022));
        assert_eq!(parsed.free_text_terms, vec!["crashes"]);
    }

    #[test]
    fn year_outside_pattern_is_free_text() {
        let (parsed, _) = classify("1999", &vocabulary());
        assert!(parsed.years.is_empty());
        assert_eq!(parsed.free_text_terms, vec!["1999"]);
    }

    #[test]
    fn borough_matches_case_insensitively_with_canonical_spelling() {
        let (parsed, _) = classify("Brooklyn taxi", &vocabulary());
        assert!(parsed.boroughs.contains("BROOKLYN"));
        assert!(parsed.vehicle_categories.contains("TAXI"));
        assert!(parsed.free_text_terms.is_empty());
    }

    #[test]
    fn person_types_and_weekdays_are_recognized() {
        let (parsed, _) = classify("cyclist friday MON", &vocabulary());
        assert!(parsed.person_types.contains(&PersonType::Cyclist));
        assert!(parsed.weekdays.contains(&Weekday::Friday));
        assert!(parsed.weekdays.contains(&Weekday::Monday));
    }

    #[test]
    fn contributing_factors_match_after_other_categories() {
        let (parsed, _) = classify("speeding", &vocabulary());
        assert!(parsed.contributing_factors.contains("SPEEDING"));
    }

    #[test]
    fn every_token_lands_in_exactly_one_bucket() {
        let (parsed, _) = classify("2021 queens sedan killed motorist tue glare mystery", &vocabulary());
        assert_eq!(parsed.years.len(), 1);
        assert_eq!(parsed.boroughs.len(), 1);
        assert_eq!(parsed.vehicle_categories.len(), 1);
        assert_eq!(parsed.injury_types.len(), 1);
        assert_eq!(parsed.person_types.len(), 1);
        assert_eq!(parsed.weekdays.len(), 1);
        assert_eq!(parsed.contributing_factors.len(), 1);
        assert_eq!(parsed.free_text_terms, vec!["mystery"]);
    }

    #[test]
    fn unknown_tokens_fall_through_in_order() {
        let (parsed, _) = classify("xyzunknown123abc another", &vocabulary());
        assert_eq!(parsed.free_text_terms, vec!["xyzunknown123abc", "another"]);
    }

    #[test]
    fn multi_word_boroughs_do_not_match_single_tokens() {
        // "staten island" tokenizes into two words, neither of which is a
        // vocabulary entry on its own.
        let (parsed, _) = classify("staten island", &vocabulary());
        assert!(parsed.boroughs.is_empty());
        assert_eq!(parsed.free_text_terms, vec!["staten", "island"]);
    }
}
