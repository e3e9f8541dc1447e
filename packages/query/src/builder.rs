//! Predicate assembly from dropdown state and classified search text.
//!
//! Dropdown selections and parsed-from-text values for the same column
//! are unioned — search augments filters, it never replaces them. Only
//! vocabulary-whitelisted values enter structured clauses; everything
//! else either produces a diagnostic (explicit selections) or flows into
//! the free-text clause (search tokens).

use collision_dash_collision_models::FilterColumn;
use collision_dash_query_models::{
    Clause, Diagnostic, FilterSelection, ParsedQuery, Predicate, ReportPlan,
};

use crate::classify::classify;
use crate::metric::resolve_metric;
use crate::vocabulary::Vocabulary;

/// Runs the full pipeline for one report request:
/// classify → build predicate → resolve metric.
#[must_use]
pub fn plan_report(selection: &FilterSelection, vocabulary: &Vocabulary) -> ReportPlan {
    let (parsed, mut diagnostics) = selection
        .search_text()
        .map_or_else(Default::default, |text| classify(text, vocabulary));

    let (predicate, build_diagnostics) = build_predicate(selection, &parsed, vocabulary);
    diagnostics.extend(build_diagnostics);

    for diagnostic in &diagnostics {
        log::warn!("report request: {diagnostic}");
    }

    ReportPlan {
        predicate,
        metric: resolve_metric(&parsed),
        diagnostics,
    }
}

/// Combines explicit dropdown state with the classified search text into
/// a single [`Predicate`].
///
/// Unknown explicit values are dropped with a diagnostic rather than
/// failing the request. A request with no active filters produces a
/// match-all predicate (zero clauses).
#[must_use]
pub fn build_predicate(
    selection: &FilterSelection,
    parsed: &ParsedQuery,
    vocabulary: &Vocabulary,
) -> (Predicate, Vec<Diagnostic>) {
    let mut clauses = Vec::new();
    let mut diagnostics = Vec::new();

    let string_columns = [
        (FilterColumn::Borough, &selection.boroughs, &parsed.boroughs),
        (
            FilterColumn::VehicleCategory,
            &selection.vehicle_categories,
            &parsed.vehicle_categories,
        ),
        (
            FilterColumn::ContributingFactor,
            &selection.contributing_factors,
            &parsed.contributing_factors,
        ),
        (
            FilterColumn::InjuryType,
            &selection.injury_types,
            &parsed.injury_types,
        ),
    ];

    for (column, explicit, from_text) in string_columns {
        // Parsed values are already canonical; explicit selections are
        // validated against the vocabulary here.
        let mut values: Vec<String> = from_text.iter().cloned().collect();
        for value in explicit {
            match vocabulary.values_for(column).resolve(value) {
                Some(canonical) => values.push(canonical.to_string()),
                None => diagnostics.push(Diagnostic::UnknownVocabularyValue {
                    column,
                    value: value.clone(),
                }),
            }
        }
        values.sort_unstable();
        values.dedup();
        if !values.is_empty() {
            clauses.push(Clause::StringIn { column, values });
        }
    }

    // Years are typed integers from both sources, so no vocabulary
    // whitelist is needed for safety.
    let years: Vec<i32> = selection.years.union(&parsed.years).copied().collect();
    if !years.is_empty() {
        clauses.push(Clause::YearIn { years });
    }

    if !parsed.weekdays.is_empty() {
        clauses.push(Clause::WeekdayIn {
            days: parsed.weekdays.iter().copied().collect(),
        });
    }

    for term in &parsed.free_text_terms {
        clauses.push(Clause::Contains { term: term.clone() });
    }

    (Predicate { clauses }, diagnostics)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use collision_dash_collision_models::{MetricColumn, Weekday};

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
            vec!["SEDAN".to_string(), "TAXI".to_string()],
            vec!["SPEEDING".to_string()],
            vec!["INJURED".to_string(), "KILLED".to_string()],
        )
    }

    fn selection_with_boroughs(boroughs: &[&str]) -> FilterSelection {
        FilterSelection {
            boroughs: boroughs.iter().map(ToString::to_string).collect(),
            ..FilterSelection::default()
        }
    }

    fn find_string_clause(predicate: &Predicate, column: FilterColumn) -> Option<&Vec<String>> {
        predicate.clauses.iter().find_map(|clause| match clause {
            Clause::StringIn { column: c, values } if *c == column => Some(values),
            _ => None,
        })
    }

    #[test]
    fn no_filters_yields_match_all() {
        let plan = plan_report(&FilterSelection::default(), &vocabulary());
        assert!(plan.predicate.is_match_all());
        assert_eq!(plan.metric, MetricColumn::TotalInjuries);
        assert!(plan.diagnostics.is_empty());
    }

    #[test]
    fn dropdown_and_search_values_union_without_duplicates() {
        let mut selection = selection_with_boroughs(&["BROOKLYN", "QUEENS"]);
        selection.search_text = Some("brooklyn bronx".to_string());
        let plan = plan_report(&selection, &vocabulary());

        let values = find_string_clause(&plan.predicate, FilterColumn::Borough).unwrap();
        assert_eq!(values, &["BRONX", "BROOKLYN", "QUEENS"]);
    }

    #[test]
    fn scenario_brooklyn_2022_cyclist() {
        let mut selection = selection_with_boroughs(&["BROOKLYN"]);
        selection.search_text = Some("2022 cyclist".to_string());
        let plan = plan_report(&selection, &vocabulary());

        let boroughs = find_string_clause(&plan.predicate, FilterColumn::Borough).unwrap();
        assert_eq!(boroughs, &["BROOKLYN"]);
        assert!(
            plan.predicate
                .clauses
                .iter()
                .any(|c| matches!(c, Clause::YearIn { years } if years == &[2022]))
        );
        assert_eq!(plan.metric, MetricColumn::CyclistsInjured);
        assert!(plan.diagnostics.is_empty());
    }

    #[test]
    fn unknown_dropdown_value_drops_clause_with_diagnostic() {
        let plan = plan_report(&selection_with_boroughs(&["NEWARK"]), &vocabulary());

        assert!(find_string_clause(&plan.predicate, FilterColumn::Borough).is_none());
        assert_eq!(
            plan.diagnostics,
            vec![Diagnostic::UnknownVocabularyValue {
                column: FilterColumn::Borough,
                value: "NEWARK".to_string(),
            }]
        );
    }

    #[test]
    fn unrecognized_search_text_becomes_contains_clauses() {
        let selection = FilterSelection {
            search_text: Some("xyzunknown123abc".to_string()),
            ..FilterSelection::default()
        };
        let plan = plan_report(&selection, &vocabulary());

        assert_eq!(
            plan.predicate.clauses,
            vec![Clause::Contains {
                term: "xyzunknown123abc".to_string(),
            }]
        );
    }

    #[test]
    fn search_year_included_as_integer() {
        let selection = FilterSelection {
            search_text: Some("2021".to_string()),
            ..FilterSelection::default()
        };
        let plan = plan_report(&selection, &vocabulary());

        assert!(
            plan.predicate
                .clauses
                .iter()
                .any(|c| matches!(c, Clause::YearIn { years } if years.contains(&2021)))
        );
    }

    #[test]
    fn weekdays_from_search_emit_weekday_clause() {
        let selection = FilterSelection {
            search_text: Some("friday sat".to_string()),
            ..FilterSelection::default()
        };
        let plan = plan_report(&selection, &vocabulary());

        assert!(plan.predicate.clauses.iter().any(
            |c| matches!(c, Clause::WeekdayIn { days } if days == &[Weekday::Friday, Weekday::Saturday])
        ));
    }

    #[test]
    fn explicit_years_pass_through_untyped_check() {
        let selection = FilterSelection {
            years: BTreeSet::from([2020, 2022]),
            ..FilterSelection::default()
        };
        let plan = plan_report(&selection, &vocabulary());

        assert!(
            plan.predicate
                .clauses
                .iter()
                .any(|c| matches!(c, Clause::YearIn { years } if years == &[2020, 2022]))
        );
    }

    #[test]
    fn building_twice_is_idempotent() {
        let mut selection = selection_with_boroughs(&["QUEENS", "BROOKLYN"]);
        selection.search_text = Some("2022 sedan mystery cyclist".to_string());
        let vocab = vocabulary();

        let first = plan_report(&selection, &vocab);
        let second = plan_report(&selection, &vocab);
        assert_eq!(first, second);
    }

    #[test]
    fn quoted_injection_text_never_reaches_structured_clauses() {
        let selection = FilterSelection {
            search_text: Some("'; drop table collisions; --".to_string()),
            ..FilterSelection::default()
        };
        let plan = plan_report(&selection, &vocabulary());

        for clause in &plan.predicate.clauses {
            match clause {
                Clause::Contains { .. } => {}
                other => panic!("expected only contains clauses, got {other:?}"),
            }
        }
    }
}
