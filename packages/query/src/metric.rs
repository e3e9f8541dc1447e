//! Metric resolution for person-type-sensitive charts.

use collision_dash_collision_models::MetricColumn;
use collision_dash_query_models::ParsedQuery;

/// Decides which injury-count column person-type-sensitive charts use.
///
/// Defaults to the aggregate total. When the search text names exactly
/// one person type the chart narrows to that type's column; naming two
/// or more is ambiguous and falls back to the total rather than silently
/// picking whichever matched first.
#[must_use]
pub fn resolve_metric(parsed: &ParsedQuery) -> MetricColumn {
    let mut person_types = parsed.person_types.iter();
    match (person_types.next(), person_types.next()) {
        (Some(only), None) => only.injury_metric(),
        _ => MetricColumn::TotalInjuries,
    }
}
