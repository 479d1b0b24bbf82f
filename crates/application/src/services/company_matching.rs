//! Candidate matching helpers for company reconciliation
//!
//! Pure functions over CRM search results. Ordering is significant: every
//! helper returns the first qualifying item in input order unless noted.

use domain::Domain;

use crate::ports::{FieldValue, ListEntry, OrganizationCandidate};

/// Remove exact duplicates, keeping the first occurrence of each item
pub fn dedupe<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// The normalized input domain followed by the enriched website domain
pub fn known_domains(input: &Domain, website: Option<&Domain>) -> Vec<Domain> {
    dedupe(std::iter::once(input.clone()).chain(website.cloned()))
}

/// Check that every known domain appears among the candidate's domains
pub fn covers_known_domains(candidate: &OrganizationCandidate, known: &[Domain]) -> bool {
    known
        .iter()
        .all(|domain| candidate.domains.contains(domain))
}

/// First candidate whose domains are a superset of `known`
pub fn select_match<'a>(
    candidates: &'a [OrganizationCandidate],
    known: &[Domain],
) -> Option<&'a OrganizationCandidate> {
    candidates
        .iter()
        .find(|candidate| covers_known_domains(candidate, known))
}

/// Most recent entry in `list_id`
///
/// On equal `created_at` the later entry in input order wins.
pub fn last_list_entry(entries: &[ListEntry], list_id: i64) -> Option<&ListEntry> {
    entries
        .iter()
        .filter(|entry| entry.list_id == list_id)
        .fold(None, |latest: Option<&ListEntry>, entry| match latest {
            Some(current) if current.created_at > entry.created_at => Some(current),
            _ => Some(entry),
        })
}

/// First value for `field_id` attached to `list_entry_id`
///
/// A `list_entry_id` of `None` selects organization-level values.
pub fn first_field_value(
    values: &[FieldValue],
    list_entry_id: Option<i64>,
    field_id: i64,
) -> Option<&FieldValue> {
    values
        .iter()
        .find(|value| value.list_entry_id == list_entry_id && value.field_id == field_id)
}
