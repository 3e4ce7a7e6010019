//! Reconciliation of a hearing's stored cases with an extension request.
//!
//! Every function here is pure. Applying the same request twice produces the
//! same result as applying it once: entries keep a stable order (primary
//! side first, then secondary-only entries in their original order), and
//! each merge keeps the primary side's value for every field it sets.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::model::{CourtApplication, Defendant, Offence, ProsecutionCase, ReportingRestriction};

use super::HearingDay;

/// Unions two lists keyed by `key`.
///
/// Primary entries come first, in order, each merged with the first
/// secondary entry sharing its key. Secondary entries whose key is absent
/// from the primary list follow, in order.
fn union_by_key<T, K>(
    primary: &[T],
    secondary: &[T],
    key: impl Fn(&T) -> K,
    merge: impl Fn(&T, &T) -> T,
) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
{
    let primary_keys: HashSet<K> = primary.iter().map(&key).collect();

    let mut merged: Vec<T> = primary
        .iter()
        .map(|p| {
            let k = key(p);
            match secondary.iter().find(|s| key(s) == k) {
                Some(s) => merge(p, s),
                None => p.clone(),
            }
        })
        .collect();

    merged.extend(
        secondary
            .iter()
            .filter(|s| !primary_keys.contains(&key(s)))
            .cloned(),
    );
    merged
}

/// Keeps the first entry for each key.
fn first_by_key<T, K>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(key(item)))
        .cloned()
        .collect()
}

fn union_restrictions(
    primary: &[ReportingRestriction],
    secondary: &[ReportingRestriction],
) -> Vec<ReportingRestriction> {
    union_by_key(primary, secondary, |r| r.id, |p, _| p.clone())
}

/// Merges two copies of one offence, `primary` winning every field it sets.
pub fn union_offence(primary: &Offence, secondary: &Offence) -> Offence {
    Offence {
        laa_reference: primary
            .laa_reference
            .clone()
            .or_else(|| secondary.laa_reference.clone()),
        reporting_restrictions: union_restrictions(
            &primary.reporting_restrictions,
            &secondary.reporting_restrictions,
        ),
        ..primary.clone()
    }
}

/// Merges two copies of one defendant, unioning offences by ID.
pub fn union_defendant(primary: &Defendant, secondary: &Defendant) -> Defendant {
    Defendant {
        offences: union_by_key(
            &primary.offences,
            &secondary.offences,
            |o| o.id,
            union_offence,
        ),
        defence_organisation: primary
            .defence_organisation
            .clone()
            .or_else(|| secondary.defence_organisation.clone()),
        ..primary.clone()
    }
}

/// Merges two copies of one case, unioning defendants by ID.
pub fn union_case(primary: &ProsecutionCase, secondary: &ProsecutionCase) -> ProsecutionCase {
    ProsecutionCase {
        defendants: union_by_key(
            &primary.defendants,
            &secondary.defendants,
            |d| d.id,
            union_defendant,
        ),
        ..primary.clone()
    }
}

/// Folds every repeated entry into its first occurrence with `merge`.
fn fold_by_key<T, K>(items: Vec<T>, key: impl Fn(&T) -> K, merge: impl Fn(&T, &T) -> T) -> Vec<T>
where
    K: Eq + Hash,
{
    let mut positions = HashMap::new();
    let mut folded: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&key(&item)) {
            Some(&index) => {
                let merged = merge(&folded[index], &item);
                folded[index] = merged;
            }
            None => {
                positions.insert(key(&item), folded.len());
                folded.push(item);
            }
        }
    }

    folded
}

/// Folds repeated defendants and offences of one case into their first
/// occurrence and keeps the first copy of each reporting restriction.
fn normalise_case(case: ProsecutionCase) -> ProsecutionCase {
    let defendants = fold_by_key(case.defendants, |d| d.id, union_defendant)
        .into_iter()
        .map(|defendant| Defendant {
            offences: fold_by_key(defendant.offences, |o| o.id, union_offence)
                .into_iter()
                .map(|offence| Offence {
                    reporting_restrictions: first_by_key(&offence.reporting_restrictions, |r| r.id),
                    ..offence
                })
                .collect(),
            ..defendant
        })
        .collect();

    ProsecutionCase { defendants, ..case }
}

/// Removes duplicates inside a request.
///
/// Repeated cases fold into their first occurrence, as do repeated
/// defendants within a case and repeated offences within a defendant; the
/// first copy of each reporting restriction wins.
pub fn dedupe_request(cases: &[ProsecutionCase]) -> Vec<ProsecutionCase> {
    collapse_duplicate_cases(cases.to_vec())
}

/// Folds every repeated case into its first occurrence.
pub fn collapse_duplicate_cases(cases: Vec<ProsecutionCase>) -> Vec<ProsecutionCase> {
    fold_by_key(cases, |c| c.id, union_case)
        .into_iter()
        .map(normalise_case)
        .collect()
}

/// Reconciles the cases already on a hearing with the cases in a request.
///
/// Each request case is merged with the first stored copy sharing its ID;
/// request values win on conflict, and stored defendants or offences the
/// request omits are kept. Stored cases the request does not mention follow
/// in their stored order, and any remaining duplicates collapse into one at
/// every level.
pub fn reconcile_cases(
    stored: &[ProsecutionCase],
    request: &[ProsecutionCase],
) -> Vec<ProsecutionCase> {
    let request = dedupe_request(request);
    let mut consumed = vec![false; stored.len()];

    let mut reconciled: Vec<ProsecutionCase> = request
        .iter()
        .map(|requested| {
            match stored.iter().position(|s| s.id == requested.id) {
                Some(index) => {
                    consumed[index] = true;
                    union_case(requested, &stored[index])
                }
                None => requested.clone(),
            }
        })
        .collect();

    reconciled.extend(
        stored
            .iter()
            .zip(&consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(case, _)| case.clone()),
    );

    collapse_duplicate_cases(reconciled)
}

/// Reconciles court applications by ID, request copies winning.
pub fn reconcile_applications(
    stored: &[CourtApplication],
    request: &[CourtApplication],
) -> Vec<CourtApplication> {
    let request = first_by_key(request, |a| a.id);
    let merged = union_by_key(&request, stored, |a| a.id, |p, _| p.clone());
    first_by_key(&merged, |a| a.id)
}

/// Reconciles sittings by start time, request copies winning, in
/// chronological order.
pub fn reconcile_hearing_days(stored: &[HearingDay], request: &[HearingDay]) -> Vec<HearingDay> {
    let request = first_by_key(request, |d| d.sitting_day);
    let mut days = union_by_key(&request, stored, |d| d.sitting_day, |p, _| p.clone());
    days = first_by_key(&days, |d| d.sitting_day);
    days.sort_by_key(|d| d.sitting_day);
    days
}
