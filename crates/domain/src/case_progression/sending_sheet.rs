//! Sending sheets and the checks a sheet must pass before a case is sent to
//! the Crown Court.

use std::collections::{BTreeMap, BTreeSet};

use common::{CaseId, CourtCentreId, DefendantId, OffenceId};
use serde::{Deserialize, Serialize};

/// A sending sheet submitted for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendingSheet {
    pub case_id: CaseId,
    pub defendants: Vec<SendingSheetDefendant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendingSheetDefendant {
    pub defendant_id: DefendantId,
    pub offences: Vec<SendingSheetOffence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendingSheetOffence {
    pub offence_id: OffenceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicated_plea: Option<String>,
}

impl SendingSheet {
    pub fn new(case_id: CaseId) -> Self {
        Self {
            case_id,
            defendants: Vec::new(),
        }
    }

    pub fn with_defendant(mut self, defendant_id: DefendantId, offence_ids: &[OffenceId]) -> Self {
        self.defendants.push(SendingSheetDefendant {
            defendant_id,
            offences: offence_ids
                .iter()
                .map(|&offence_id| SendingSheetOffence {
                    offence_id,
                    indicated_plea: None,
                })
                .collect(),
        });
        self
    }
}

/// Why a sending sheet was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidationReason {
    /// The case has not been added to a Crown Court centre.
    MissingCourtCentre,
    /// The case has no known defendants.
    NoKnownDefendants,
    UnknownDefendant { defendant_id: DefendantId },
    UnknownOffence {
        defendant_id: DefendantId,
        offence_id: OffenceId,
    },
}

impl InvalidationReason {
    /// Human-readable description naming the case.
    pub fn describe(&self, case_id: CaseId) -> String {
        match self {
            InvalidationReason::MissingCourtCentre => {
                format!("Case {case_id} has no court centre")
            }
            InvalidationReason::NoKnownDefendants => {
                format!("Case {case_id} has no defendants")
            }
            InvalidationReason::UnknownDefendant { defendant_id } => {
                format!("Defendant {defendant_id} is not on case {case_id}")
            }
            InvalidationReason::UnknownOffence {
                defendant_id,
                offence_id,
            } => format!(
                "Offence {offence_id} is not charged against defendant {defendant_id} on case {case_id}"
            ),
        }
    }
}

/// What the aggregate knows about a case when a sheet is checked.
#[derive(Debug, Clone, Copy)]
pub struct KnownCase<'a> {
    pub court_centre_id: Option<CourtCentreId>,
    pub offences_by_defendant: &'a BTreeMap<DefendantId, BTreeSet<OffenceId>>,
}

/// Checks a sheet against the known case, stopping at the first failure.
///
/// Checks run in order: court centre present, at least one known
/// defendant, every sheet defendant known, every sheet offence known for
/// its defendant.
pub fn check(sheet: &SendingSheet, known: KnownCase<'_>) -> Result<(), InvalidationReason> {
    if known.court_centre_id.is_none() {
        return Err(InvalidationReason::MissingCourtCentre);
    }

    if known.offences_by_defendant.is_empty() {
        return Err(InvalidationReason::NoKnownDefendants);
    }

    if let Some(unknown) = sheet
        .defendants
        .iter()
        .find(|d| !known.offences_by_defendant.contains_key(&d.defendant_id))
    {
        return Err(InvalidationReason::UnknownDefendant {
            defendant_id: unknown.defendant_id,
        });
    }

    check_offences(sheet, known)
}

fn check_offences(sheet: &SendingSheet, known: KnownCase<'_>) -> Result<(), InvalidationReason> {
    for defendant in &sheet.defendants {
        let charged = known.offences_by_defendant.get(&defendant.defendant_id);
        for offence in &defendant.offences {
            if !charged.is_some_and(|ids| ids.contains(&offence.offence_id)) {
                return Err(InvalidationReason::UnknownOffence {
                    defendant_id: defendant.defendant_id,
                    offence_id: offence.offence_id,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(
        court_centre_id: Option<CourtCentreId>,
        offences: &BTreeMap<DefendantId, BTreeSet<OffenceId>>,
    ) -> KnownCase<'_> {
        KnownCase {
            court_centre_id,
            offences_by_defendant: offences,
        }
    }

    #[test]
    fn test_checks_run_in_order() {
        let case_id = CaseId::new();
        let defendant_id = DefendantId::new();
        let sheet = SendingSheet::new(case_id).with_defendant(DefendantId::new(), &[]);
        let empty = BTreeMap::new();

        assert_eq!(
            check(&sheet, known(None, &empty)),
            Err(InvalidationReason::MissingCourtCentre)
        );
        assert_eq!(
            check(&sheet, known(Some(CourtCentreId::new()), &empty)),
            Err(InvalidationReason::NoKnownDefendants)
        );

        let offences = BTreeMap::from([(defendant_id, BTreeSet::new())]);
        assert!(matches!(
            check(&sheet, known(Some(CourtCentreId::new()), &offences)),
            Err(InvalidationReason::UnknownDefendant { .. })
        ));
    }

    #[test]
    fn test_unknown_offence_is_reported() {
        let defendant_id = DefendantId::new();
        let charged = OffenceId::new();
        let stray = OffenceId::new();
        let offences = BTreeMap::from([(defendant_id, BTreeSet::from([charged]))]);
        let sheet =
            SendingSheet::new(CaseId::new()).with_defendant(defendant_id, &[charged, stray]);

        assert_eq!(
            check(&sheet, known(Some(CourtCentreId::new()), &offences)),
            Err(InvalidationReason::UnknownOffence {
                defendant_id,
                offence_id: stray
            })
        );
    }

    #[test]
    fn test_description_names_the_case() {
        let case_id = CaseId::new();
        let description = InvalidationReason::NoKnownDefendants.describe(case_id);
        assert!(description.contains(&case_id.to_string()));
    }
}
