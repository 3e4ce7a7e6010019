//! Link table between case defendants and the hearings they are listed in.

use std::collections::BTreeSet;

use common::{CaseId, DefendantId, HearingId};
use domain::ProsecutionCase;

use crate::{ProjectionError, Result};

/// One row of the link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HearingLink {
    pub case_id: CaseId,
    pub defendant_id: DefendantId,
    pub hearing_id: HearingId,
}

impl HearingLink {
    pub fn new(case_id: CaseId, defendant_id: DefendantId, hearing_id: HearingId) -> Self {
        Self {
            case_id,
            defendant_id,
            hearing_id,
        }
    }
}

/// Rows associating each case defendant with a hearing.
///
/// A row pointing at a hearing that was only partly allocated doubles as the
/// "unallocated hearing" bookkeeping for that defendant.
#[derive(Debug, Clone, Default)]
pub struct CaseDefendantHearingLinks {
    rows: BTreeSet<HearingLink>,
}

impl CaseDefendantHearingLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row. Returns false if it was already present.
    pub fn insert(&mut self, link: HearingLink) -> bool {
        self.rows.insert(link)
    }

    /// Links every defendant of every case to `hearing_id`.
    pub fn link_cases(&mut self, hearing_id: HearingId, cases: &[ProsecutionCase]) {
        for case in cases {
            for defendant in &case.defendants {
                self.insert(HearingLink::new(case.id, defendant.id, hearing_id));
            }
        }
    }

    /// Removes a row, failing if it does not exist.
    pub fn remove(&mut self, link: HearingLink) -> Result<()> {
        if self.rows.remove(&link) {
            Ok(())
        } else {
            Err(ProjectionError::LinkNotFound {
                case_id: link.case_id,
                defendant_id: link.defendant_id,
                hearing_id: link.hearing_id,
            })
        }
    }

    pub fn contains(&self, link: &HearingLink) -> bool {
        self.rows.contains(link)
    }

    /// Hearings a defendant on a case is listed in, in ID order.
    pub fn hearings_for(&self, case_id: CaseId, defendant_id: DefendantId) -> Vec<HearingId> {
        self.rows
            .iter()
            .filter(|l| l.case_id == case_id && l.defendant_id == defendant_id)
            .map(|l| l.hearing_id)
            .collect()
    }

    /// Rows pointing at `hearing_id`.
    pub fn for_hearing(&self, hearing_id: HearingId) -> Vec<HearingLink> {
        self.rows
            .iter()
            .filter(|l| l.hearing_id == hearing_id)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use domain::Defendant;

    use super::*;

    #[test]
    fn test_remove_missing_row_reports_link_not_found() {
        let mut links = CaseDefendantHearingLinks::new();
        let link = HearingLink::new(CaseId::new(), DefendantId::new(), HearingId::new());

        assert!(matches!(
            links.remove(link),
            Err(ProjectionError::LinkNotFound { .. })
        ));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut links = CaseDefendantHearingLinks::new();
        let link = HearingLink::new(CaseId::new(), DefendantId::new(), HearingId::new());

        assert!(links.insert(link));
        assert!(!links.insert(link));
        assert_eq!(links.len(), 1);
        links.remove(link).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_link_cases_covers_every_defendant() {
        let mut links = CaseDefendantHearingLinks::new();
        let hearing_id = HearingId::new();
        let case_id = CaseId::new();
        let (first, second) = (DefendantId::new(), DefendantId::new());
        let case = ProsecutionCase::new(case_id, "URN")
            .with_defendant(Defendant::new(first, "A"))
            .with_defendant(Defendant::new(second, "B"));

        links.link_cases(hearing_id, &[case]);

        assert_eq!(links.for_hearing(hearing_id).len(), 2);
        assert_eq!(links.hearings_for(case_id, second), vec![hearing_id]);
    }
}
