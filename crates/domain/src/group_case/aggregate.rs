//! Group case aggregate implementation.

use common::{AggregateId, CaseId, GroupId};
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{GroupCaseError, GroupCaseEvent, GroupMember, events::CaseRemovedFromGroupData};

/// A set of related cases managed together, exactly one of which is master.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupCaseAggregate {
    group_id: Option<GroupId>,

    #[serde(default)]
    version: Version,

    /// Members in the order they joined.
    members: Vec<GroupMember>,
}

impl Aggregate for GroupCaseAggregate {
    type Event = GroupCaseEvent;
    type Error = GroupCaseError;

    fn aggregate_type() -> &'static str {
        "GroupCase"
    }

    fn id(&self) -> Option<AggregateId> {
        self.group_id.map(Into::into)
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            GroupCaseEvent::GroupCasesRegistered(data) => {
                self.group_id = Some(data.group_id);
                self.members = data.members;
            }
            GroupCaseEvent::CaseAddedToGroup(data) => {
                if !self.is_member(data.member.case_id) {
                    self.members.push(data.member);
                }
            }
            GroupCaseEvent::CaseRemovedFromGroup(data) => self.apply_case_removed(data),
        }
    }
}

// Query methods
impl GroupCaseAggregate {
    pub fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn master(&self) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.is_group_master)
    }

    pub fn is_member(&self, case_id: CaseId) -> bool {
        self.members.iter().any(|m| m.case_id == case_id)
    }
}

// Command methods - these validate and return events
impl GroupCaseAggregate {
    /// Forms the group. A non-empty group needs exactly one master.
    pub fn register(
        &self,
        group_id: GroupId,
        members: Vec<GroupMember>,
    ) -> Result<Vec<GroupCaseEvent>, GroupCaseError> {
        if self.group_id.is_some() {
            return Err(GroupCaseError::AlreadyRegistered);
        }

        for (index, member) in members.iter().enumerate() {
            if members[..index].iter().any(|m| m.case_id == member.case_id) {
                return Err(GroupCaseError::DuplicateMember {
                    case_id: member.case_id,
                });
            }
        }

        let masters = members.iter().filter(|m| m.is_group_master).count();
        if !members.is_empty() && masters != 1 {
            return Err(GroupCaseError::InvalidMasterCount { count: masters });
        }

        let members = members
            .into_iter()
            .map(|m| GroupMember {
                is_group_member: true,
                ..m
            })
            .collect();

        Ok(vec![GroupCaseEvent::registered(group_id, members)])
    }

    /// Adds a case. It becomes master only if the group has no members.
    pub fn add_case(&self, member: GroupMember) -> Result<Vec<GroupCaseEvent>, GroupCaseError> {
        let Some(group_id) = self.group_id else {
            return Err(GroupCaseError::NotRegistered);
        };

        if self.is_member(member.case_id) {
            tracing::debug!(%group_id, case_id = %member.case_id, "case already in group");
            return Ok(vec![]);
        }

        let member = GroupMember {
            is_group_member: true,
            is_group_master: self.members.is_empty(),
            ..member
        };

        Ok(vec![GroupCaseEvent::case_added(group_id, member)])
    }

    /// Removes a case from the group.
    ///
    /// `removed` is the caller's summary of the case; its master flag decides
    /// whether a new master is needed. The candidate is chosen by the caller
    /// and must be one of the remaining members. Once the last member leaves,
    /// no candidate is required.
    pub fn remove_case(
        &self,
        removed: GroupMember,
        new_master_candidate: Option<CaseId>,
    ) -> Result<Vec<GroupCaseEvent>, GroupCaseError> {
        let Some(group_id) = self.group_id else {
            tracing::warn!(case_id = %removed.case_id, "removal from unregistered group ignored");
            return Ok(vec![]);
        };

        if !self.is_member(removed.case_id) {
            tracing::debug!(%group_id, case_id = %removed.case_id, "case not in group");
            return Ok(vec![]);
        }

        let remaining: Vec<&GroupMember> = self
            .members
            .iter()
            .filter(|m| m.case_id != removed.case_id)
            .collect();

        let new_group_master = if removed.is_group_master && !remaining.is_empty() {
            let Some(candidate_id) = new_master_candidate else {
                return Err(GroupCaseError::NewMasterRequired {
                    case_id: removed.case_id,
                });
            };
            let Some(candidate) = remaining.iter().find(|m| m.case_id == candidate_id) else {
                return Err(GroupCaseError::CandidateNotMember {
                    case_id: candidate_id,
                });
            };
            Some(GroupMember {
                is_group_member: true,
                is_group_master: true,
                ..**candidate
            })
        } else {
            None
        };

        let removed_case = GroupMember {
            is_group_member: false,
            is_group_master: false,
            ..removed
        };

        Ok(vec![GroupCaseEvent::case_removed(
            group_id,
            removed_case,
            new_group_master,
        )])
    }
}

// Apply event helpers
impl GroupCaseAggregate {
    fn apply_case_removed(&mut self, data: CaseRemovedFromGroupData) {
        self.members.retain(|m| m.case_id != data.removed_case.case_id);

        if let Some(new_master) = data.new_group_master {
            for member in &mut self.members {
                member.is_group_master = member.case_id == new_master.case_id;
                if member.is_group_master {
                    member.is_group_member = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::reconstitute;

    fn group_of(ids: &[CaseId]) -> GroupCaseAggregate {
        let members = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| GroupMember::new(id).with_master(i == 0))
            .collect();
        let events = GroupCaseAggregate::default()
            .register(GroupId::new(), members)
            .unwrap();
        reconstitute(events)
    }

    #[test]
    fn test_register_requires_exactly_one_master() {
        let members = vec![GroupMember::new(CaseId::new()), GroupMember::new(CaseId::new())];
        let result = GroupCaseAggregate::default().register(GroupId::new(), members);
        assert!(matches!(
            result,
            Err(GroupCaseError::InvalidMasterCount { count: 0 })
        ));

        let members = vec![
            GroupMember::new(CaseId::new()).with_master(true),
            GroupMember::new(CaseId::new()).with_master(true),
        ];
        let result = GroupCaseAggregate::default().register(GroupId::new(), members);
        assert!(matches!(
            result,
            Err(GroupCaseError::InvalidMasterCount { count: 2 })
        ));
    }

    #[test]
    fn test_register_empty_group() {
        let group: GroupCaseAggregate =
            reconstitute(GroupCaseAggregate::default().register(GroupId::new(), vec![]).unwrap());
        assert!(group.members().is_empty());
        assert!(group.master().is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let id = CaseId::new();
        let members = vec![
            GroupMember::new(id).with_master(true),
            GroupMember::new(id),
        ];
        assert!(matches!(
            GroupCaseAggregate::default().register(GroupId::new(), members),
            Err(GroupCaseError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn test_removing_non_member_is_a_no_op() {
        let group = group_of(&[CaseId::new(), CaseId::new()]);
        let events = group
            .remove_case(GroupMember::new(CaseId::new()), None)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_removing_master_requires_candidate() {
        let ids = [CaseId::new(), CaseId::new()];
        let group = group_of(&ids);
        let master = group.master().cloned().unwrap();

        assert!(matches!(
            group.remove_case(master.clone(), None),
            Err(GroupCaseError::NewMasterRequired { .. })
        ));
        assert!(matches!(
            group.remove_case(master.clone(), Some(master.case_id)),
            Err(GroupCaseError::CandidateNotMember { .. })
        ));
        assert!(matches!(
            group.remove_case(master, Some(CaseId::new())),
            Err(GroupCaseError::CandidateNotMember { .. })
        ));
    }

    #[test]
    fn test_removing_last_member_needs_no_candidate() {
        let id = CaseId::new();
        let mut group = group_of(&[id]);
        let master = group.master().cloned().unwrap();

        let events = group.remove_case(master, None).unwrap();
        group.apply_events(events);
        assert!(group.members().is_empty());
    }

    #[test]
    fn test_removed_case_flags_are_cleared() {
        let ids = [CaseId::new(), CaseId::new(), CaseId::new()];
        let group = group_of(&ids);
        let master = group.master().cloned().unwrap();

        let events = group.remove_case(master, Some(ids[2])).unwrap();
        let GroupCaseEvent::CaseRemovedFromGroup(data) = &events[0] else {
            panic!("expected CaseRemovedFromGroup");
        };
        assert!(!data.removed_case.is_group_member);
        assert!(!data.removed_case.is_group_master);
        let new_master = data.new_group_master.as_ref().unwrap();
        assert_eq!(new_master.case_id, ids[2]);
        assert!(new_master.is_group_member && new_master.is_group_master);
    }

    #[test]
    fn test_removing_non_master_keeps_master() {
        let ids = [CaseId::new(), CaseId::new(), CaseId::new()];
        let mut group = group_of(&ids);

        let events = group
            .remove_case(GroupMember::new(ids[1]), Some(ids[2]))
            .unwrap();
        group.apply_events(events);

        assert_eq!(group.members().len(), 2);
        assert_eq!(group.master().unwrap().case_id, ids[0]);
    }

    #[test]
    fn test_add_case_joins_as_member() {
        let ids = [CaseId::new()];
        let mut group = group_of(&ids);
        let joining = CaseId::new();

        let events = group
            .add_case(GroupMember::new(joining).with_master(true))
            .unwrap();
        group.apply_events(events);

        assert!(group.is_member(joining));
        assert_eq!(group.master().unwrap().case_id, ids[0]);
        assert!(group.add_case(GroupMember::new(joining)).unwrap().is_empty());
    }
}
