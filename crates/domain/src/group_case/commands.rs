//! Group case commands.

use common::{AggregateId, CaseId, GroupId};

use crate::command::Command;

use super::{GroupCaseAggregate, GroupCaseError, GroupCaseEvent, GroupMember};

/// Command to form a group from a set of cases.
#[derive(Debug, Clone)]
pub struct RegisterGroupCases {
    pub group_id: GroupId,
    pub members: Vec<GroupMember>,
}

impl RegisterGroupCases {
    pub fn new(group_id: GroupId, members: Vec<GroupMember>) -> Self {
        Self { group_id, members }
    }
}

impl Command for RegisterGroupCases {
    type Aggregate = GroupCaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.group_id.into()
    }

    fn handle(&self, group: &GroupCaseAggregate) -> Result<Vec<GroupCaseEvent>, GroupCaseError> {
        group.register(self.group_id, self.members.clone())
    }
}

/// Command to add a case to a group.
#[derive(Debug, Clone)]
pub struct AddCaseToGroup {
    pub group_id: GroupId,
    pub member: GroupMember,
}

impl AddCaseToGroup {
    pub fn new(group_id: GroupId, member: GroupMember) -> Self {
        Self { group_id, member }
    }
}

impl Command for AddCaseToGroup {
    type Aggregate = GroupCaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.group_id.into()
    }

    fn handle(&self, group: &GroupCaseAggregate) -> Result<Vec<GroupCaseEvent>, GroupCaseError> {
        group.add_case(self.member)
    }
}

/// Command to remove a case from a group.
#[derive(Debug, Clone)]
pub struct RemoveCaseFromGroup {
    pub group_id: GroupId,
    /// The caller's summary of the case being removed.
    pub removed_case: GroupMember,
    /// Required when the removed case is master and others remain.
    pub new_master_candidate: Option<CaseId>,
}

impl RemoveCaseFromGroup {
    pub fn new(group_id: GroupId, removed_case: GroupMember) -> Self {
        Self {
            group_id,
            removed_case,
            new_master_candidate: None,
        }
    }

    pub fn with_new_master(mut self, case_id: CaseId) -> Self {
        self.new_master_candidate = Some(case_id);
        self
    }
}

impl Command for RemoveCaseFromGroup {
    type Aggregate = GroupCaseAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.group_id.into()
    }

    fn handle(&self, group: &GroupCaseAggregate) -> Result<Vec<GroupCaseEvent>, GroupCaseError> {
        group.remove_case(self.removed_case, self.new_master_candidate)
    }
}
