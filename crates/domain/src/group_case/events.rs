//! Group case domain events.

use common::GroupId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::GroupMember;

/// Events that can occur on a group case aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GroupCaseEvent {
    /// The group was formed from a set of cases with one master.
    GroupCasesRegistered(GroupCasesRegisteredData),

    /// A case joined the group.
    CaseAddedToGroup(CaseAddedToGroupData),

    /// A case left the group, possibly handing the master role on.
    CaseRemovedFromGroup(CaseRemovedFromGroupData),
}

impl DomainEvent for GroupCaseEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "GroupCasesRegistered",
        "CaseAddedToGroup",
        "CaseRemovedFromGroup",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            GroupCaseEvent::GroupCasesRegistered(_) => "GroupCasesRegistered",
            GroupCaseEvent::CaseAddedToGroup(_) => "CaseAddedToGroup",
            GroupCaseEvent::CaseRemovedFromGroup(_) => "CaseRemovedFromGroup",
        }
    }
}

/// Data for GroupCasesRegistered event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCasesRegisteredData {
    pub group_id: GroupId,
    pub members: Vec<GroupMember>,
}

/// Data for CaseAddedToGroup event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAddedToGroupData {
    pub group_id: GroupId,
    pub member: GroupMember,
}

/// Data for CaseRemovedFromGroup event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRemovedFromGroupData {
    pub group_id: GroupId,
    /// The removed case with both group flags cleared.
    pub removed_case: GroupMember,
    /// The case promoted to master, with both group flags set. None when the
    /// removed case was not the master, or when the group is now empty.
    #[serde(default)]
    pub new_group_master: Option<GroupMember>,
}

// Convenience constructors
impl GroupCaseEvent {
    pub fn registered(group_id: GroupId, members: Vec<GroupMember>) -> Self {
        GroupCaseEvent::GroupCasesRegistered(GroupCasesRegisteredData { group_id, members })
    }

    pub fn case_added(group_id: GroupId, member: GroupMember) -> Self {
        GroupCaseEvent::CaseAddedToGroup(CaseAddedToGroupData { group_id, member })
    }

    pub fn case_removed(
        group_id: GroupId,
        removed_case: GroupMember,
        new_group_master: Option<GroupMember>,
    ) -> Self {
        GroupCaseEvent::CaseRemovedFromGroup(CaseRemovedFromGroupData {
            group_id,
            removed_case,
            new_group_master,
        })
    }
}
