//! Group case aggregate: cases managed together under one master.

mod aggregate;
mod commands;
mod events;
mod service;

pub use aggregate::GroupCaseAggregate;
pub use commands::*;
pub use events::{
    CaseAddedToGroupData, CaseRemovedFromGroupData, GroupCaseEvent, GroupCasesRegisteredData,
};
pub use service::GroupCaseService;

use common::CaseId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A case's membership record within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub case_id: CaseId,
    #[serde(default)]
    pub is_civil: bool,
    pub is_group_member: bool,
    pub is_group_master: bool,
}

impl GroupMember {
    /// A non-master member.
    pub fn new(case_id: CaseId) -> Self {
        Self {
            case_id,
            is_civil: false,
            is_group_member: true,
            is_group_master: false,
        }
    }

    pub fn with_master(mut self, is_group_master: bool) -> Self {
        self.is_group_master = is_group_master;
        self
    }

    pub fn civil(mut self) -> Self {
        self.is_civil = true;
        self
    }
}

/// Errors that can occur during group case operations.
#[derive(Debug, Error)]
pub enum GroupCaseError {
    #[error("Group already registered")]
    AlreadyRegistered,

    #[error("Group not registered")]
    NotRegistered,

    /// A non-empty group must have exactly one master.
    #[error("Group must have exactly one master, found {count}")]
    InvalidMasterCount { count: usize },

    #[error("Case {case_id} appears more than once")]
    DuplicateMember { case_id: CaseId },

    /// The master is leaving a group that still has members.
    #[error("Removing master case {case_id} requires a new master")]
    NewMasterRequired { case_id: CaseId },

    #[error("New master candidate {case_id} is not a remaining member")]
    CandidateNotMember { case_id: CaseId },
}
