//! Hearing commands.

use common::{AggregateId, HearingId};

use crate::command::Command;

use super::{Hearing, HearingAggregate, HearingError, HearingEvent, HearingExtension};

/// Command to initiate a hearing.
#[derive(Debug, Clone)]
pub struct InitiateHearing {
    pub hearing: Hearing,
}

impl InitiateHearing {
    pub fn new(hearing: Hearing) -> Self {
        Self { hearing }
    }
}

impl Command for InitiateHearing {
    type Aggregate = HearingAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.hearing.id.into()
    }

    fn handle(&self, hearing: &HearingAggregate) -> Result<Vec<HearingEvent>, HearingError> {
        hearing.initiate(self.hearing.clone())
    }
}

/// Command to extend a hearing with more cases, applications or sittings.
#[derive(Debug, Clone)]
pub struct ExtendHearing {
    pub hearing_id: HearingId,
    pub extension: HearingExtension,
}

impl ExtendHearing {
    pub fn new(hearing_id: HearingId, extension: HearingExtension) -> Self {
        Self {
            hearing_id,
            extension,
        }
    }
}

impl Command for ExtendHearing {
    type Aggregate = HearingAggregate;

    fn aggregate_id(&self) -> AggregateId {
        self.hearing_id.into()
    }

    fn handle(&self, hearing: &HearingAggregate) -> Result<Vec<HearingEvent>, HearingError> {
        hearing.extend(self.extension.clone())
    }
}
