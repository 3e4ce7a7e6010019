//! Hearing aggregate implementation.

use common::AggregateId;
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{Hearing, HearingError, HearingEvent, HearingExtension};

/// Hearing aggregate root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearingAggregate {
    #[serde(default)]
    version: Version,

    hearing: Option<Hearing>,
}

impl Aggregate for HearingAggregate {
    type Event = HearingEvent;
    type Error = HearingError;

    fn aggregate_type() -> &'static str {
        "Hearing"
    }

    fn id(&self) -> Option<AggregateId> {
        self.hearing.as_ref().map(|h| h.id.into())
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            HearingEvent::HearingInitiated(data) => self.hearing = Some(data.hearing),
            HearingEvent::HearingExtended(data) => {
                if let Some(hearing) = self.hearing.as_ref() {
                    self.hearing = Some(hearing.extended_with(&data.extension));
                }
            }
        }
    }
}

// Query methods
impl HearingAggregate {
    pub fn hearing(&self) -> Option<&Hearing> {
        self.hearing.as_ref()
    }
}

// Command methods - these validate and return events
impl HearingAggregate {
    pub fn initiate(&self, hearing: Hearing) -> Result<Vec<HearingEvent>, HearingError> {
        if self.hearing.is_some() {
            return Err(HearingError::AlreadyInitiated);
        }
        Ok(vec![HearingEvent::initiated(hearing)])
    }

    /// Lists more cases, applications or sittings into the hearing.
    pub fn extend(&self, extension: HearingExtension) -> Result<Vec<HearingEvent>, HearingError> {
        let Some(hearing) = self.hearing.as_ref() else {
            tracing::warn!("extension of unknown hearing ignored");
            return Ok(vec![]);
        };

        if extension.extended_hearing_from == Some(hearing.id) {
            return Err(HearingError::ExtendedFromItself {
                hearing_id: hearing.id,
            });
        }

        if extension.is_empty() {
            tracing::debug!(hearing_id = %hearing.id, "empty extension ignored");
            return Ok(vec![]);
        }

        Ok(vec![HearingEvent::extended(hearing.id, extension)])
    }
}
