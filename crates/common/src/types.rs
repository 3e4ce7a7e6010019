use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Defines a UUID-backed identifier newtype.
///
/// Every identifier gets the same surface: random construction, conversion
/// to and from [`Uuid`], `Display`, and transparent serde.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Defines an identifier that also names an event stream.
macro_rules! stream_id {
    ($(#[$meta:meta])* $name:ident) => {
        uuid_id!($(#[$meta])* $name);

        impl From<$name> for AggregateId {
            fn from(id: $name) -> Self {
                AggregateId(id.0)
            }
        }

        impl From<AggregateId> for $name {
            fn from(id: AggregateId) -> Self {
                Self(id.0)
            }
        }
    };
}

uuid_id!(
    /// Opaque identifier of an event stream.
    ///
    /// Each aggregate instance owns exactly one stream. Domain identifiers
    /// that own a stream convert into this type losslessly.
    AggregateId
);

stream_id!(
    /// Identifier of a prosecution case.
    CaseId
);

stream_id!(
    /// Identifier of a hearing (one or more sittings).
    HearingId
);

stream_id!(
    /// Identifier of a court application.
    ApplicationId
);

stream_id!(
    /// Identifier shared by every case in a group.
    GroupId
);

uuid_id!(
    /// Identifier of a defendant on a prosecution case.
    DefendantId
);

uuid_id!(
    /// Identifier of an offence charged against a defendant.
    OffenceId
);

uuid_id!(
    /// Identifier of a court centre.
    CourtCentreId
);

uuid_id!(
    /// Identifier of an external defence organisation.
    OrganisationId
);

uuid_id!(
    /// Identifier of a reporting restriction.
    ReportingRestrictionId
);

uuid_id!(
    /// Unique identifier of a stored event.
    EventId
);
