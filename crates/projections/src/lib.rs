//! Read models fed from the case progression event log.
//!
//! - [`Projection`] and [`ReadModel`] traits for query-side views
//! - [`ProjectionProcessor`] for catch-up, single event delivery and rebuild
//! - [`HearingView`]: reconciled hearing records and the case defendant to
//!   hearing link table

pub mod error;
pub mod processor;
pub mod projection;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition, ReadModel};
pub use views::{CaseDefendantHearingLinks, HearingLink, HearingView};
