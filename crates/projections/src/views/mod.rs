//! Read model views.

pub mod hearings;
pub mod links;

pub use hearings::HearingView;
pub use links::{CaseDefendantHearingLinks, HearingLink};
