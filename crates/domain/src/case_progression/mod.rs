//! Case progression aggregate: preparing a case to be sent to the Crown
//! Court and validating its sending sheet.

mod aggregate;
mod commands;
mod events;
pub mod sending_sheet;
mod service;

pub use aggregate::CaseProgressionAggregate;
pub use commands::*;
pub use events::{
    CaseAddedToCrownCourtData, CaseProgressionEvent, DefendantAddedToCaseData,
    DefendantRemovedFromCaseData, SendingSheetCompletedData, SendingSheetInvalidatedData,
    SendingSheetPreviouslyCompletedData,
};
pub use sending_sheet::{
    InvalidationReason, SendingSheet, SendingSheetDefendant, SendingSheetOffence,
};
pub use service::CaseProgressionService;

use common::CaseId;
use thiserror::Error;

/// Errors that can occur during case progression operations.
///
/// A sending sheet that fails its checks is not an error; it is recorded as
/// invalidated.
#[derive(Debug, Error)]
pub enum CaseProgressionError {
    #[error("Command for case {actual} sent to progression of case {expected}")]
    CaseMismatch { expected: CaseId, actual: CaseId },
}
