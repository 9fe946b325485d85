//! Submission coordinator: state + transport + download folder → outcome.

use bufalo_core::{Outcome, UploadState, ValidationError};

use crate::client::Transport;
use crate::download::Downloads;
use crate::error::UploadError;
use crate::reply::ServerReply;

/// Run one submission.
///
/// Validation failures return `Err` and nothing is sent. Otherwise exactly
/// one request is made, the state leaves the submitting phase, and the
/// outcome (including server and transport failures) is returned.
pub fn submit<T: Transport + ?Sized>(
    state: &mut UploadState,
    transport: &T,
    downloads: &Downloads,
) -> Result<Outcome, ValidationError> {
    submit_detailed(state, transport, downloads).map(|(outcome, _)| outcome)
}

/// Like [`submit`], but also hands back the error behind an
/// `Outcome::Failed` so callers can branch on its kind.
pub fn submit_detailed<T: Transport + ?Sized>(
    state: &mut UploadState,
    transport: &T,
    downloads: &Downloads,
) -> Result<(Outcome, Option<UploadError>), ValidationError> {
    let req = state.begin_submit()?;

    let (outcome, cause) = match transport.send(&req).and_then(|reply| deliver(reply, downloads)) {
        Ok(outcome) => (outcome, None),
        Err(e) => {
            log::error!("Submission of {} failed: {}", req.file.name, e);
            (Outcome::failed(e.to_string()), Some(e))
        }
    };

    state.finish(&outcome);
    Ok((outcome, cause))
}

/// Turn a successful reply into an outcome, saving any file it carries.
pub fn deliver(reply: ServerReply, downloads: &Downloads) -> Result<Outcome, UploadError> {
    match reply {
        ServerReply::File { bytes, file_name, message, sheets } => {
            let path = downloads.save(file_name.as_deref(), &bytes)?;
            Ok(Outcome::Downloaded { path, bytes: bytes.len(), message, sheets })
        }
        ServerReply::Preview(table) => Ok(Outcome::PreviewReady { table }),
    }
}
