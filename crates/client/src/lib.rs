//! Upload client, shared by the CLI and anything else that drives a submission.
//!
//! This crate is the single source of truth for the processing server's wire
//! contract: the multipart request, the reply shapes, and what happens to a
//! processed file once it arrives.
//!
//! No GUI concepts. No retries. No progress bars.

mod client;
mod coordinator;
mod download;
mod error;
mod reply;

pub use client::{Transport, UploadClient};
pub use coordinator::{deliver, submit, submit_detailed};
pub use download::Downloads;
pub use error::{UploadError, GENERIC_SERVER_ERROR};
pub use reply::{classify, decode_base64, disposition_file_name, error_message, RawReply, ServerReply};
