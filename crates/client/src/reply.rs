//! Classifying what the processing server sent back.
//!
//! Success replies come in three shapes:
//! - JSON with `excel_file` (base64 workbook), optional `excel_data` and `message`
//! - JSON with `data`, an array of row objects to preview
//! - a raw spreadsheet body (`Content-Type` of xlsx/xls/octet-stream)
//!
//! Failures are JSON with an `error` string, or anything else.

use base64::Engine;
use serde_json::Value;

use bufalo_core::{PreviewTable, SheetPreview, XLSX_MIME, XLS_MIME};

use crate::error::{UploadError, GENERIC_SERVER_ERROR};

/// A successful reply, before anything is written to disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    /// A processed workbook to save.
    File {
        bytes: Vec<u8>,
        /// From `Content-Disposition`, when the server sent one
        file_name: Option<String>,
        message: Option<String>,
        sheets: Vec<SheetPreview>,
    },
    /// Rows to show instead of a file.
    Preview(PreviewTable),
}

/// The parts of an HTTP response that decide how it is handled.
#[derive(Debug, Clone, Copy)]
pub struct RawReply<'a> {
    pub status: u16,
    pub content_type: Option<&'a str>,
    pub content_disposition: Option<&'a str>,
    pub body: &'a [u8],
}

impl RawReply<'_> {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Media type without parameters, lowercased.
    fn media_type(&self) -> String {
        self.content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

pub fn classify(raw: RawReply<'_>) -> Result<ServerReply, UploadError> {
    if !raw.is_success() {
        return Err(UploadError::Server {
            status: raw.status,
            message: error_message(raw.body),
        });
    }

    let media_type = raw.media_type();
    if is_json(&media_type) {
        let json: Value = serde_json::from_slice(raw.body)
            .map_err(|e| UploadError::UnexpectedResponse(format!("invalid JSON: {}", e)))?;
        return classify_json(&json);
    }

    if is_spreadsheet_body(&media_type) {
        return Ok(ServerReply::File {
            bytes: raw.body.to_vec(),
            file_name: raw.content_disposition.and_then(disposition_file_name),
            message: None,
            sheets: Vec::new(),
        });
    }

    let shown = if media_type.is_empty() { "none" } else { media_type.as_str() };
    Err(UploadError::UnexpectedResponse(format!("content type {}", shown)))
}

fn classify_json(json: &Value) -> Result<ServerReply, UploadError> {
    if let Some(encoded) = json.get("excel_file").and_then(Value::as_str) {
        let bytes = decode_base64(encoded)?;
        return Ok(ServerReply::File {
            bytes,
            file_name: None,
            message: json.get("message").and_then(Value::as_str).map(String::from),
            sheets: json
                .get("excel_data")
                .map(SheetPreview::from_excel_data)
                .unwrap_or_default(),
        });
    }

    if let Some(records) = json.get("data").and_then(Value::as_array) {
        return Ok(ServerReply::Preview(PreviewTable::from_records(records)));
    }

    // A 2xx carrying an error field is still a failure
    if let Some(msg) = json.get("error").and_then(Value::as_str) {
        return Err(UploadError::Server { status: 200, message: msg.to_string() });
    }

    Err(UploadError::UnexpectedResponse(
        "JSON reply has neither excel_file nor data".into(),
    ))
}

/// Best-effort message from a failed response body.
///
/// Prefers `error`, then a string `detail` (FastAPI's validation shape), then
/// the generic fallback.
pub fn error_message(body: &[u8]) -> String {
    let Ok(json) = serde_json::from_slice::<Value>(body) else {
        return GENERIC_SERVER_ERROR.to_string();
    };
    json.get("error")
        .and_then(Value::as_str)
        .or_else(|| json.get("detail").and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .unwrap_or(GENERIC_SERVER_ERROR)
        .to_string()
}

/// Standard base64, ignoring embedded whitespace and line breaks.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, UploadError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

/// `filename` from a `Content-Disposition` header, reduced to its last path
/// component.
pub fn disposition_file_name(header: &str) -> Option<String> {
    let name = disposition_params(header)
        .into_iter()
        .find_map(|(key, value)| key.eq_ignore_ascii_case("filename").then_some(value))?;

    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(String::from)
}

/// `key=value` parameters after the disposition type. Quoted values may
/// contain `;` and backslash-escaped quotes.
fn disposition_params(header: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut rest = header;

    while let Some((_, after)) = rest.split_once(';') {
        let after = after.trim_start();
        let key_end = after.find(['=', ';']).unwrap_or(after.len());
        let Some(value_part) = after[key_end..].strip_prefix('=') else {
            // Bare token such as `inline`
            rest = &after[key_end..];
            continue;
        };
        let key = after[..key_end].trim().to_string();
        let value_part = value_part.trim_start();

        let (value, next) = match value_part.strip_prefix('"') {
            Some(quoted) => {
                let mut value = String::new();
                let mut end = quoted.len();
                let mut escaped = false;
                for (i, c) in quoted.char_indices() {
                    match c {
                        _ if escaped => {
                            value.push(c);
                            escaped = false;
                        }
                        '\\' => escaped = true,
                        '"' => {
                            end = i + 1;
                            break;
                        }
                        _ => value.push(c),
                    }
                }
                (value, &quoted[end..])
            }
            None => {
                let end = value_part.find(';').unwrap_or(value_part.len());
                (value_part[..end].trim().to_string(), &value_part[end..])
            }
        };

        params.push((key, value));
        rest = next;
    }
    params
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

fn is_spreadsheet_body(media_type: &str) -> bool {
    media_type == XLSX_MIME || media_type == XLS_MIME || media_type == "application/octet-stream"
}
