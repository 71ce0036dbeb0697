//! SharePoint service implementations.

mod files;
mod folders;
mod lists;
mod sites;

pub use files::*;
pub use folders::*;
pub use lists::*;
pub use sites::*;

use crate::errors::{RequestError, SharePointError, SharePointResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in item paths; `/` separates segments and stays literal.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes a drive-relative path, trimming surrounding slashes.
pub(crate) fn encode_path(path: &str) -> String {
    utf8_percent_encode(path.trim_matches('/'), PATH_SEGMENT).to_string()
}

/// `drives/{d}/root:/{path}`, or the drive root when no path is given.
pub(crate) fn item_path(drive_id: &str, path: Option<&str>) -> String {
    match path.map(encode_path).filter(|p| !p.is_empty()) {
        Some(p) => format!("drives/{}/root:/{}", drive_id, p),
        None => format!("drives/{}/root", drive_id),
    }
}

/// Addresses an action or facet below an item, e.g. `children` or `content`.
pub(crate) fn item_action(drive_id: &str, path: Option<&str>, action: &str) -> String {
    match path.map(encode_path).filter(|p| !p.is_empty()) {
        Some(p) => format!("drives/{}/root:/{}:/{}", drive_id, p, action),
        None => format!("drives/{}/root/{}", drive_id, action),
    }
}

/// Rejects empty identifiers before any request is made.
pub(crate) fn require(name: &str, value: &str) -> SharePointResult<()> {
    if value.trim().is_empty() {
        return Err(SharePointError::Request(RequestError::MissingParameter(
            format!("{} is required", name),
        )));
    }
    Ok(())
}
