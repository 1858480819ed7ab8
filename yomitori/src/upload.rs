use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, YomitoriError};

/// Accept a dropped/selected upload: exactly one file whose sniffed content
/// type is `image/*`. Returns the raw bytes for decoding.
pub fn accept_upload<P: AsRef<Path>>(files: &[P]) -> Result<Vec<u8>> {
    let [file] = files else {
        return Err(YomitoriError::Upload(format!(
            "Expected exactly one image file, got {}",
            files.len()
        )));
    };

    let bytes = fs::read(file.as_ref())?;
    match infer::get(&bytes) {
        Some(kind) if kind.mime_type().starts_with("image/") => {
            debug!(mime = kind.mime_type(), "Accepted upload");
            Ok(bytes)
        }
        Some(kind) => Err(YomitoriError::Upload(format!(
            "Unsupported file type: {}",
            kind.mime_type()
        ))),
        None => Err(YomitoriError::Upload(
            "Unrecognized file contents".to_string(),
        )),
    }
}
