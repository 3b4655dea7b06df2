//! Turns a local image file into the data URL the API stores.

use std::path::Path;

use crate::client::error::{ClientError, ClientResult};
use crate::utils::data_url::encode_data_url;

/// Reads `path` and returns `data:<mime>;base64,<payload>`.
///
/// The mime type is sniffed from the file contents, not the extension.
pub fn encode_photo(path: &Path) -> ClientResult<String> {
    let bytes = std::fs::read(path).map_err(|source| ClientError::Photo {
        path: path.display().to_string(),
        source,
    })?;

    let kind = infer::get(&bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .ok_or_else(|| {
            ClientError::Form(format!(
                "'{}' is not a recognized image file",
                path.display()
            ))
        })?;

    Ok(encode_data_url(kind.mime_type(), &bytes))
}
