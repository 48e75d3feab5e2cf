//! URL source handler

use super::MediaSourceHandler;
use crate::{Error, MediaSource, MediaStream, MediaStreamType, Result};
use url::Url;

/// Recognizes URL strings whose stream type can be inferred.
///
/// A MIME hint takes precedence over the path extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlSourceHandler;

impl UrlSourceHandler {
    fn stream_type(src: &MediaSource) -> Option<(&str, MediaStreamType)> {
        match src {
            MediaSource::Url(url) => infer_stream_type(url).map(|t| (url.as_str(), t)),
            MediaSource::TypedUrl { url, mime_type } => MediaStreamType::from_mime(mime_type)
                .or_else(|| infer_stream_type(url))
                .map(|t| (url.as_str(), t)),
            _ => None,
        }
    }
}

impl MediaSourceHandler for UrlSourceHandler {
    fn name(&self) -> &str {
        "url"
    }

    fn can_handle_source(&self, src: &MediaSource) -> bool {
        Self::stream_type(src).is_some()
    }

    fn get_media_stream(&self, src: &MediaSource) -> Result<MediaStream> {
        let (url, stream_type) =
            Self::stream_type(src).ok_or_else(|| Error::NoCompatibleSourceHandler {
                src: src.to_string(),
            })?;
        Ok(MediaStream::new(stream_type, url))
    }
}

/// Infer the stream type from a URL's path extension.
///
/// Relative URLs are accepted; query and fragment are ignored.
pub fn infer_stream_type(src: &str) -> Option<MediaStreamType> {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_string(),
        Err(_) => src.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    MediaStreamType::from_extension(ext)
}
