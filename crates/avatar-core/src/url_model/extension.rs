//! Image extension safelist.

use serde::Serialize;
use std::fmt;
use url::Url;

use super::path::last_path_segment;

/// File extension of a stored asset. Anything outside the safelist maps to `Jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    #[default]
    Jpg,
    Jpeg,
    Png,
    Svg,
    Gif,
}

impl ImageExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
            ImageExtension::Png => "png",
            ImageExtension::Svg => "svg",
            ImageExtension::Gif => "gif",
        }
    }

    /// Case-insensitive lookup in the safelist.
    pub fn from_safelist(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => Some(ImageExtension::Jpg),
            "jpeg" => Some(ImageExtension::Jpeg),
            "png" => Some(ImageExtension::Png),
            "svg" => Some(ImageExtension::Svg),
            "gif" => Some(ImageExtension::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension for an asset fetched from `url`: the text after the final '.'
/// of the last path segment, lower-cased, if it is on the safelist; `jpg` otherwise.
pub fn extension_for_url(url: &Url) -> ImageExtension {
    last_path_segment(url)
        .and_then(|seg| seg.rsplit_once('.'))
        .and_then(|(_, ext)| ImageExtension::from_safelist(ext))
        .unwrap_or_default()
}
