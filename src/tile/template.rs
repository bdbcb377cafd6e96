use std::fmt;

use crate::error::DescriptorError;

/// Directory suffix appended to the descriptor stem.
const FILES_SUFFIX: &str = "_files";

/// Tile path template derived from a descriptor URL.
///
/// `http://host/deepzoom/abc/slide.dzi` with format `jpeg` becomes
/// `http://host/deepzoom/abc/slide_files/{z}/{x}_{y}.jpeg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePathTemplate {
    /// Descriptor URL with its extension (and any query/fragment) removed
    stem: String,

    /// Tile file extension
    format: String,
}

impl TilePathTemplate {
    /// Build the template from the descriptor URL and the tile format.
    ///
    /// The extension is the text after the last `.` of the final path
    /// segment. A URL whose final segment has no extension (or consists of
    /// the extension alone) is rejected.
    pub fn from_descriptor_url(url: &str, format: &str) -> Result<Self, DescriptorError> {
        let invalid = |reason: &str| DescriptorError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let path_end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
        let path = &url[..path_end];

        let segment_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
        let dot = path[segment_start..]
            .rfind('.')
            .map(|i| segment_start + i)
            .ok_or_else(|| invalid("descriptor URL has no file extension"))?;

        if dot == segment_start {
            return Err(invalid("descriptor file name is empty"));
        }

        Ok(Self {
            stem: path[..dot].to_string(),
            format: format.to_string(),
        })
    }

    /// Substitute a descriptor-level coordinate into the template.
    ///
    /// `level` is a DZI level, already offset from the engine's zoom.
    pub fn expand(&self, level: u32, column: u32, row: u32) -> String {
        format!(
            "{}{}/{}/{}_{}.{}",
            self.stem, FILES_SUFFIX, level, column, row, self.format
        )
    }

    /// Descriptor URL without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl fmt::Display for TilePathTemplate {
    /// The template with `{z}`, `{x}` and `{y}` placeholders.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{{z}}/{{x}}_{{y}}.{}", self.stem, FILES_SUFFIX, self.format)
    }
}
