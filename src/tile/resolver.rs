use tracing::trace;

use super::coord::TileCoord;
use super::template::TilePathTemplate;
use crate::descriptor::PyramidDescriptor;
use crate::error::{DescriptorError, TileError};

/// Resolves rendering-engine tile coordinates to tile URLs.
///
/// The engine's zoom `z` is shifted by the descriptor's level offset before
/// substitution; column and row are used verbatim since both conventions
/// count them from the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlResolver {
    template: TilePathTemplate,
    level_offset: u32,
}

impl TileUrlResolver {
    pub fn new(template: TilePathTemplate, level_offset: u32) -> Self {
        Self {
            template,
            level_offset,
        }
    }

    /// Build the resolver for a descriptor fetched from `descriptor_url`.
    pub fn for_descriptor(
        descriptor_url: &str,
        descriptor: &PyramidDescriptor,
    ) -> Result<Self, DescriptorError> {
        let template = TilePathTemplate::from_descriptor_url(descriptor_url, &descriptor.format)?;
        Ok(Self::new(template, descriptor.level_offset()))
    }

    /// DZI level serving engine zoom `z`, or `None` past `u32::MAX`.
    pub fn level(&self, z: u32) -> Option<u32> {
        z.checked_add(self.level_offset)
    }

    /// URL of the tile at `coord`.
    ///
    /// Fails with `OutOfRange` when the shifted level does not fit in a `u32`.
    /// Grid bounds are not checked here.
    pub fn resolve(&self, coord: TileCoord) -> Result<String, TileError> {
        let level = self.level(coord.z).ok_or(TileError::OutOfRange { coord })?;
        trace!(z = coord.z, level = level, x = coord.x, y = coord.y, "resolve tile");
        Ok(self.template.expand(level, coord.x, coord.y))
    }

    pub fn template(&self) -> &TilePathTemplate {
        &self.template
    }

    pub fn level_offset(&self) -> u32 {
        self.level_offset
    }
}
