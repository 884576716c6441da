//! Line index configuration.

/// Height assigned to new lines when no other value is known.
pub const DEFAULT_ESTIMATED_LINE_HEIGHT: f64 = 20.0;

/// Settings fixed when a [`LineIndex`](crate::LineIndex) is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIndexConfig {
    /// Height given to every line created by an edit or a rebuild. Callers that measure lines
    /// overwrite it later, see [`LineIndex::set_line_height`](crate::LineIndex::set_line_height).
    pub estimated_line_height: f64,
}

impl LineIndexConfig {
    /// Configuration with a custom estimated line height.
    pub fn with_estimated_line_height(estimated_line_height: f64) -> Self {
        Self {
            estimated_line_height,
        }
    }
}

impl Default for LineIndexConfig {
    fn default() -> Self {
        Self {
            estimated_line_height: DEFAULT_ESTIMATED_LINE_HEIGHT,
        }
    }
}
