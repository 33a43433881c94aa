//! Viewport-width breakpoints that pick the column count.

use super::ColumnCount;

/// Ascending width thresholds in pixels.
///
/// A viewport narrower than `thresholds[i]` (and not narrower than any
/// earlier threshold) gets `i + 1` columns; wider viewports get
/// `thresholds.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBreakpoints {
    thresholds: Vec<u32>,
}

/// Error returned for unsorted or duplicated thresholds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("breakpoints must be strictly ascending (got {0:?})")]
pub struct InvalidBreakpoints(pub Vec<u32>);

impl ColumnBreakpoints {
    /// Smart constructor: thresholds must be strictly ascending.
    pub fn new(thresholds: Vec<u32>) -> Result<Self, InvalidBreakpoints> {
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(InvalidBreakpoints(thresholds));
        }
        Ok(Self { thresholds })
    }

    /// Ascending widths in pixels.
    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    /// Column count for a viewport `width` in pixels.
    pub fn column_count(&self, width: u32) -> ColumnCount {
        let narrower = self
            .thresholds
            .iter()
            .position(|&limit| width < limit)
            .unwrap_or(self.thresholds.len());
        ColumnCount(narrower + 1)
    }
}

impl Default for ColumnBreakpoints {
    fn default() -> Self {
        Self {
            thresholds: vec![640, 768, 1024],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_breakpoints_match_gallery_widths() {
        let bp = ColumnBreakpoints::default();
        assert_eq!(bp.column_count(0).get(), 1);
        assert_eq!(bp.column_count(639).get(), 1);
        assert_eq!(bp.column_count(640).get(), 2);
        assert_eq!(bp.column_count(767).get(), 2);
        assert_eq!(bp.column_count(768).get(), 3);
        assert_eq!(bp.column_count(1023).get(), 3);
        assert_eq!(bp.column_count(1024).get(), 4);
        assert_eq!(bp.column_count(3840).get(), 4);
    }

    #[test]
    fn empty_breakpoints_always_single_column() {
        let bp = ColumnBreakpoints::new(Vec::new()).expect("empty is ascending");
        assert_eq!(bp.column_count(5000).get(), 1);
    }

    #[test]
    fn rejects_unsorted_thresholds() {
        assert_eq!(
            ColumnBreakpoints::new(vec![768, 640]),
            Err(InvalidBreakpoints(vec![768, 640]))
        );
        assert!(ColumnBreakpoints::new(vec![640, 640]).is_err());
    }
}
