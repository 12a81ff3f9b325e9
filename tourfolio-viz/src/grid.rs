//! Grid layout for the home page tiles
//!
//! [`layout`] is a pure function of its inputs. The viewport class is passed
//! in by the caller, which owns the resize observer.

/// Widths at or below this many logical pixels use the single-column layout
pub const MOBILE_BREAKPOINT: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportClass {
    Mobile,
    #[default]
    Desktop,
}

impl ViewportClass {
    pub fn from_width(width: f32) -> Self {
        if width <= MOBILE_BREAKPOINT {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }
}

/// Named grid configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPreset {
    pub columns: usize,
    pub spacing: f32,
    /// Tile width and height in world units
    pub item_size: [f32; 2],
}

impl GridPreset {
    pub const PORTFOLIO: GridPreset = GridPreset {
        columns: 3,
        spacing: 2.5,
        item_size: [2.0, 2.0],
    };

    pub const GALLERY: GridPreset = GridPreset {
        columns: 4,
        spacing: 2.0,
        item_size: [1.5, 1.5],
    };

    pub const SHOWCASE: GridPreset = GridPreset {
        columns: 2,
        spacing: 3.0,
        item_size: [2.5, 2.5],
    };

    /// Look up a preset by name. Unknown names fall back to `portfolio`.
    pub fn named(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gallery" => Self::GALLERY,
            "showcase" => Self::SHOWCASE,
            "portfolio" => Self::PORTFOLIO,
            other => {
                tracing::warn!(preset = other, "unknown grid preset, using portfolio");
                Self::PORTFOLIO
            }
        }
    }

    pub fn layout(&self, count: usize, viewport: ViewportClass) -> Vec<[f32; 3]> {
        layout(count, self.columns, self.spacing, viewport)
    }
}

impl Default for GridPreset {
    fn default() -> Self {
        Self::PORTFOLIO
    }
}

/// Place `count` items on a grid centered at the origin.
///
/// Positions are returned in input order, row-major, rows proceeding downward.
/// On [`ViewportClass::Mobile`] every item gets its own row.
///
/// # Example
///
/// ```
/// use tourfolio_viz::grid::{layout, ViewportClass};
///
/// let positions = layout(2, 2, 2.0, ViewportClass::Desktop);
/// assert_eq!(positions, vec![[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
/// ```
pub fn layout(count: usize, columns: usize, spacing: f32, viewport: ViewportClass) -> Vec<[f32; 3]> {
    let columns = match viewport {
        ViewportClass::Mobile => 1,
        ViewportClass::Desktop => columns.max(1),
    };
    let rows = count.div_ceil(columns);

    let start_x = -((columns - 1) as f32) * spacing / 2.0;
    let start_y = rows.saturating_sub(1) as f32 * spacing / 2.0;

    (0..count)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            [
                start_x + col as f32 * spacing,
                start_y - row as f32 * spacing,
                0.0,
            ]
        })
        .collect()
}

/// Width and height covered by the tile centers plus one tile
pub fn extent(count: usize, preset: &GridPreset, viewport: ViewportClass) -> [f32; 2] {
    if count == 0 {
        return [0.0, 0.0];
    }
    let columns = match viewport {
        ViewportClass::Mobile => 1,
        ViewportClass::Desktop => preset.columns.max(1),
    };
    let rows = count.div_ceil(columns);
    let used_columns = columns.min(count);
    [
        (used_columns - 1) as f32 * preset.spacing + preset.item_size[0],
        (rows - 1) as f32 * preset.spacing + preset.item_size[1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(positions: &[[f32; 3]]) -> [f32; 3] {
        let n = positions.len() as f32;
        let sum = positions.iter().fold([0.0f32; 3], |acc, p| {
            [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
        });
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    #[test]
    fn produces_one_position_per_item() {
        for count in 0..20 {
            for columns in 1..6 {
                for viewport in [ViewportClass::Mobile, ViewportClass::Desktop] {
                    assert_eq!(layout(count, columns, 2.5, viewport).len(), count);
                }
            }
        }
    }

    #[test]
    fn full_rows_are_centered_on_origin() {
        for columns in 1..6 {
            for rows in 1..5 {
                let positions = layout(columns * rows, columns, 2.5, ViewportClass::Desktop);
                let [x, y, z] = centroid(&positions);
                assert!(x.abs() < 1e-4, "x centroid {x} for {columns}x{rows}");
                assert!(y.abs() < 1e-4, "y centroid {y} for {columns}x{rows}");
                assert_eq!(z, 0.0);
            }
        }
    }

    #[test]
    fn mobile_column_is_centered_on_origin() {
        for count in 1..12 {
            let positions = layout(count, 3, 2.0, ViewportClass::Mobile);
            let [x, y, _] = centroid(&positions);
            assert!(x.abs() < 1e-4);
            assert!(y.abs() < 1e-4);
        }
    }

    #[test]
    fn mobile_stacks_single_column() {
        let positions = layout(3, 3, 2.0, ViewportClass::Mobile);
        assert_eq!(
            positions,
            vec![[0.0, 2.0, 0.0], [0.0, 0.0, 0.0], [0.0, -2.0, 0.0]]
        );
    }

    #[test]
    fn rows_proceed_downward() {
        let positions = layout(6, 3, 2.5, ViewportClass::Desktop);
        assert_eq!(positions[0], [-2.5, 1.25, 0.0]);
        assert_eq!(positions[2], [2.5, 1.25, 0.0]);
        assert_eq!(positions[3], [-2.5, -1.25, 0.0]);
    }

    #[test]
    fn partial_row_is_left_aligned() {
        let positions = layout(4, 3, 2.0, ViewportClass::Desktop);
        assert_eq!(positions[3], [-2.0, -1.0, 0.0]);
    }

    #[test]
    fn zero_columns_behaves_as_one() {
        assert_eq!(
            layout(2, 0, 1.0, ViewportClass::Desktop),
            layout(2, 1, 1.0, ViewportClass::Desktop)
        );
    }

    #[test]
    fn viewport_class_breakpoint_is_inclusive() {
        assert_eq!(ViewportClass::from_width(768.0), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(769.0), ViewportClass::Desktop);
    }

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(GridPreset::named("gallery"), GridPreset::GALLERY);
        assert_eq!(GridPreset::named("Showcase"), GridPreset::SHOWCASE);
        assert_eq!(GridPreset::named("unknown"), GridPreset::PORTFOLIO);
    }

    #[test]
    fn extent_covers_tiles() {
        let preset = GridPreset::PORTFOLIO;
        assert_eq!(extent(3, &preset, ViewportClass::Desktop), [7.0, 2.0]);
        assert_eq!(extent(3, &preset, ViewportClass::Mobile), [2.0, 7.0]);
        assert_eq!(extent(0, &preset, ViewportClass::Desktop), [0.0, 0.0]);
    }
}
