//! Home page grid scene
//!
//! Holds one tile per grid item: its layout position, hover controller and
//! its own effect material. Pointer events are hit-tested against the tiles'
//! projected rectangles.

use crate::camera::Camera3D;
use crate::effects::{EffectKind, EffectMaterial};
use crate::grid::{self, GridPreset, ViewportClass};
use crate::hover::{CursorStyle, HoverController, selection_path};
use crate::tour_types::GridItemData;

/// Extra world-space margin kept around the grid when framing it
const FRAME_PADDING: f32 = 0.5;

/// Title anchor relative to a tile's center, in multiples of the tile size
pub const LABEL_OFFSET: [f32; 2] = [-0.4, -0.2];

#[derive(Debug)]
pub struct GridTile {
    pub item: GridItemData,
    pub position: [f32; 3],
    pub hover: HoverController,
    pub material: EffectMaterial,
}

impl GridTile {
    fn new(item: GridItemData, position: [f32; 3]) -> Self {
        let kind = EffectKind::from_selector(item.effect.as_deref());
        let material = EffectMaterial::new(kind, item.url.clone());
        Self {
            item,
            position,
            hover: HoverController::new(),
            material,
        }
    }
}

#[derive(Debug)]
pub struct PortfolioScene {
    preset: GridPreset,
    viewport: ViewportClass,
    tiles: Vec<GridTile>,
    camera: Camera3D,
    width: f32,
    height: f32,
    hovered: Option<usize>,
    elapsed_secs: f32,
}

impl PortfolioScene {
    pub fn new(items: Vec<GridItemData>, preset: GridPreset, width: f32, height: f32) -> Self {
        let viewport = ViewportClass::from_width(width);
        let positions = preset.layout(items.len(), viewport);
        let tiles = items
            .into_iter()
            .zip(positions)
            .map(|(item, position)| GridTile::new(item, position))
            .collect();

        let mut scene = Self {
            preset,
            viewport,
            tiles,
            camera: Camera3D::framing(aspect(width, height)),
            width,
            height,
            hovered: None,
            elapsed_secs: 0.0,
        };
        scene.frame_camera();
        scene
    }

    pub fn tiles(&self) -> &[GridTile] {
        &self.tiles
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn preset(&self) -> &GridPreset {
        &self.preset
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Handle a canvas resize; re-lays the tiles when the viewport class changes
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.camera.resize(width, height);

        let viewport = ViewportClass::from_width(width);
        if viewport != self.viewport {
            tracing::debug!(?viewport, "viewport class changed");
            self.viewport = viewport;
            let positions = self.preset.layout(self.tiles.len(), viewport);
            for (tile, position) in self.tiles.iter_mut().zip(positions) {
                tile.position = position;
            }
        }
        self.frame_camera();
    }

    fn frame_camera(&mut self) {
        let [w, h] = grid::extent(self.tiles.len(), &self.preset, self.viewport);
        if w > 0.0 && h > 0.0 {
            self.camera.frame_rect(w, h, FRAME_PADDING);
        }
    }

    /// World-space point the title of tile `index` is pinned to
    pub fn label_anchor(&self, index: usize) -> Option<[f32; 3]> {
        let [cx, cy, cz] = self.tiles.get(index)?.position;
        let [w, h] = self.preset.item_size;
        Some([cx + LABEL_OFFSET[0] * w, cy + LABEL_OFFSET[1] * h, cz])
    }

    /// Screen position of every tile title, `None` when it falls behind the camera
    pub fn label_positions(&self) -> Vec<Option<[f32; 2]>> {
        (0..self.tiles.len())
            .map(|index| {
                self.label_anchor(index).and_then(|anchor| {
                    self.camera.project_to_screen(anchor, self.width, self.height)
                })
            })
            .collect()
    }

    /// Index of the tile under pixel `(x, y)`
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        let [half_w, half_h] = [
            self.preset.item_size[0] / 2.0,
            self.preset.item_size[1] / 2.0,
        ];
        self.tiles.iter().position(|tile| {
            let [cx, cy, cz] = tile.position;
            let top_left = self
                .camera
                .project_to_screen([cx - half_w, cy + half_h, cz], self.width, self.height);
            let bottom_right = self
                .camera
                .project_to_screen([cx + half_w, cy - half_h, cz], self.width, self.height);
            match (top_left, bottom_right) {
                (Some([x0, y0]), Some([x1, y1])) => x >= x0 && x <= x1 && y >= y0 && y <= y1,
                _ => false,
            }
        })
    }

    /// Route a pointer move. Returns the new cursor style when it changes.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<CursorStyle> {
        let hit = self.hit_test(x, y);
        let mut cursor = None;

        if hit != self.hovered {
            if let Some(previous) = self.hovered {
                cursor = Some(self.tiles[previous].hover.pointer_leave());
            }
            if let Some(index) = hit {
                cursor = Some(self.tiles[index].hover.pointer_enter());
            }
            self.hovered = hit;
        }

        if let Some(index) = hit {
            let tile = &mut self.tiles[index];
            tile.hover.pointer_move(x - self.width / 2.0, self.height / 2.0 - y);
        }
        cursor
    }

    pub fn pointer_leave(&mut self) -> Option<CursorStyle> {
        let index = self.hovered.take()?;
        Some(self.tiles[index].hover.pointer_leave())
    }

    /// Navigation path of the hovered tile, if any
    pub fn click(&self) -> Option<String> {
        let tile = &self.tiles[self.hovered?];
        Some(selection_path(&tile.item.path))
    }

    /// Advance hover smoothing and write every tile's uniforms for this frame
    pub fn frame(&mut self, dt_ms: f32) {
        let dt_secs = dt_ms.max(0.0) / 1000.0;
        self.elapsed_secs += dt_secs;
        for tile in &mut self.tiles {
            tile.hover.tick(dt_secs);
            tile.hover.apply(&mut tile.material, self.elapsed_secs);
        }
    }
}

fn aspect(width: f32, height: f32) -> f32 {
    if height > 0.0 { width / height } else { 1.0 }
}
