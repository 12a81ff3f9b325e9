//! Hotspot markers for the panorama currently on screen
//!
//! Markers are anchored at fixed positions inside the sphere and re-projected
//! to screen space each frame. The only mutable state is whether a marker's
//! info card is expanded.

use crate::camera::Camera3D;
use crate::geometry::SPHERE_RADIUS;
use crate::tour_types::HotspotData;

#[derive(Debug, Clone)]
pub struct HotspotMarker {
    pub hotspot: HotspotData,
    expanded: bool,
}

impl HotspotMarker {
    pub fn new(hotspot: HotspotData) -> Self {
        Self {
            hotspot,
            expanded: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.hotspot.id
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// Screen placement of one marker for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPlacement {
    pub id: String,
    /// Pixel position, origin top-left
    pub screen: [f32; 2],
    pub expanded: bool,
}

/// Whether `position` lies strictly inside the panorama sphere
pub fn inside_sphere(position: [f32; 3]) -> bool {
    let [x, y, z] = position;
    (x * x + y * y + z * z).sqrt() < SPHERE_RADIUS
}

#[derive(Debug, Clone, Default)]
pub struct HotspotOverlay {
    markers: Vec<HotspotMarker>,
}

impl HotspotOverlay {
    /// Build markers for one panorama. Hotspots outside the sphere are dropped.
    pub fn new(hotspots: &[HotspotData]) -> Self {
        let markers = hotspots
            .iter()
            .filter(|h| {
                let ok = inside_sphere(h.position);
                if !ok {
                    tracing::warn!(id = %h.id, "hotspot outside the panorama sphere, skipped");
                }
                ok
            })
            .cloned()
            .map(HotspotMarker::new)
            .collect();
        Self { markers }
    }

    pub fn markers(&self) -> &[HotspotMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Set the expanded state of one marker (hover/focus in or out).
    /// Returns false when no marker has that id.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        match self.markers.iter_mut().find(|m| m.hotspot.id == id) {
            Some(marker) => {
                marker.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Project every marker; markers behind the camera are omitted
    pub fn layout(&self, camera: &Camera3D, width: f32, height: f32) -> Vec<MarkerPlacement> {
        self.markers
            .iter()
            .filter_map(|marker| {
                let screen = camera.project_to_screen(marker.hotspot.position, width, height)?;
                Some(MarkerPlacement {
                    id: marker.hotspot.id.clone(),
                    screen,
                    expanded: marker.expanded,
                })
            })
            .collect()
    }
}
