//! Tour data types for the viewer and the grid
//!
//! The `tourfolio` site writer embeds these as JSON in the generated pages and
//! the wasm bindings read them back.

use serde::{Deserialize, Serialize};

/// A point of interest inside a panorama
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotData {
    /// Stable identifier (e.g., "gym-0")
    pub id: String,

    /// Fixed position inside the panorama sphere
    pub position: [f32; 3],

    /// Card heading
    pub title: String,

    /// Card body text
    pub description: String,
}

/// One panorama of a tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanoramaData {
    /// Resolved texture URL (already prefixed with the texture base directory)
    pub texture_url: String,

    /// Label shown between the Prev/Next buttons
    pub label: String,

    /// Hotspots attached to this panorama
    #[serde(default)]
    pub hotspots: Vec<HotspotData>,
}

/// Everything the viewer needs for one project page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourData {
    /// Route slug of the project ("gym" for `/projects/gym`)
    pub slug: String,

    /// Panoramas in display order (empty for unknown projects)
    #[serde(default)]
    pub panoramas: Vec<PanoramaData>,

    /// Version of the payload format
    pub format_version: String,
}

impl TourData {
    /// Format version constant
    pub const FORMAT_VERSION: &'static str = "1.0";

    /// Tour with no panoramas, used when a slug matches no project
    pub fn empty(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            panoramas: Vec::new(),
            format_version: Self::FORMAT_VERSION.to_string(),
        }
    }
}

/// One tile of the home page grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridItemData {
    pub id: String,

    /// Image URL sampled by the tile's shader
    pub url: String,

    pub title: String,

    /// Effect selector ("particles", "paper", "combined"); absent means particles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    /// Project path, e.g. "/gym"
    pub path: String,
}
