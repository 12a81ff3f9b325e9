//! Portfolio catalog
//!
//! The catalog is a YAML document listing the portfolio projects and the
//! panorama texture sets their tours are built from:
//!
//! ```yaml
//! projects:
//!   - id: gym
//!     path: /gym
//!     title: Gym Facility
//!     texture_set: gym
//!     url: https://images.example.com/gym.jpg
//! texture_sets:
//!   gym:
//!     - texture: /gym/entrance_4k.hdr
//!       label: Entrance
//!       hotspots:
//!         - id: gym-0
//!           position: [12.5, -4.0, 30.2]
//!           title: Gym Entrance
//!           description: Entrance to the gym
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tourfolio_viz::geometry::SPHERE_RADIUS;
use tourfolio_viz::hotspot::inside_sphere;
use tourfolio_viz::tour_types::{GridItemData, HotspotData, PanoramaData, TourData};

/// Directory every panorama texture path is resolved under
pub const TEXTURE_BASE: &str = "/textures";

/// Errors raised while loading or saving a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Parse(String),

    #[error("failed to serialize catalog: {0}")]
    Serialize(String),

    #[error("project '{project}' has no slug in its path '{path}'")]
    EmptySlug { project: String, path: String },

    #[error("more than one project uses the slug '{0}'")]
    DuplicateSlug(String),

    #[error("project '{project}' refers to unknown texture set '{set}'")]
    UnknownTextureSet { project: String, set: String },

    #[error("hotspot '{id}' is {distance:.2} from the center, outside the panorama sphere (radius {radius})")]
    HotspotOutsideSphere { id: String, distance: f32, radius: f32 },

    #[error("hotspot id '{0}' is used more than once")]
    DuplicateHotspot(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Page-level text and the home grid preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Named grid preset ("portfolio", "gallery" or "showcase")
    #[serde(default = "default_grid_preset")]
    pub grid_preset: String,
}

fn default_grid_preset() -> String {
    "portfolio".to_string()
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            tagline: None,
            footer: None,
            grid_preset: default_grid_preset(),
        }
    }
}

/// A portfolio entry shown as a grid tile and as a tour page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    /// Project path, e.g. "/gym"; its last segment is the page slug
    pub path: String,

    pub title: String,

    /// Key into [`Catalog::texture_sets`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_set: Option<String>,

    /// Hover effect of the grid tile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    /// Image shown on the grid tile
    pub url: String,
}

impl Project {
    /// Route slug: the last non-empty segment of `path`
    pub fn slug(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// One panorama of a texture set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    /// Texture path relative to [`TEXTURE_BASE`]
    pub texture: String,

    pub label: String,

    #[serde(default)]
    pub hotspots: Vec<HotspotData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub site: SiteInfo,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub texture_sets: BTreeMap<String, Vec<TextureEntry>>,
}

impl Catalog {
    /// Read and validate a catalog file
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a catalog document
    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let catalog: Catalog =
            serde_yaml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_yaml(&self) -> CatalogResult<String> {
        serde_yaml::to_string(self).map_err(|e| CatalogError::Serialize(e.to_string()))
    }

    /// Write the catalog back to `path`
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check slugs, texture set references and hotspot positions
    pub fn validate(&self) -> CatalogResult<()> {
        let mut slugs = HashSet::new();
        for project in &self.projects {
            let slug = project.slug();
            if slug.is_empty() {
                return Err(CatalogError::EmptySlug {
                    project: project.id.clone(),
                    path: project.path.clone(),
                });
            }
            if !slugs.insert(slug) {
                return Err(CatalogError::DuplicateSlug(slug.to_string()));
            }
            if let Some(set) = &project.texture_set {
                if !self.texture_sets.contains_key(set) {
                    return Err(CatalogError::UnknownTextureSet {
                        project: project.id.clone(),
                        set: set.clone(),
                    });
                }
            }
        }

        let mut hotspot_ids = HashSet::new();
        for hotspot in self.hotspots() {
            if !inside_sphere(hotspot.position) {
                let [x, y, z] = hotspot.position;
                return Err(CatalogError::HotspotOutsideSphere {
                    id: hotspot.id.clone(),
                    distance: (x * x + y * y + z * z).sqrt(),
                    radius: SPHERE_RADIUS,
                });
            }
            if !hotspot_ids.insert(hotspot.id.as_str()) {
                return Err(CatalogError::DuplicateHotspot(hotspot.id.clone()));
            }
        }

        Ok(())
    }

    /// Every hotspot of every texture set, in set order
    pub fn hotspots(&self) -> impl Iterator<Item = &HotspotData> {
        self.texture_sets
            .values()
            .flatten()
            .flat_map(|entry| entry.hotspots.iter())
    }

    pub fn hotspots_mut(&mut self) -> impl Iterator<Item = &mut HotspotData> {
        self.texture_sets
            .values_mut()
            .flatten()
            .flat_map(|entry| entry.hotspots.iter_mut())
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug() == slug)
    }

    /// Viewer payload for the project page at `slug`.
    ///
    /// Unknown slugs and projects without a texture set yield an empty tour.
    pub fn tour(&self, slug: &str) -> TourData {
        let entries = self
            .find_by_slug(slug)
            .and_then(|project| project.texture_set.as_ref())
            .and_then(|set| self.texture_sets.get(set));

        let Some(entries) = entries else {
            tracing::debug!(slug, "no panoramas for slug");
            return TourData::empty(slug);
        };

        TourData {
            slug: slug.to_string(),
            panoramas: entries
                .iter()
                .map(|entry| PanoramaData {
                    texture_url: texture_url(&entry.texture),
                    label: entry.label.clone(),
                    hotspots: entry.hotspots.clone(),
                })
                .collect(),
            format_version: TourData::FORMAT_VERSION.to_string(),
        }
    }

    /// Home page grid tiles, one per project
    pub fn grid_items(&self) -> Vec<GridItemData> {
        self.projects
            .iter()
            .map(|project| GridItemData {
                id: project.id.clone(),
                url: project.url.clone(),
                title: project.title.clone(),
                effect: project.effect.clone(),
                path: project.path.clone(),
            })
            .collect()
    }
}

/// Resolve a texture path under [`TEXTURE_BASE`]; absolute URLs pass through
pub fn texture_url(texture: &str) -> String {
    if texture.starts_with("http://") || texture.starts_with("https://") {
        return texture.to_string();
    }
    format!("{TEXTURE_BASE}/{}", texture.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Catalog {
        Catalog::load(Path::new("tests/fixtures/catalog.yaml")).unwrap()
    }

    fn project(path: &str, set: Option<&str>) -> Project {
        Project {
            id: path.trim_matches('/').to_string(),
            path: path.to_string(),
            title: path.to_string(),
            texture_set: set.map(str::to_string),
            effect: None,
            url: "https://example.com/a.jpg".to_string(),
        }
    }

    fn entry(texture: &str, hotspots: Vec<HotspotData>) -> TextureEntry {
        TextureEntry {
            texture: texture.to_string(),
            label: texture.to_string(),
            hotspots,
        }
    }

    fn hotspot(id: &str, position: [f32; 3]) -> HotspotData {
        HotspotData {
            id: id.to_string(),
            position,
            title: id.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn loads_fixture() {
        let catalog = fixture();
        assert_eq!(catalog.projects.len(), 3);
        assert_eq!(catalog.texture_sets["gym"].len(), 5);
        assert_eq!(catalog.texture_sets["museum"].len(), 1);
        assert_eq!(catalog.hotspots().count(), 11);
    }

    #[test]
    fn slug_is_last_path_segment() {
        assert_eq!(project("/gym", None).slug(), "gym");
        assert_eq!(project("/real-estate/", None).slug(), "real-estate");
        assert_eq!(project("/work/museum", None).slug(), "museum");
        assert_eq!(project("/", None).slug(), "");
    }

    #[test]
    fn tour_prefixes_texture_paths() {
        let tour = fixture().tour("gym");
        assert_eq!(tour.slug, "gym");
        assert_eq!(tour.panoramas.len(), 5);
        assert_eq!(tour.panoramas[0].texture_url, "/textures/gym/gym_entrance_4k.hdr");
        assert_eq!(tour.panoramas[0].label, "Entrance");
        assert_eq!(tour.panoramas[0].hotspots[0].id, "gym-0");
    }

    #[test]
    fn unknown_slug_yields_empty_tour() {
        let tour = fixture().tour("does-not-exist");
        assert_eq!(tour, TourData::empty("does-not-exist"));
    }

    #[test]
    fn project_without_texture_set_yields_empty_tour() {
        let catalog = Catalog {
            projects: vec![project("/studio", None)],
            ..Default::default()
        };
        assert!(catalog.validate().is_ok());
        assert!(catalog.tour("studio").panoramas.is_empty());
    }

    #[test]
    fn grid_items_follow_project_order() {
        let items = fixture().grid_items();
        let paths: Vec<_> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/gym", "/real-estate", "/museum"]);
        assert_eq!(items[1].effect.as_deref(), Some("paper"));
    }

    #[test]
    fn texture_url_joins_once() {
        assert_eq!(texture_url("/museum/hall.hdr"), "/textures/museum/hall.hdr");
        assert_eq!(texture_url("hall.hdr"), "/textures/hall.hdr");
        assert_eq!(
            texture_url("https://cdn.example.com/hall.hdr"),
            "https://cdn.example.com/hall.hdr"
        );
    }

    #[test]
    fn rejects_hotspot_outside_sphere() {
        let mut catalog = Catalog::default();
        catalog.texture_sets.insert(
            "set".to_string(),
            vec![entry("/a.hdr", vec![hotspot("far", [0.0, 0.0, 60.0])])],
        );
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, CatalogError::HotspotOutsideSphere { ref id, .. } if id == "far"));
    }

    #[test]
    fn rejects_duplicate_slug() {
        let catalog = Catalog {
            projects: vec![project("/gym", None), project("/old/gym", None)],
            ..Default::default()
        };
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateSlug(slug)) if slug == "gym"
        ));
    }

    #[test]
    fn rejects_unknown_texture_set() {
        let catalog = Catalog {
            projects: vec![project("/gym", Some("gym"))],
            ..Default::default()
        };
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnknownTextureSet { set, .. }) if set == "gym"
        ));
    }

    #[test]
    fn rejects_duplicate_hotspot_id() {
        let mut catalog = Catalog::default();
        catalog.texture_sets.insert(
            "set".to_string(),
            vec![
                entry("/a.hdr", vec![hotspot("h", [1.0, 0.0, 0.0])]),
                entry("/b.hdr", vec![hotspot("h", [0.0, 1.0, 0.0])]),
            ],
        );
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateHotspot(id)) if id == "h"
        ));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = Catalog::from_yaml_str("projects: [").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn site_info_defaults_when_absent() {
        let catalog = Catalog::from_yaml_str("projects: []").unwrap();
        assert_eq!(catalog.site.title, "Portfolio");
        assert_eq!(catalog.site.grid_preset, "portfolio");
    }

    #[test]
    fn yaml_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        let catalog = fixture();
        catalog.save(&path).unwrap();
        assert_eq!(Catalog::load(&path).unwrap(), catalog);
    }
}
