//! Site Writer
//!
//! Renders the home grid page and one tour page per project. Viewer payloads
//! are embedded as JSON script blocks and read by the wasm bindings.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, Project};

/// Errors that can occur while writing the site
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("viz package directory not found: {0}")]
    MissingPackage(PathBuf),
}

pub type SiteResult<T> = Result<T, SiteError>;

#[derive(Template)]
#[template(path = "index.html")]
struct HomeTemplate<'a> {
    title: &'a str,
    tagline: Option<&'a str>,
    footer: Option<&'a str>,
    preset: &'a str,
    projects: &'a [Project],
    items_json: String,
}

#[derive(Template)]
#[template(path = "project.html")]
struct ProjectTemplate<'a> {
    site_title: &'a str,
    heading: String,
    project_title: Option<&'a str>,
    first_label: Option<&'a str>,
    can_navigate: bool,
    has_panoramas: bool,
    tour_json: String,
}

/// Serialize `value` for a `<script type="application/json">` block
pub fn embed_json<T: Serialize>(value: &T) -> SiteResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Render the home page
pub fn render_home(catalog: &Catalog) -> SiteResult<String> {
    let template = HomeTemplate {
        title: &catalog.site.title,
        tagline: catalog.site.tagline.as_deref(),
        footer: catalog.site.footer.as_deref(),
        preset: &catalog.site.grid_preset,
        projects: &catalog.projects,
        items_json: embed_json(&catalog.grid_items())?,
    };
    template.render().map_err(|e| SiteError::Render(e.to_string()))
}

/// Render the tour page for `slug`.
///
/// A slug matching no project renders a page with an empty tour and disabled
/// navigation.
pub fn render_project(catalog: &Catalog, slug: &str) -> SiteResult<String> {
    let tour = catalog.tour(slug);
    let template = ProjectTemplate {
        site_title: &catalog.site.title,
        heading: slug.to_uppercase(),
        project_title: catalog.find_by_slug(slug).map(|p| p.title.as_str()),
        first_label: tour.panoramas.first().map(|p| p.label.as_str()),
        can_navigate: tour.panoramas.len() >= 2,
        has_panoramas: !tour.panoramas.is_empty(),
        tour_json: embed_json(&tour)?,
    };
    template.render().map_err(|e| SiteError::Render(e.to_string()))
}

/// Writes a catalog as a static site
#[derive(Debug, Clone, Default)]
pub struct SiteWriter {
    viz_pkg: Option<PathBuf>,
}

impl SiteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the built wasm package from `dir` into `<output>/pkg`
    pub fn with_viz_pkg(mut self, dir: Option<PathBuf>) -> Self {
        self.viz_pkg = dir;
        self
    }

    pub fn write(&self, catalog: &Catalog, output: &Path) -> SiteResult<()> {
        fs::create_dir_all(output)?;
        fs::write(output.join("index.html"), render_home(catalog)?)?;

        for project in &catalog.projects {
            let dir = output.join("projects").join(project.slug());
            fs::create_dir_all(&dir)?;
            fs::write(dir.join("index.html"), render_project(catalog, project.slug())?)?;
        }

        if let Some(pkg) = &self.viz_pkg {
            if !pkg.is_dir() {
                return Err(SiteError::MissingPackage(pkg.clone()));
            }
            let copied = copy_dir(pkg, &output.join("pkg"))?;
            tracing::debug!(files = copied, "copied viz package");
        }

        tracing::info!(
            projects = catalog.projects.len(),
            output = %output.display(),
            "site written"
        );
        Ok(())
    }
}

fn copy_dir(from: &Path, to: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(to)?;
    let mut copied = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tourfolio_viz::tour_types::TourData;

    fn fixture() -> Catalog {
        Catalog::load(Path::new("tests/fixtures/catalog.yaml")).unwrap()
    }

    /// Extract the JSON payload of the script block with `id`
    fn payload(html: &str, id: &str) -> String {
        let open = format!(r#"<script type="application/json" id="{id}">"#);
        let start = html.find(&open).unwrap() + open.len();
        let end = start + html[start..].find("</script>").unwrap();
        html[start..end].to_string()
    }

    #[test]
    fn embedded_json_cannot_close_script() {
        let json = embed_json(&"</script><script>alert(1)").unwrap();
        assert!(!json.contains("</"));
        insta::assert_snapshot!(json, @r#""<\/script><script>alert(1)""#);
    }

    #[test]
    fn empty_tour_payload() {
        let json = embed_json(&TourData::empty("missing")).unwrap();
        insta::assert_snapshot!(json, @r#"{"slug":"missing","panoramas":[],"format_version":"1.0"}"#);
    }

    #[test]
    fn home_lists_every_project() {
        let html = render_home(&fixture()).unwrap();
        assert!(html.contains("<title>Portfolio</title>"));
        assert!(html.contains("3D visualizations for real estate and more."));
        assert!(html.contains(r#"href="/projects/gym""#));
        assert!(html.contains(r#"href="/projects/real-estate""#));
        assert!(html.contains(r#"data-preset="portfolio""#));
        assert!(html.contains(r#"<div id="grid-labels" class="overlay"></div>"#));

        let items: Vec<tourfolio_viz::tour_types::GridItemData> =
            serde_json::from_str(&payload(&html, "grid-data")).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].effect.as_deref(), Some("combined"));
    }

    #[test]
    fn project_page_embeds_tour() {
        let html = render_project(&fixture(), "gym").unwrap();
        assert!(html.contains("<h2>GYM</h2>"));
        assert!(html.contains("Gym Facility"));
        assert!(html.contains(r#"<p id="label">Entrance</p>"#));
        assert!(!html.contains(" disabled>"));

        let tour: TourData = serde_json::from_str(&payload(&html, "tour-data")).unwrap();
        assert_eq!(tour.panoramas.len(), 5);
        assert_eq!(tour.panoramas[4].label, "Yoga room");
    }

    #[test]
    fn single_panorama_disables_navigation() {
        let html = render_project(&fixture(), "museum").unwrap();
        assert!(html.contains(r#"<p id="label">Hall of Mammals</p>"#));
        assert_eq!(html.matches(" disabled>").count(), 2);
    }

    #[test]
    fn unknown_slug_renders_empty_page() {
        let html = render_project(&fixture(), "does-not-exist").unwrap();
        assert!(html.contains("<h2>DOES-NOT-EXIST</h2>"));
        assert!(html.contains(r#"<p id="label"></p>"#));
        assert_eq!(html.matches(" disabled>").count(), 2);

        let tour: TourData = serde_json::from_str(&payload(&html, "tour-data")).unwrap();
        assert!(tour.panoramas.is_empty());
    }

    #[test]
    fn project_text_is_escaped() {
        let mut catalog = fixture();
        catalog.projects[0].title = "<b>Gym</b>".to_string();
        let html = render_project(&catalog, "gym").unwrap();
        assert!(!html.contains("<b>Gym</b>"));
    }

    #[test]
    fn writes_one_page_per_project() {
        let temp = TempDir::new().unwrap();
        SiteWriter::new().write(&fixture(), temp.path()).unwrap();

        assert!(temp.path().join("index.html").exists());
        for slug in ["gym", "real-estate", "museum"] {
            let page = temp.path().join("projects").join(slug).join("index.html");
            assert!(page.exists(), "missing page for {slug}");
        }
        assert!(!temp.path().join("pkg").exists());
    }

    #[test]
    fn copies_viz_package() {
        let pkg = TempDir::new().unwrap();
        fs::write(pkg.path().join("tourfolio_viz.js"), "export default 1;").unwrap();
        fs::create_dir(pkg.path().join("snippets")).unwrap();
        fs::write(pkg.path().join("snippets").join("a.js"), "").unwrap();

        let out = TempDir::new().unwrap();
        SiteWriter::new()
            .with_viz_pkg(Some(pkg.path().to_path_buf()))
            .write(&fixture(), out.path())
            .unwrap();

        assert!(out.path().join("pkg/tourfolio_viz.js").exists());
        assert!(out.path().join("pkg/snippets/a.js").exists());
    }

    #[test]
    fn missing_viz_package_is_an_error() {
        let out = TempDir::new().unwrap();
        let err = SiteWriter::new()
            .with_viz_pkg(Some(out.path().join("nope")))
            .write(&fixture(), out.path())
            .unwrap_err();
        assert!(matches!(err, SiteError::MissingPackage(_)));
    }
}
