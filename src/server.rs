use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path as RoutePath, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::{RwLock, mpsc};
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

use crate::catalog::Catalog;
use crate::site::{SiteWriter, render_project};

/// Catalog shared between the regeneration task and request handlers
pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// Reload the catalog and rewrite the site
fn regenerate(catalog: &Path, output: &Path, writer: &SiteWriter) -> anyhow::Result<Catalog> {
    let catalog = Catalog::load(catalog)?;
    writer.write(&catalog, output)?;
    Ok(catalog)
}

/// Serve `/projects/{slug}` from the current catalog.
///
/// Slugs without a project get the empty tour page with a 404 status.
pub async fn project_page(
    State(catalog): State<SharedCatalog>,
    RoutePath(slug): RoutePath<String>,
) -> Response {
    let catalog = catalog.read().await;
    let status = if catalog.find_by_slug(&slug).is_some() {
        StatusCode::OK
    } else {
        tracing::debug!(slug = %slug, "no project for slug");
        StatusCode::NOT_FOUND
    };

    match render_project(&catalog, &slug) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, slug = %slug, "failed to render project page");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Routes for the generated site in `output`
pub fn router(catalog: SharedCatalog, output: &Path) -> Router {
    Router::new()
        .route("/projects/{slug}", get(project_page))
        .route("/projects/{slug}/", get(project_page))
        .fallback_service(ServeDir::new(output))
        .with_state(catalog)
}

/// Start the development server with hot reload
pub async fn serve(
    catalog_path: &Path,
    output: &Path,
    port: u16,
    writer: SiteWriter,
) -> anyhow::Result<()> {
    // Generate the initial site
    let catalog = regenerate(catalog_path, output, &writer)?;
    tracing::info!(output = %output.display(), "generated initial site");
    let shared: SharedCatalog = Arc::new(RwLock::new(catalog));

    // Create channel for file change notifications
    let (tx, mut rx) = mpsc::channel::<()>(1);

    let catalog_name = catalog_path.file_name().map(ToOwned::to_owned);
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            let touches_catalog = event
                .paths
                .iter()
                .any(|p| p.file_name() == catalog_name.as_deref());
            if touches_catalog && (event.kind.is_modify() || event.kind.is_create()) {
                // Notify the regeneration task
                let _ = tx.blocking_send(());
            }
        }
    })?;

    // Watch the catalog's parent directory
    let watch_path = catalog_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

    // Spawn regeneration task
    let catalog_for_regen = catalog_path.to_path_buf();
    let output_for_regen = output.to_path_buf();
    let state_for_regen = Arc::clone(&shared);
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: wait a bit for rapid changes to settle
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            // Drain any additional notifications
            while rx.try_recv().is_ok() {}

            match regenerate(&catalog_for_regen, &output_for_regen, &writer) {
                Ok(catalog) => {
                    *state_for_regen.write().await = catalog;
                    tracing::info!("regenerated site");
                }
                Err(e) => tracing::error!("failed to regenerate site: {e:#}"),
            }
        }
    });

    // Create live reload layer
    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Reload the browser whenever the generated output changes
    let mut output_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                reloader.reload();
            }
        }
    })?;
    output_watcher.watch(output, RecursiveMode::Recursive)?;

    let app = router(shared, output).layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("development server running at http://localhost:{port}");
    tracing::info!(catalog = %catalog_path.display(), "watching for changes");

    // Keep watchers alive
    let _watcher = watcher;
    let _output_watcher = output_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> SharedCatalog {
        let catalog = Catalog::load(Path::new("tests/fixtures/catalog.yaml")).unwrap();
        Arc::new(RwLock::new(catalog))
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn known_project_renders() {
        let response = project_page(State(shared()), RoutePath("gym".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("<h2>GYM</h2>"));
    }

    #[tokio::test]
    async fn unknown_project_renders_empty_viewer() {
        let response = project_page(State(shared()), RoutePath("nowhere".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body(response).await;
        assert!(html.contains("<h2>NOWHERE</h2>"));
        assert!(html.contains(r#""panoramas":[]"#));
    }

    #[tokio::test]
    async fn page_follows_catalog_updates() {
        let state = shared();
        state.write().await.projects[0].title = "Renovated Gym".to_string();
        let response = project_page(State(state), RoutePath("gym".to_string())).await;
        assert!(body(response).await.contains("Renovated Gym"));
    }
}
