//! JavaScript-facing viewer and grid handles
//!
//! Each handle owns its renderer, its engine state and the browser resources
//! it registered (resize listener, hotspot markers, tile titles). Dropping the
//! handle (`free()` from JavaScript) releases all of them; in-flight texture
//! fetches hold only weak references and are discarded when they resolve
//! after the handle is gone.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlCanvasElement, HtmlElement, Response, Window};

use crate::camera::Camera3D;
use crate::error::ViewerError;
use crate::grid::GridPreset;
use crate::hotspot::MarkerPlacement;
use crate::scene::PortfolioScene;
use crate::texture_data;
use crate::tour::{FrameStatus, PanoramaSet, TourViewer};
use crate::tour_types::{GridItemData, TourData};
use crate::webgpu::{GridRenderer, PanoramaRenderer};

/// Radians of orbit per dragged pixel
const DRAG_SENSITIVITY: f32 = 0.005;

fn window() -> Result<Window, ViewerError> {
    web_sys::window().ok_or_else(|| ViewerError::Dom("no global window".to_string()))
}

/// Match the canvas backing store to its CSS size. Returns the logical size.
fn sync_canvas_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let width = canvas.client_width().max(1) as f32;
    let height = canvas.client_height().max(1) as f32;
    canvas.set_width((width as f64 * dpr).round() as u32);
    canvas.set_height((height as f64 * dpr).round() as u32);
    (width, height)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ViewerError> {
    let response = JsFuture::from(window()?.fetch_with_str(url))
        .await
        .map_err(|e| ViewerError::fetch(url, e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| ViewerError::fetch(url, e))?;
    if !response.ok() {
        return Err(ViewerError::Fetch {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(|e| ViewerError::fetch(url, e))?)
        .await
        .map_err(|e| ViewerError::fetch(url, e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

async fn load_texture(url: &str) -> Result<texture_data::DecodedTexture, ViewerError> {
    let bytes = fetch_bytes(url).await?;
    texture_data::decode(url, &bytes)
}

fn report(err: &ViewerError) {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
}

/// Window resize listener, deregistered on drop
struct ResizeListener {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    fn register(handler: impl FnMut() + 'static) -> Result<Self, ViewerError> {
        let window = window()?;
        let callback = Closure::<dyn FnMut()>::new(handler);
        window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            .map_err(ViewerError::dom)?;
        Ok(Self { window, callback })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
    }
}

/// DOM element of one hotspot marker and the listeners attached to it
struct MarkerElement {
    id: String,
    element: HtmlElement,
    _listeners: Vec<Closure<dyn FnMut()>>,
}

impl Drop for MarkerElement {
    fn drop(&mut self) {
        self.element.remove();
    }
}

struct ViewerInner {
    tour: TourViewer,
    renderer: PanoramaRenderer,
    camera: Camera3D,
    canvas: HtmlCanvasElement,
    overlay: HtmlElement,
    markers: Vec<MarkerElement>,
    width: f32,
    height: f32,
}

/// Panorama viewer bound to a canvas and a hotspot overlay element
#[wasm_bindgen]
pub struct PanoramaViewer {
    inner: Rc<RefCell<ViewerInner>>,
    _resize: ResizeListener,
}

#[wasm_bindgen]
impl PanoramaViewer {
    /// Create a viewer for the tour described by `set_json`
    pub async fn create(
        canvas: HtmlCanvasElement,
        overlay: HtmlElement,
        set_json: String,
    ) -> Result<PanoramaViewer, JsValue> {
        let tour: TourData = serde_json::from_str(&set_json).map_err(ViewerError::from)?;
        let (width, height) = sync_canvas_size(&canvas);
        let renderer = PanoramaRenderer::new(canvas.clone()).await?;

        let inner = Rc::new(RefCell::new(ViewerInner {
            tour: TourViewer::new(PanoramaSet::from_tour(tour)),
            renderer,
            camera: Camera3D::panorama(width / height),
            canvas,
            overlay,
            markers: Vec::new(),
            width,
            height,
        }));

        let weak = Rc::downgrade(&inner);
        let resize = ResizeListener::register(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                let (width, height) = sync_canvas_size(&inner.canvas);
                let (pw, ph) = (inner.canvas.width(), inner.canvas.height());
                inner.renderer.resize(pw, ph);
                inner.camera.resize(width, height);
                inner.width = width;
                inner.height = height;
            }
        })?;

        rebuild_markers(&inner)?;
        start_loads(&inner);

        Ok(PanoramaViewer {
            inner,
            _resize: resize,
        })
    }

    /// Start a transition to the next panorama. Returns false when rejected.
    pub fn next(&self) -> bool {
        let started = self.inner.borrow_mut().tour.next().is_ok();
        if started {
            start_loads(&self.inner);
        }
        started
    }

    /// Start a transition to the previous panorama. Returns false when rejected.
    pub fn prev(&self) -> bool {
        let started = self.inner.borrow_mut().tour.prev().is_ok();
        if started {
            start_loads(&self.inner);
        }
        started
    }

    /// Label of the panorama on screen
    pub fn label(&self) -> Option<String> {
        self.inner.borrow().tour.label().map(str::to_string)
    }

    pub fn can_navigate(&self) -> bool {
        self.inner.borrow().tour.can_navigate()
    }

    /// Advance and draw one frame. Returns true while the loading placeholder
    /// should stay visible.
    pub fn frame(&self, dt_ms: f32) -> Result<bool, JsValue> {
        let status = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            inner.camera.update_animation();
            let status = inner.tour.frame(dt_ms);
            inner.renderer.render(&inner.camera, status);
            if matches!(status, FrameStatus::Committed { .. }) {
                for index in inner.tour.release_unused() {
                    inner.renderer.release(index);
                }
            }
            status
        };

        if matches!(status, FrameStatus::Committed { .. }) {
            rebuild_markers(&self.inner)?;
        }

        let inner = self.inner.borrow();
        let placements = inner
            .tour
            .overlay()
            .layout(&inner.camera, inner.width, inner.height);
        position_markers(&inner.markers, &placements)?;

        Ok(status == FrameStatus::Loading)
    }

    /// Orbit by a pointer drag of `(dx, dy)` pixels
    pub fn pointer_drag(&self, dx: f32, dy: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.camera.orbit_horizontal(-dx * DRAG_SENSITIVITY);
        inner.camera.orbit_vertical(-dy * DRAG_SENSITIVITY);
    }

    /// Scale the orbit distance (clamped to the sphere)
    pub fn zoom(&self, factor: f32) {
        self.inner.borrow_mut().camera.zoom(factor);
    }
}

/// Fetch every texture the viewer's slots are waiting for
fn start_loads(inner: &Rc<RefCell<ViewerInner>>) {
    let requests = inner.borrow_mut().tour.take_load_requests();
    for (index, url) in requests {
        let weak = Rc::downgrade(inner);
        spawn_local(async move {
            let result = load_texture(&url).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.borrow_mut();
            match result {
                Ok(decoded) => {
                    inner.renderer.upload(index, &decoded);
                    inner.tour.texture_ready(index);
                }
                Err(err) => {
                    report(&err);
                    inner.tour.texture_failed(index, &err.to_string());
                }
            }
        });
    }
}

/// Empty the list `field` selects, dropping its items only once `cell` is no
/// longer borrowed so their destructors may borrow it again
fn clear_unborrowed<T, V>(cell: &RefCell<T>, field: impl FnOnce(&mut T) -> &mut Vec<V>) {
    let stale = {
        let mut guard = cell.borrow_mut();
        std::mem::take(field(&mut *guard))
    };
    drop(stale);
}

/// Replace the marker elements with those of the current panorama
fn rebuild_markers(inner: &Rc<RefCell<ViewerInner>>) -> Result<(), ViewerError> {
    let document = window()?
        .document()
        .ok_or_else(|| ViewerError::Dom("no document".to_string()))?;

    // Removing a focused marker fires blur, which borrows `inner`
    clear_unborrowed(inner, |inner| &mut inner.markers);

    let mut guard = inner.borrow_mut();

    let hotspots: Vec<_> = guard
        .tour
        .overlay()
        .markers()
        .iter()
        .map(|m| m.hotspot.clone())
        .collect();

    let mut markers = Vec::with_capacity(hotspots.len());
    for hotspot in hotspots {
        let element: HtmlElement = document
            .create_element("div")
            .map_err(ViewerError::dom)?
            .dyn_into()
            .map_err(ViewerError::dom)?;
        element.set_class_name("hotspot");
        element.set_tab_index(0);
        element
            .set_attribute("data-hotspot", &hotspot.id)
            .map_err(ViewerError::dom)?;

        let dot = document.create_element("span").map_err(ViewerError::dom)?;
        dot.set_class_name("hotspot-dot");
        let card = document.create_element("div").map_err(ViewerError::dom)?;
        card.set_class_name("hotspot-card");
        let title = document.create_element("h3").map_err(ViewerError::dom)?;
        title.set_text_content(Some(&hotspot.title));
        let body = document.create_element("p").map_err(ViewerError::dom)?;
        body.set_text_content(Some(&hotspot.description));

        card.append_child(&title).map_err(ViewerError::dom)?;
        card.append_child(&body).map_err(ViewerError::dom)?;
        element.append_child(&dot).map_err(ViewerError::dom)?;
        element.append_child(&card).map_err(ViewerError::dom)?;

        let mut listeners = Vec::new();
        for (event, expanded) in [
            ("pointerenter", true),
            ("pointerleave", false),
            ("focus", true),
            ("blur", false),
        ] {
            let weak: Weak<RefCell<ViewerInner>> = Rc::downgrade(inner);
            let id = hotspot.id.clone();
            let callback = Closure::<dyn FnMut()>::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().tour.overlay_mut().set_expanded(&id, expanded);
                }
            });
            element
                .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                .map_err(ViewerError::dom)?;
            listeners.push(callback);
        }

        guard.overlay.append_child(&element).map_err(ViewerError::dom)?;
        markers.push(MarkerElement {
            id: hotspot.id,
            element,
            _listeners: listeners,
        });
    }

    guard.markers = markers;
    Ok(())
}

fn position_markers(markers: &[MarkerElement], placements: &[MarkerPlacement]) -> Result<(), ViewerError> {
    for marker in markers {
        let style = marker.element.style();
        match placements.iter().find(|p| p.id == marker.id) {
            Some(placement) => {
                style
                    .set_property("transform", &format!(
                        "translate({:.1}px, {:.1}px)",
                        placement.screen[0], placement.screen[1]
                    ))
                    .map_err(ViewerError::dom)?;
                style.set_property("display", "block").map_err(ViewerError::dom)?;
                let class = if placement.expanded {
                    "hotspot expanded"
                } else {
                    "hotspot"
                };
                marker.element.set_class_name(class);
            }
            None => {
                style.set_property("display", "none").map_err(ViewerError::dom)?;
            }
        }
    }
    Ok(())
}

/// Title element pinned below a grid tile
struct TileLabel(HtmlElement);

impl Drop for TileLabel {
    fn drop(&mut self) {
        self.0.remove();
    }
}

struct GridInner {
    scene: PortfolioScene,
    renderer: GridRenderer,
    canvas: HtmlCanvasElement,
    labels: Vec<TileLabel>,
}

fn create_labels(overlay: &HtmlElement, scene: &PortfolioScene) -> Result<Vec<TileLabel>, ViewerError> {
    let document = window()?
        .document()
        .ok_or_else(|| ViewerError::Dom("no document".to_string()))?;

    let mut labels = Vec::with_capacity(scene.tiles().len());
    for tile in scene.tiles() {
        let element: HtmlElement = document
            .create_element("h2")
            .map_err(ViewerError::dom)?
            .dyn_into()
            .map_err(ViewerError::dom)?;
        element.set_class_name("tile-label");
        element.set_text_content(Some(&tile.item.title));
        overlay.append_child(&element).map_err(ViewerError::dom)?;
        labels.push(TileLabel(element));
    }
    Ok(labels)
}

fn position_labels(labels: &[TileLabel], positions: &[Option<[f32; 2]>]) -> Result<(), ViewerError> {
    for (label, position) in labels.iter().zip(positions) {
        let style = label.0.style();
        match position {
            Some([x, y]) => {
                style
                    .set_property("transform", &format!("translate({x:.1}px, {y:.1}px)"))
                    .map_err(ViewerError::dom)?;
                style.set_property("display", "block").map_err(ViewerError::dom)?;
            }
            None => style.set_property("display", "none").map_err(ViewerError::dom)?,
        }
    }
    Ok(())
}

/// Home page grid of effect-shaded tiles
#[wasm_bindgen]
pub struct PortfolioGrid {
    inner: Rc<RefCell<GridInner>>,
    _resize: ResizeListener,
}

#[wasm_bindgen]
impl PortfolioGrid {
    /// Create a grid from `items_json` laid out with the named preset. Tile
    /// titles are placed in `overlay`.
    pub async fn create(
        canvas: HtmlCanvasElement,
        overlay: HtmlElement,
        items_json: String,
        preset: String,
    ) -> Result<PortfolioGrid, JsValue> {
        let items: Vec<GridItemData> = serde_json::from_str(&items_json).map_err(ViewerError::from)?;
        let (width, height) = sync_canvas_size(&canvas);
        let scene = PortfolioScene::new(items, GridPreset::named(&preset), width, height);
        let renderer = GridRenderer::new(canvas.clone(), &scene).await?;

        let labels = create_labels(&overlay, &scene)?;

        let urls: Vec<String> = scene.tiles().iter().map(|t| t.item.url.clone()).collect();
        let inner = Rc::new(RefCell::new(GridInner {
            scene,
            renderer,
            canvas,
            labels,
        }));

        for (index, url) in urls.into_iter().enumerate() {
            let weak = Rc::downgrade(&inner);
            spawn_local(async move {
                let result = load_texture(&url).await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                match result {
                    Ok(decoded) => inner.borrow_mut().renderer.set_texture(index, &decoded),
                    Err(err) => report(&err),
                }
            });
        }

        let weak = Rc::downgrade(&inner);
        let resize = ResizeListener::register(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                let (width, height) = sync_canvas_size(&inner.canvas);
                let (pw, ph) = (inner.canvas.width(), inner.canvas.height());
                inner.renderer.resize(pw, ph);
                inner.scene.resize(width, height);
            }
        })?;

        Ok(PortfolioGrid {
            inner,
            _resize: resize,
        })
    }

    /// Pointer moved to canvas-local `(x, y)` in CSS pixels
    pub fn pointer_move(&self, x: f32, y: f32) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        if let Some(cursor) = inner.scene.pointer_move(x, y) {
            inner
                .canvas
                .style()
                .set_property("cursor", cursor.as_css())?;
        }
        Ok(())
    }

    pub fn pointer_leave(&self) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        if let Some(cursor) = inner.scene.pointer_leave() {
            inner
                .canvas
                .style()
                .set_property("cursor", cursor.as_css())?;
        }
        Ok(())
    }

    /// Navigate to the hovered tile's project page. Returns the path, if any.
    pub fn click(&self) -> Result<Option<String>, JsValue> {
        let Some(path) = self.inner.borrow().scene.click() else {
            return Ok(None);
        };
        tracing::info!(path = %path, "navigating to project");
        window()?.location().set_href(&path)?;
        Ok(Some(path))
    }

    /// Advance hover smoothing, draw one frame and move the tile titles
    pub fn frame(&self, dt_ms: f32) -> Result<(), JsValue> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.scene.frame(dt_ms);
        inner.renderer.render(&inner.scene);
        position_labels(&inner.labels, &inner.scene.label_positions())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Holder {
        items: Vec<Item>,
        dropped: usize,
    }

    /// Borrows its holder on drop, like a marker whose removal fires blur
    struct Item(Weak<RefCell<Holder>>);

    impl Drop for Item {
        fn drop(&mut self) {
            if let Some(holder) = self.0.upgrade() {
                holder.borrow_mut().dropped += 1;
            }
        }
    }

    #[test]
    fn stale_items_drop_after_the_borrow_ends() {
        let holder = Rc::new(RefCell::new(Holder {
            items: Vec::new(),
            dropped: 0,
        }));
        let items = (0..3).map(|_| Item(Rc::downgrade(&holder))).collect();
        holder.borrow_mut().items = items;

        clear_unborrowed(&holder, |holder| &mut holder.items);

        let holder = holder.borrow();
        assert!(holder.items.is_empty());
        assert_eq!(holder.dropped, 3);
    }
}
