//! The editor: single owner of the session state.
//!
//! Everything outside reads the session through [`Editor::state`] and mutates
//! it only through [`Editor::dispatch`]. Pointer and key events are routed to
//! the tool state machine and viewport controller, whose actions come back
//! through `dispatch`.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use kurbo::Point;
use std::path::PathBuf;
use tacmap_core::catalog::{AdminMapConfig, AdminOverlay, IdentityLabels, LabelResolver};
use tacmap_core::input::{KeyEvent, is_undo_shortcut};
use tacmap_core::storage::{ExportDocument, export_file_name, parse_document};
use tacmap_core::tools::{ToolPreview, TextInput};
use tacmap_core::{
    Action, ActionOutcome, EditorState, HexColor, LegendCatalog, MapCatalog, MapConfig, MouseButton,
    OperatorCatalog, PointerEvent, PointerTarget, Storage, ToolKind, ToolManager, ViewportController,
};
use tacmap_render::{
    DecodeMode, IconCache, PngRenderer, RenderContext, Renderer, Scene, SvgRenderer, icon_requests, project,
};

pub struct Editor {
    config: AppConfig,
    state: EditorState,
    floor: i32,
    maps: MapCatalog,
    operators: OperatorCatalog,
    legend: LegendCatalog,
    admin: Option<AdminMapConfig>,
    overlay: AdminOverlay,
    labels: Box<dyn LabelResolver>,
    tools: ToolManager,
    navigation: ViewportController,
    icons: IconCache,
}

impl Editor {
    /// Editor over the map catalog found under the configured asset root.
    pub fn new(config: AppConfig) -> Self {
        let maps = MapCatalog::load(&config.asset_root);
        Self::with_maps(config, maps)
    }

    pub fn with_maps(config: AppConfig, maps: MapCatalog) -> Self {
        let mode = if config.inline_icon_decode {
            DecodeMode::Inline
        } else {
            DecodeMode::Threaded
        };
        let icons = IconCache::with_assets(&config.asset_root, mode);
        Self {
            config,
            state: EditorState::new(),
            floor: 0,
            maps,
            operators: OperatorCatalog::builtin(),
            legend: LegendCatalog::builtin(),
            admin: None,
            overlay: AdminOverlay::default(),
            labels: Box::new(IdentityLabels),
            tools: ToolManager::new(),
            navigation: ViewportController::new(),
            icons,
        }
    }

    /// Resolve callout label keys through `labels`.
    pub fn with_labels(mut self, labels: Box<dyn LabelResolver>) -> Self {
        self.labels = labels;
        self.refresh_overlay();
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn maps(&self) -> &MapCatalog {
        &self.maps
    }

    pub fn operators(&self) -> &OperatorCatalog {
        &self.operators
    }

    pub fn legend(&self) -> &LegendCatalog {
        &self.legend
    }

    pub fn active_map(&self) -> Option<&MapConfig> {
        self.state.map_id.as_deref().and_then(|id| self.maps.get(id))
    }

    pub fn overlay(&self) -> &AdminOverlay {
        &self.overlay
    }

    pub fn preview(&self) -> Option<ToolPreview<'_>> {
        self.tools.preview()
    }

    /// Apply an action to the session.
    pub fn dispatch(&mut self, action: Action) -> ActionOutcome {
        let opens_map = matches!(action, Action::SetActiveMap(_));
        // Gestures refer to elements that these actions may replace.
        let replaces_elements = matches!(
            action,
            Action::SetActiveMap(_) | Action::LoadState(_) | Action::ClearCanvas { .. } | Action::Undo
        );

        let outcome = self.state.apply(action);
        if !outcome.is_applied() {
            return outcome;
        }
        if replaces_elements {
            self.tools.cancel();
        }
        if opens_map {
            self.on_map_changed();
        }
        outcome
    }

    /// Switch to the map `id`, discarding the current session.
    pub fn open_map(&mut self, id: &str) -> AppResult<()> {
        if self.maps.get(id).is_none() {
            return Err(AppError::UnknownMap(id.to_string()));
        }
        self.dispatch(Action::SetActiveMap(Some(id.to_string())));
        Ok(())
    }

    /// Show another floor of the active map.
    pub fn set_floor(&mut self, floor: i32) -> AppResult<()> {
        if let Some(map) = self.active_map() {
            if !map.has_floor(floor) {
                return Err(AppError::UnknownFloor {
                    map: map.id.clone(),
                    floor,
                });
            }
        }
        if self.floor != floor {
            self.tools.cancel();
            self.floor = floor;
            self.refresh_overlay();
        }
        Ok(())
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tools.cancel();
        self.dispatch(Action::SetTool(tool));
    }

    pub fn select_color(&mut self, color: HexColor) {
        self.dispatch(Action::SetColor(color));
    }

    pub fn select_operator(&mut self, id: &str) -> AppResult<()> {
        let operator = self.operators.get(id).cloned().ok_or_else(|| AppError::UnknownItem {
            kind: "operator",
            id: id.to_string(),
        })?;
        self.dispatch(Action::SetOperator(Some(operator)));
        Ok(())
    }

    pub fn select_legend_item(&mut self, id: &str) -> AppResult<()> {
        let item = self.legend.get(id).cloned().ok_or_else(|| AppError::UnknownItem {
            kind: "legend item",
            id: id.to_string(),
        })?;
        self.dispatch(Action::SetLegendItem(Some(item)));
        Ok(())
    }

    /// Topmost element of the current floor under a screen position.
    pub fn target_at(&self, screen: Point) -> PointerTarget {
        let world = self.state.viewport.screen_to_world(screen);
        match self.state.elements.hit_test(self.floor, world, self.state.viewport.scale) {
            Some(id) => PointerTarget::Element(id),
            None => PointerTarget::Background,
        }
    }

    /// Route a pointer event. `text` answers the text tool's prompt.
    pub fn handle_pointer(&mut self, event: &PointerEvent, text: &mut dyn TextInput) {
        match *event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button, text),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
            PointerEvent::Scroll { position, delta } => {
                let action = self.navigation.wheel(&self.state.viewport, position, delta.y);
                self.dispatch(action);
            }
        }
    }

    fn pointer_down(&mut self, screen: Point, button: MouseButton, text: &mut dyn TextInput) {
        let target = self.target_at(screen);
        if ViewportController::starts_pan(self.state.tool, button, target) {
            self.navigation.begin_pan(screen);
            return;
        }
        if button != MouseButton::Left {
            return;
        }
        let world = self.state.viewport.screen_to_world(screen);
        if let Some(action) = self.tools.pointer_down(target, world, self.floor, &self.state, text) {
            self.dispatch(action);
        }
    }

    fn pointer_move(&mut self, screen: Point) {
        if self.navigation.is_panning() {
            if let Some(action) = self.navigation.drag(&self.state.viewport, screen) {
                self.dispatch(action);
            }
            return;
        }
        let world = self.state.viewport.screen_to_world(screen);
        self.tools.pointer_move(world);
    }

    fn pointer_up(&mut self, screen: Point) {
        if self.navigation.end_pan() {
            return;
        }
        let world = self.state.viewport.screen_to_world(screen);
        if let Some(action) = self.tools.pointer_up(world, &self.state) {
            self.dispatch(action);
        }
    }

    /// Route a key event. Returns whether it was handled.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let KeyEvent::Pressed { key, modifiers } = event else {
            return false;
        };
        if is_undo_shortcut(key, *modifiers) {
            self.dispatch(Action::Undo);
            return true;
        }
        if key == "Escape" && self.tools.is_active() {
            self.tools.cancel();
            return true;
        }
        false
    }

    pub fn export_document(&self) -> ExportDocument {
        ExportDocument::from_state(&self.state)
    }

    pub fn export_json(&self) -> AppResult<String> {
        Ok(self.export_document().to_json()?)
    }

    /// Suggested file name for an export made today.
    pub fn export_file_name(&self) -> String {
        let today = chrono::Local::now().format("%Y-%m-%d");
        export_file_name(self.state.map_id.as_deref(), today)
    }

    /// Write the export into the configured export directory under today's
    /// file name. Returns the written path.
    pub fn export_to_dir(&self) -> AppResult<PathBuf> {
        let dir = self.config.export_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(self.export_file_name());
        std::fs::write(&path, self.export_json()?)?;
        log::info!("Exported document to {}", path.display());
        Ok(path)
    }

    /// Replace elements and viewport with an imported document.
    ///
    /// A malformed document leaves the session untouched.
    pub fn import_json(&mut self, json: &str) -> AppResult<()> {
        let document = parse_document(json).inspect_err(|e| log::error!("Failed to import document: {e}"))?;
        match self.dispatch(Action::LoadState(document)) {
            ActionOutcome::Rejected(reason) => Err(AppError::Rejected(reason)),
            _ => Ok(()),
        }
    }

    /// Save the current document under `name`.
    pub fn save_to(&self, storage: &dyn Storage, name: &str) -> AppResult<()> {
        pollster::block_on(storage.save(name, &self.export_document()))?;
        log::info!("Saved document {name}");
        Ok(())
    }

    /// Load the document `name` as an undoable state replacement.
    pub fn load_from(&mut self, storage: &dyn Storage, name: &str) -> AppResult<()> {
        let document = pollster::block_on(storage.load(name))?;
        match self.dispatch(Action::LoadState(document.to_value()?)) {
            ActionOutcome::Rejected(reason) => Err(AppError::Rejected(reason)),
            _ => {
                log::info!("Loaded document {name}");
                Ok(())
            }
        }
    }

    /// Bring icon decodes in line with the visible floor and apply finished ones.
    pub fn sync_icons(&mut self) -> usize {
        let requests = icon_requests(self.state.elements.floor(self.floor), self.floor, Some(&self.overlay));
        self.icons.sync(&requests);
        self.icons.poll()
    }

    /// Frame for the current state.
    pub fn scene(&mut self) -> Scene {
        self.sync_icons();
        self.project()
    }

    fn project(&self) -> Scene {
        let mut ctx = RenderContext::new(&self.state, self.floor, self.config.viewport_size())
            .with_overlay(&self.overlay)
            .with_preview(self.tools.preview())
            .with_icons(&self.icons)
            .with_background(self.config.background_color);
        if let Some(map) = self.active_map() {
            ctx = ctx.with_map(map);
        }
        project(&ctx)
    }

    /// Scene with every icon decoded, for offline output.
    fn settled_scene(&mut self) -> Scene {
        self.sync_icons();
        self.icons.wait_idle();
        self.project()
    }

    pub fn render_svg(&mut self) -> AppResult<String> {
        let scene = self.settled_scene();
        Ok(SvgRenderer::new().render(&scene)?)
    }

    pub fn render_png(&mut self) -> AppResult<Vec<u8>> {
        let scene = self.settled_scene();
        let mut renderer = PngRenderer::new(Some(self.config.asset_root.clone()));
        Ok(renderer.render(&scene)?)
    }

    fn on_map_changed(&mut self) {
        let map = self.active_map().cloned();
        self.floor = map.as_ref().and_then(MapConfig::default_floor).unwrap_or(0);
        self.admin = map
            .as_ref()
            .and_then(|map| AdminMapConfig::load(&self.config.asset_root, &map.id));
        match &map {
            Some(map) => log::info!("Opened map {} on floor {}", map.id, self.floor),
            None => log::info!("Closed map"),
        }
        self.refresh_overlay();
    }

    fn refresh_overlay(&mut self) {
        let overlay = match (&self.admin, self.active_map()) {
            (Some(admin), Some(map)) => admin.overlay(map, self.floor, &self.legend, self.labels.as_ref()),
            _ => AdminOverlay::default(),
        };
        self.overlay = overlay;
    }
}
