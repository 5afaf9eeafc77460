use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::DefaultTerminal;
use ratatui::layout::{Position, Rect};
use ts_core::color::Color;
use ts_core::config::{SketchConfig, step_grid_size};
use ts_core::export::{ExportSink, suggested_filename_now};
use ts_core::grid::GridBuffer;
use ts_core::paint::{PaintController, PaintMode};
use ts_core::serializer::{SerializeOptions, parse_map, serialize_with};
use ts_core::symbol_map::{BLANK_SYMBOL, EntryPatch, SymbolEntry, SymbolMap};
use ts_export::ClipboardSink;
use ts_export::dialog::graphical_session_available;
use ts_render::layout::{ScreenLayout, cell_at, compute_layout};
use ts_render::ui::{DrawContext, RenderState};
use ts_render::widgets::MappingPanelState;

/// Application state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Painting,
    MappingEdit,
    ColorInput,
    Help,
    Quitting,
}

/// Actions demandées par une touche mais exécutées hors du handler,
/// parce qu'elles suspendent le TUI ou touchent le système.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    Export,
    Copy,
    Import,
}

/// Main application struct.
pub struct App {
    pub state: AppState,
    pub grid: GridBuffer,
    pub mappings: SymbolMap,
    pub controller: PaintController,
    pub palette: Vec<Color>,
    pub export_dir: PathBuf,
    pub include_legend: bool,
    pub show_preview: bool,
    pub mapping_panel: MappingPanelState,
    /// Saisie en cours dans l'invite couleur.
    pub color_input: String,
    /// Dernier message affiché dans la barre latérale.
    pub status: Option<String>,
    /// Disposition de la dernière frame, utilisée pour le hit-testing souris.
    pub layout: ScreenLayout,
    /// Dernière cellule touchée pendant un glissé.
    last_cell: Option<(usize, usize)>,
    pub pending: Option<PendingAction>,
}

impl App {
    /// Create a new App from a sanitized config.
    ///
    /// # Errors
    /// Returns an error if the configured grid size is rejected.
    pub fn new(config: SketchConfig) -> Result<Self> {
        let grid = GridBuffer::new(config.grid_size)?;
        let mut controller = PaintController::new(config.active_color);
        controller.set_mode(config.initial_mode);

        Ok(Self {
            state: AppState::Painting,
            layout: compute_layout(Rect::default(), grid.size(), config.show_preview),
            grid,
            mappings: config.mappings,
            controller,
            palette: config.palette,
            export_dir: config.export_dir,
            include_legend: config.include_legend,
            show_preview: config.show_preview,
            mapping_panel: MappingPanelState::default(),
            color_input: String::new(),
            status: None,
            last_cell: None,
            pending: None,
        })
    }

    /// Main event loop: draw, block on the next event, run pending actions.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let size = terminal.size()?;
            self.layout = compute_layout(
                Rect::new(0, 0, size.width, size.height),
                self.grid.size(),
                self.show_preview,
            );

            let state = self.render_state();
            let preview = self
                .show_preview
                .then(|| ts_core::serialize(&self.grid, &self.mappings));
            terminal.draw(|frame| {
                let ctx = DrawContext {
                    layout: &self.layout,
                    grid: &self.grid,
                    mappings: &self.mappings,
                    controller: &self.controller,
                    palette: &self.palette,
                    preview: preview.as_deref(),
                    mapping_panel: &self.mapping_panel,
                    state: &state,
                    status: self.status.as_deref(),
                    color_input: &self.color_input,
                };
                ts_render::ui::draw(frame, &ctx);
            })?;

            self.handle_event(&event::read()?);

            if let Some(action) = self.pending.take() {
                self.run_pending(action, &mut terminal);
            }
        }
        Ok(())
    }

    /// Convert `AppState` to `RenderState` for the UI.
    fn render_state(&self) -> RenderState {
        match self.state {
            AppState::Painting => RenderState::Painting,
            AppState::MappingEdit => RenderState::MappingEdit,
            AppState::ColorInput => RenderState::ColorInput,
            AppState::Help => RenderState::Help,
            AppState::Quitting => RenderState::Quitting,
        }
    }

    /// Texte exporté : format de base, plus la légende si configurée.
    #[must_use]
    pub fn export_text(&self) -> String {
        serialize_with(
            &self.grid,
            &self.mappings,
            SerializeOptions {
                include_legend: self.include_legend,
            },
        )
    }

    /// Handle a terminal event by dispatching to focused sub-handlers.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusLost => self.controller.pointer_leave(),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('o') => self.pending = Some(PendingAction::Import),
                KeyCode::Char('a') if self.state == AppState::MappingEdit => self.add_mapping(),
                KeyCode::Char('c') => self.state = AppState::Quitting,
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Painting => self.handle_painting_key(code),
            AppState::MappingEdit => self.handle_mapping_key(code),
            AppState::ColorInput => self.handle_color_input_key(code),
            AppState::Help => {
                if matches!(code, KeyCode::Char('?' | 'q') | KeyCode::Esc) {
                    self.state = AppState::Painting;
                }
            }
            AppState::Quitting => {}
        }
    }

    fn handle_painting_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.state = AppState::Quitting,
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char('p') => self.controller.set_mode(PaintMode::Paint),
            KeyCode::Char('e') => self.controller.set_mode(PaintMode::Erase),
            KeyCode::Char('s') => self.controller.set_mode(PaintMode::Sample),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(&color) = self.palette.get(idx) {
                    self.controller.set_active_color(color);
                }
            }
            KeyCode::Char('#') => {
                self.color_input.clear();
                self.state = AppState::ColorInput;
            }
            KeyCode::Char('f') => self.grid.fill(self.controller.active_color()),
            KeyCode::Char('c') => self.grid.clear(),
            KeyCode::Char('+' | '=') => self.change_grid_size(true),
            KeyCode::Char('-') => self.change_grid_size(false),
            KeyCode::Tab => {
                self.mapping_panel.clamp(self.mappings.len());
                self.state = AppState::MappingEdit;
            }
            KeyCode::Char('v') => self.show_preview = !self.show_preview,
            KeyCode::Char('x') => self.pending = Some(PendingAction::Export),
            KeyCode::Char('y') => self.pending = Some(PendingAction::Copy),
            _ => {}
        }
    }

    /// Mapping panel: navigation and in-place edits of the selected entry.
    fn handle_mapping_key(&mut self, code: KeyCode) {
        let selected = self.mapping_panel.selected;
        match code {
            KeyCode::Tab | KeyCode::Esc => self.state = AppState::Painting,
            KeyCode::Up => self.mapping_panel.select_prev(),
            KeyCode::Down => self.mapping_panel.select_next(self.mappings.len()),
            KeyCode::Delete | KeyCode::Backspace => {
                if let Some(removed) = self.mappings.remove(selected) {
                    log::debug!("Mapping retiré : {} → {:?}", removed.color, removed.symbol);
                }
                self.mapping_panel.clamp(self.mappings.len());
            }
            KeyCode::Enter => {
                let color = self.controller.active_color();
                self.mappings.update(selected, EntryPatch::color(color));
            }
            KeyCode::Insert => self.add_mapping(),
            KeyCode::Char(c) => {
                self.mappings
                    .update(selected, EntryPatch::symbol(&c.to_string()));
            }
            _ => {}
        }
    }

    /// Nouvelle entrée pour la couleur active, symbole blanc, sélectionnée.
    fn add_mapping(&mut self) {
        let color = self.controller.active_color();
        self.mappings
            .add(SymbolEntry::new(color, &BLANK_SYMBOL.to_string()));
        self.mapping_panel.selected = self.mappings.len() - 1;
    }

    fn handle_color_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state = AppState::Painting,
            KeyCode::Enter => {
                let color = ts_core::normalize(&self.color_input);
                self.controller.set_active_color(color);
                self.status = Some(format!("Couleur active : {color}"));
                self.state = AppState::Painting;
            }
            KeyCode::Backspace => {
                self.color_input.pop();
            }
            KeyCode::Char(c) => self.color_input.push(c),
            _ => {}
        }
    }

    fn change_grid_size(&mut self, forward: bool) {
        let next = step_grid_size(self.grid.size(), forward);
        if next == self.grid.size() {
            return;
        }
        self.controller.pointer_leave();
        self.last_cell = None;
        match self.grid.resize(next) {
            Ok(()) => self.status = Some(format!("Grille {next}x{next}")),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Souris → machine à états du pinceau.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(self.state, AppState::Painting | AppState::MappingEdit) {
            return;
        }
        let hit = cell_at(self.layout.grid, self.grid.size(), mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = hit {
                    self.controller.pointer_down(&mut self.grid, row, col);
                    self.last_cell = hit;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.controller.is_dragging() {
                    return;
                }
                let inside_canvas = self
                    .layout
                    .canvas
                    .contains(Position::new(mouse.column, mouse.row));
                if !inside_canvas {
                    self.controller.pointer_leave();
                    self.last_cell = None;
                } else if let Some((row, col)) = hit
                    && hit != self.last_cell
                {
                    self.controller.pointer_enter(&mut self.grid, row, col);
                    self.last_cell = hit;
                }
            }
            MouseEventKind::Up(_) => {
                self.controller.pointer_release();
                self.last_cell = None;
            }
            _ => {}
        }
    }

    fn run_pending(&mut self, action: PendingAction, terminal: &mut DefaultTerminal) {
        match action {
            PendingAction::Export => {
                let text = self.export_text();
                let filename = suggested_filename_now();
                let mut chain = ts_export::default_chain(self.export_dir.clone());
                let outcome = suspend_tui(terminal, || chain.send(&text, &filename));
                self.status = Some(outcome.status_message());
            }
            PendingAction::Copy => {
                let outcome = ClipboardSink.send(&self.export_text(), &suggested_filename_now());
                self.status = Some(outcome.status_message());
            }
            PendingAction::Import => {
                if !graphical_session_available() {
                    self.status = Some("Import impossible : pas de session graphique".to_string());
                    return;
                }
                let picked = suspend_tui(terminal, || {
                    rfd::FileDialog::new()
                        .set_title("Open Map")
                        .add_filter("Text map", &["txt"])
                        .set_directory(&self.export_dir)
                        .pick_file()
                });
                if let Some(path) = picked
                    && let Err(e) = self.import_file(&path)
                {
                    log::warn!("Import échoué : {e:#}");
                    self.status = Some(format!("Import échoué : {e:#}"));
                }
            }
        }
    }

    /// Charge une carte texte à la place de la grille courante.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid map.
    pub fn import_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?;
        self.import_text(&text)?;
        self.status = Some(format!("Importé : {}", path.display()));
        Ok(())
    }

    /// Remplace la grille par celle décrite dans `text`.
    ///
    /// # Errors
    /// Returns `MalformedMap` when `text` does not follow the map format.
    pub fn import_text(&mut self, text: &str) -> Result<(), ts_core::CoreError> {
        let grid = parse_map(text, &self.mappings)?;
        self.controller.pointer_leave();
        self.last_cell = None;
        log::info!("Carte importée : {}x{}", grid.size(), grid.size());
        self.grid = grid;
        Ok(())
    }
}

/// Suspend le TUI, exécute `f` (dialog natif bloquant), restaure le TUI.
fn suspend_tui<T>(terminal: &mut DefaultTerminal, f: impl FnOnce() -> T) -> T {
    crossterm::terminal::disable_raw_mode().ok();
    crossterm::execute!(
        std::io::stdout(),
        DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )
    .ok();

    let result = f();

    crossterm::terminal::enable_raw_mode().ok();
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        EnableMouseCapture
    )
    .ok();
    terminal.clear().ok();

    result
}
