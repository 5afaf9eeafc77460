use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color as TermColor, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ts_core::color::Color;
use ts_core::grid::GridBuffer;
use ts_core::paint::PaintController;
use ts_core::symbol_map::SymbolMap;

use crate::canvas::{self, term_color};
use crate::layout::ScreenLayout;
use crate::widgets::MappingPanelState;

/// Application state enum (mirrored for rendering decisions).
///
/// # Example
/// ```
/// use ts_render::ui::RenderState;
/// let state = RenderState::Painting;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Normal painting.
    Painting,
    /// Mapping panel focused.
    MappingEdit,
    /// Free-form color entry prompt.
    ColorInput,
    /// Help overlay visible.
    Help,
    /// Quitting (should not reach draw).
    Quitting,
}

/// Tout ce qu'il faut pour dessiner une frame.
pub struct DrawContext<'a> {
    pub layout: &'a ScreenLayout,
    pub grid: &'a GridBuffer,
    pub mappings: &'a SymbolMap,
    pub controller: &'a PaintController,
    pub palette: &'a [Color],
    /// Serialized map, drawn when the preview pane is visible.
    pub preview: Option<&'a str>,
    pub mapping_panel: &'a MappingPanelState,
    pub state: &'a RenderState,
    pub status: Option<&'a str>,
    pub color_input: &'a str,
}

/// Draw the full UI: canvas + preview + sidebar, then overlays.
pub fn draw(frame: &mut Frame, ctx: &DrawContext) {
    let layout = ctx.layout;
    let size = ctx.grid.size();

    // === Canvas ===
    let canvas_block = Block::bordered()
        .title(format!(" Grid {size}x{size} "))
        .border_style(if ctx.controller.is_dragging() {
            Style::default().fg(TermColor::Yellow)
        } else {
            Style::default()
        });
    frame.render_widget(canvas_block, layout.canvas);
    let lookup = ctx.mappings.build_lookup();
    canvas::render_grid(frame.buffer_mut(), layout.grid, ctx.grid, &lookup);

    // === Preview ===
    if let (Some(area), Some(text)) = (layout.preview, ctx.preview) {
        let lines: Vec<Line> = text.lines().skip(2).map(Line::raw).collect();
        let preview = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Preview "),
        );
        frame.render_widget(preview, area);
    }

    // === Sidebar ===
    draw_sidebar(frame, layout.sidebar, ctx);

    // === Overlays ===
    match ctx.state {
        RenderState::Help => draw_help_overlay(frame, frame.area()),
        RenderState::ColorInput => draw_color_prompt(frame, frame.area(), ctx.color_input),
        _ => {}
    }
}

fn swatch(color: Color) -> Span<'static> {
    Span::styled("  ", Style::default().bg(term_color(color)))
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("─ {title} ─────────"),
        Style::default().fg(TermColor::Yellow),
    ))
}

/// Draw the parameter sidebar: mode, active color, palette, mappings, status.
fn draw_sidebar(frame: &mut Frame, area: Rect, ctx: &DrawContext) {
    let controller = ctx.controller;
    let active = controller.active_color();

    let state_str = match ctx.state {
        RenderState::Painting | RenderState::Quitting => "✎ PAINT",
        RenderState::MappingEdit => "≡ MAPPING",
        RenderState::ColorInput => "# COLOR",
        RenderState::Help => "? HELP",
    };

    let mut lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(TermColor::Green))),
        Line::from(""),
        section("Brush"),
        Line::from(format!(" Mode: {}", controller.mode().label())),
        Line::from(vec![Span::raw(" Color: "), swatch(active), Span::raw(format!(" {active}"))]),
        Line::from(format!(
            " Drag: {}",
            if controller.is_dragging() { "ON" } else { "OFF" }
        )),
        Line::from(""),
        section("Palette"),
    ];

    for (i, &color) in ctx.palette.iter().enumerate() {
        let marker = if color == active { "▸" } else { " " };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker}{} ", i + 1)),
            swatch(color),
            Span::raw(format!(" {color}")),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section("Mapping"));
    let editing = *ctx.state == RenderState::MappingEdit;
    for (i, entry) in ctx.mappings.entries().iter().enumerate() {
        let selected = editing && i == ctx.mapping_panel.selected;
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { "▸" } else { " " }, style),
            swatch(entry.color),
            Span::styled(format!(" {} → '{}'", entry.color, entry.symbol_char()), style),
        ]));
    }
    if ctx.mappings.is_empty() {
        lines.push(Line::from(Span::styled(
            " (vide)",
            Style::default().fg(TermColor::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    if let Some(status) = ctx.status {
        lines.push(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(TermColor::Cyan),
        )));
    }
    lines.push(Line::from(Span::styled(
        " ? = help",
        Style::default().fg(TermColor::DarkGray),
    )));

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT)
            .title(" tileSketch "),
    );
    frame.render_widget(sidebar, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Free-form color entry prompt.
fn draw_color_prompt(frame: &mut Frame, area: Rect, input: &str) {
    let preview = ts_core::normalize(input);
    let text = vec![
        Line::from(format!(" > {input}_")),
        Line::from(vec![Span::raw(" → "), swatch(preview), Span::raw(format!(" {preview}"))]),
        Line::from(Span::styled(
            " #rgb, #rrggbb, rgb(r, g, b) · Enter/Esc",
            Style::default().fg(TermColor::DarkGray),
        )),
    ];
    let prompt_area = centered(area, 44, 5);
    frame.render_widget(Clear, prompt_area);
    frame.render_widget(
        Paragraph::new(text).block(Block::bordered().title(" Color ")),
        prompt_area,
    );
}

/// Draw a help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " tileSketch · Controls ",
            Style::default().fg(TermColor::Yellow),
        )),
        Line::from(""),
        Line::from(" Mouse    Click/drag to paint"),
        Line::from(" p/e/s    Paint / Erase / Sample"),
        Line::from(" 1-9      Palette color"),
        Line::from(" #        Type a color"),
        Line::from(" f        Fill with active color"),
        Line::from(" c        Clear grid"),
        Line::from(" +/-      Grid size (clears!)"),
        Line::from(" Tab      Edit mappings"),
        Line::from("   ↑/↓    Select entry"),
        Line::from("   Ctrl+A Add active color"),
        Line::from("   Enter  Set entry color"),
        Line::from("   Del    Remove entry"),
        Line::from("   char   Set entry symbol"),
        Line::from(" v        Toggle preview"),
        Line::from(" x        Export map"),
        Line::from(" y        Copy map"),
        Line::from(" Ctrl+O   Import map"),
        Line::from(" q        Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(TermColor::DarkGray),
        )),
    ];

    let help_height = help_text.len() as u16 + 2;
    let help_area = centered(area, 38, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(TermColor::Black).fg(TermColor::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}
