//! Frame rendering module.
//!
//! The solver hands every [`Frame`] to a [`Renderer`], which keeps frame production apart from
//! frame display. Two renderers are provided: a full-screen one built on Ratatui and a plain text
//! one that writes to any [`Write`] sink.

use std::io::Write;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    backend::Backend,
    crossterm::{
        cursor::MoveTo,
        queue,
        terminal::{Clear as ClearScreen, ClearType},
    },
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Clear, Paragraph},
    Terminal,
};

use crate::frame::{Frame, Symbol};

/// Consumer of animation frames.
pub(crate) trait Renderer {
    /// Draws one frame, replacing whatever was displayed before.
    ///
    /// # Errors
    ///
    /// This function returns an error if the underlying output fails.
    fn render(&mut self, snapshot: &Frame) -> Result<()>;
}

/// Full-screen renderer drawing into a Ratatui terminal.
pub(crate) struct TerminalRenderer<'term, B: Backend> {
    /// Terminal the frames are drawn into.
    terminal: &'term mut Terminal<B>,
}

impl<'term, B: Backend> TerminalRenderer<'term, B> {
    /// Wraps an initialized terminal.
    pub(crate) fn new(terminal: &'term mut Terminal<B>) -> Self {
        Self { terminal }
    }
}

impl<B: Backend> Renderer for TerminalRenderer<'_, B> {
    fn render(&mut self, snapshot: &Frame) -> Result<()> {
        let _ = self
            .terminal
            .try_draw(|frame| draw(snapshot, frame).map_err(std::io::Error::other))?;

        Ok(())
    }
}

/// Style applied to each symbol in the full-screen renderer.
fn style(symbol: Symbol) -> Style {
    match symbol {
        Symbol::Wall => Style::default().fg(Color::Green),
        Symbol::Open => Style::default(),
        Symbol::Mark => Style::default().fg(Color::Red),
        Symbol::Entrance | Symbol::Exit => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    }
}

/// Draws a frame centered in the terminal area, inside a titled block.
///
/// # Errors
///
/// This function may return errors if the layout cannot be split or the maze is too large for
/// terminal coordinates.
fn draw(snapshot: &Frame, frame: &mut ratatui::Frame<'_>) -> Result<()> {
    frame.render_widget(Clear, frame.area());

    let text: Text<'_> = snapshot
        .symbols()
        .map(|row| {
            row.into_iter()
                .map(|symbol| Span::styled(symbol.glyph().to_string(), style(symbol)))
                .collect::<Line<'_>>()
        })
        .collect();

    let title = snapshot.stage().title();

    // Two extra cells on each axis for the block border
    let width = u16::try_from(snapshot.width().max(title.len()))?.saturating_add(2);
    let height = u16::try_from(snapshot.height())?.saturating_add(2);

    let column = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(width),
        Constraint::Min(0),
    ])
    .split(frame.area())
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze column from horizontal layout")?;
    let space = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .split(column)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze space from vertical layout")?;

    let block = Block::bordered()
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Rounded);

    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block),
        space,
    );

    Ok(())
}

/// Plain text renderer writing each frame to an output stream.
pub(crate) struct TextRenderer<W: Write> {
    /// Sink receiving the frames.
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Wraps an output stream.
    pub(crate) const fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives back the wrapped stream.
    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &Frame) -> Result<()> {
        queue!(self.out, ClearScreen(ClearType::All), MoveTo(0, 0))?;

        writeln!(self.out, "{}:", snapshot.stage().title())?;
        for line in snapshot.lines() {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;

        Ok(())
    }
}
