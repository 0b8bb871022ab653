//! Ratatui-based plot viewer.
//!
//! Shows the raw samples, the fitted curve and the fitted parameters in the
//! terminal until the user closes it. This is the interactive "show" step of a
//! run; the PNG is written after the viewer returns.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::domain::FitResult;
use crate::error::AppError;
use crate::plot::{ChartData, DATA_LABEL, FIT_LABEL, TITLE, X_LABEL, Y_LABEL};

mod plotters_chart;

use plotters_chart::DensityChart;

/// Show the chart and block until the user closes it (`q`, `Esc` or `Enter`).
pub fn show(chart: &ChartData, fit: &FitResult) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(5, format!("Failed to initialize terminal: {e}")))?;

    let viewer = Viewer { chart, fit };
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(5, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(5, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct Viewer<'a> {
    chart: &'a ChartData,
    fit: &'a FitResult,
}

impl Viewer<'_> {
    fn event_loop<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(5, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(5, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(5, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if is_close_key(key.code) {
                        break;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = &self.fit.params;
        let lines = vec![
            Line::from(vec![
                Span::styled("initial ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{:.5}", p.initial_density)),
                Span::styled("  final ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{:.5}", p.final_density)),
                Span::styled("  rate ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{:.5}", p.rate)),
            ]),
            Line::from(Span::styled(
                format!(
                    "n={} | rmse={:.3e} | {} (yellow) vs {} (cyan)",
                    self.fit.quality.n, self.fit.quality.rmse, DATA_LABEL, FIT_LABEL
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let block = Block::default().title(TITLE).borders(Borders::ALL);
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(Y_LABEL).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let widget = DensityChart {
            curve: &self.chart.curve,
            points: &self.chart.points,
            x_bounds: self.chart.x_bounds,
            y_bounds: self.chart.y_bounds,
            x_label: X_LABEL,
            y_label: Y_LABEL,
        };
        frame.render_widget(widget, inner);
    }
}

fn draw_footer(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let help = "q / Esc / Enter  close and save";
    let p = Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn is_close_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
}
