pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::watch;

/// Commands the TUI sends back to the orchestrator.
#[derive(Debug, Clone)]
pub enum TuiCommand {
    Quit,
    Refresh,
    NextTab,
    PrevTab,
    ScrollUp,
    ScrollDown,
    CycleGuide,
    CycleSpreadFilter,
    /// Nudge a slump hypothesis by the given delta.
    NudgeP0(f64),
    NudgeP1(f64),
    CycleAlpha,
    CycleBeta,
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: tokio::sync::mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<AppState>,
    cmd_tx: tokio::sync::mpsc::Sender<TuiCommand>,
) -> Result<()> {
    loop {
        let state = state_rx.borrow().clone();
        terminal.draw(|f| render::draw(f, &state))?;

        // Poll for keyboard events with a short timeout so state updates
        // repaint promptly.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let command = match key.code {
                        KeyCode::Char('q') => Some(TuiCommand::Quit),
                        KeyCode::Char('r') => Some(TuiCommand::Refresh),
                        KeyCode::Tab | KeyCode::Right => Some(TuiCommand::NextTab),
                        KeyCode::BackTab | KeyCode::Left => Some(TuiCommand::PrevTab),
                        KeyCode::Up => Some(TuiCommand::ScrollUp),
                        KeyCode::Down => Some(TuiCommand::ScrollDown),
                        KeyCode::Char('g') => Some(TuiCommand::CycleGuide),
                        KeyCode::Char('f') => Some(TuiCommand::CycleSpreadFilter),
                        KeyCode::Char('[') => Some(TuiCommand::NudgeP1(-0.005)),
                        KeyCode::Char(']') => Some(TuiCommand::NudgeP1(0.005)),
                        KeyCode::Char('{') => Some(TuiCommand::NudgeP0(-0.005)),
                        KeyCode::Char('}') => Some(TuiCommand::NudgeP0(0.005)),
                        KeyCode::Char('a') => Some(TuiCommand::CycleAlpha),
                        KeyCode::Char('b') => Some(TuiCommand::CycleBeta),
                        _ => None,
                    };
                    if let Some(command) = command {
                        let quitting = matches!(command, TuiCommand::Quit);
                        let _ = cmd_tx.send(command).await;
                        if quitting {
                            return Ok(());
                        }
                    }
                }
            }
        }

        // Repaint when the orchestrator publishes new state, but keep
        // cycling so key polling stays responsive between refreshes.
        let _ = tokio::time::timeout(Duration::from_millis(50), state_rx.changed()).await;
    }
}
