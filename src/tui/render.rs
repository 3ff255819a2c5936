use super::state::{AppState, GuideKind, Tab};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap,
};

pub fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(10),   // page body
            Constraint::Length(6), // log pane
            Constraint::Length(1), // key help
        ])
        .split(f.area());

    draw_tabs(f, chunks[0], state);

    match state.tab {
        Tab::Slump => draw_slump(f, chunks[1], state),
        Tab::Props => draw_props(f, chunks[1], state),
        Tab::Systems => draw_systems(f, chunks[1], state),
        Tab::RunsPool => draw_runs_pool(f, chunks[1], state),
        Tab::Ladder => draw_ladder(f, chunks[1], state),
        Tab::NbaDaily => draw_nba_daily(f, chunks[1], state),
    }

    draw_logs(f, chunks[2], state);
    draw_help(f, chunks[3], state);
}

fn draw_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<String> = Tab::ALL.iter().map(|t| t.title().to_string()).collect();
    let selected = Tab::ALL.iter().position(|t| *t == state.tab).unwrap_or(0);

    let mut title = String::from(" pressbox ");
    if state.sim_mode {
        title.push_str("[SIM] ");
    }
    if state.refreshing {
        title.push_str("(refreshing...) ");
    } else if let Some(ts) = &state.last_refresh {
        title.push_str(&format!("(data as of {ts}) "));
    }

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

// ── Slump detector ───────────────────────────────────────────────────

fn draw_slump(f: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    draw_llr_chart(f, halves[0], state);
    draw_slump_summary(f, halves[1], state);
}

fn draw_llr_chart(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" LLR by at-bat - {} ", state.slump.player));

    let Some(outcome) = &state.slump.outcome else {
        f.render_widget(
            Paragraph::new("No at-bat data loaded. Press 'r' to refresh.").block(block),
            area,
        );
        return;
    };

    let trace: Vec<(f64, f64)> = outcome
        .trace
        .iter()
        .enumerate()
        .map(|(i, &llr)| ((i + 1) as f64, llr))
        .collect();
    let n = outcome.trace.len().max(1) as f64;
    let upper: Vec<(f64, f64)> = vec![(0.0, outcome.ln_a), (n, outcome.ln_a)];
    let lower: Vec<(f64, f64)> = vec![(0.0, outcome.ln_b), (n, outcome.ln_b)];

    let y_min = outcome
        .trace
        .iter()
        .copied()
        .fold(outcome.ln_b, f64::min)
        - 0.5;
    let y_max = outcome
        .trace
        .iter()
        .copied()
        .fold(outcome.ln_a, f64::max)
        + 0.5;

    let datasets = vec![
        Dataset::default()
            .name("accept H1")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&upper),
        Dataset::default()
            .name("accept H0")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&lower),
        Dataset::default()
            .name("LLR")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&trace),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("at-bat")
                .bounds([0.0, n])
                .labels([String::from("0"), format!("{}", n as usize)]),
        )
        .y_axis(
            Axis::default()
                .title("LLR")
                .bounds([y_min, y_max])
                .labels([format!("{y_min:.1}"), format!("{y_max:.1}")]),
        );
    f.render_widget(chart, area);
}

fn draw_slump_summary(f: &mut Frame, area: Rect, state: &AppState) {
    let view = &state.slump;
    let mut lines: Vec<Line> = vec![
        Line::from(format!(
            "H0 p0={:.3}   H1 p1={:.3}",
            view.params.p0, view.params.p1
        )),
        Line::from(format!(
            "alpha={:.3}   beta={:.3}",
            view.params.alpha, view.params.beta
        )),
        Line::from(format!(
            "at-bats: {}   hits: {}",
            view.at_bats, view.hits
        )),
        Line::from(""),
    ];

    if let Some(outcome) = &view.outcome {
        let color = match outcome.decision {
            crate::engine::SprtDecision::AcceptH1 => Color::Green,
            crate::engine::SprtDecision::AcceptH0 => Color::Red,
            crate::engine::SprtDecision::Continue => Color::Yellow,
        };
        lines.push(Line::styled(
            format!("{}  (LLR {:.3})", outcome.decision, outcome.final_llr),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(view.decision_sentence()));
        lines.push(Line::from(""));
        lines.push(Line::from(view.explanation()));
        if let Some(idx) = outcome.first_crossing {
            lines.push(Line::from(""));
            lines.push(Line::styled(
                format!("First touched a bound at at-bat {idx} (decision still uses the full log)."),
                Style::default().fg(Color::DarkGray),
            ));
        }
    } else {
        lines.push(Line::from(view.decision_sentence()));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Decision "));
    f.render_widget(panel, area);
}

// ── Pitcher props ────────────────────────────────────────────────────

fn draw_props(f: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(
        " {} ({} matchups on the board) - 'g' to switch guide ",
        state.guide_kind.title(),
        state.board.len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if state.guide_kind == GuideKind::HomeRuns {
        let rows: Vec<Row> = state
            .hr_targets
            .iter()
            .skip(state.scroll_offset)
            .map(|r| {
                Row::new(vec![
                    r.pitcher.clone(),
                    r.opponent.clone(),
                    format!("{:.2}", r.hr_per_nine),
                    format!("{}", r.opp_hr_pct),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(24),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        )
        .header(header_row(vec!["Pitcher", "Opp", "HR/9", "Opp HR%"]))
        .block(block);
        f.render_widget(table, area);
        return;
    }

    let guide = match state.guide_kind {
        GuideKind::Strikeouts => &state.strikeouts,
        GuideKind::Walks => &state.walks,
        GuideKind::Outs => &state.outs,
        GuideKind::HomeRuns => unreachable!(),
    };
    let headers = state.guide_kind.metric_headers();

    let rows: Vec<Row> = guide
        .iter()
        .skip(state.scroll_offset)
        .map(|r| {
            let bet_style = match r.bet {
                crate::engine::props::Bet::Over => Style::default().fg(Color::Green),
                crate::engine::props::Bet::Under => Style::default().fg(Color::Red),
            };
            Row::new(vec![
                Cell::from(r.pitcher.clone()),
                Cell::from(r.opponent.clone()),
                Cell::from(format!("{}", r.metrics[0])),
                Cell::from(format!("{}", r.metrics[1])),
                Cell::from(format!("{}", r.metrics[2])),
                Cell::from(r.bet.to_string()).style(bet_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(6),
        ],
    )
    .header(header_row(vec![
        "Pitcher", "Opp", headers[0], headers[1], headers[2], "Bet",
    ]))
    .block(block);
    f.render_widget(table, area);
}

// ── Betting systems ──────────────────────────────────────────────────

fn draw_systems(f: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(
        " Betting results - {} ({} games) - 'f' to change filter ",
        state.spread_filter.describe(),
        state.system_total
    );

    let rows: Vec<Row> = state
        .system_rows
        .iter()
        .map(|r| {
            let bar_len = (r.pct / 2.0).round() as usize;
            Row::new(vec![
                r.label.clone(),
                format!("{}", r.count),
                format!("{:.2}%", r.pct),
                "█".repeat(bar_len),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(28),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Min(20),
        ],
    )
    .header(header_row(vec!["Result", "Count", "Share", ""]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

// ── Runs pool ────────────────────────────────────────────────────────

fn draw_runs_pool(f: &mut Frame, area: Rect, state: &AppState) {
    let mut title = String::from(" Runs given up (Reverse Run Your Pool) ");
    if let Some(updated) = &state.runs_pool_updated {
        title.push_str(&format!(" -  updated {updated} "));
    }

    let mut headers = vec!["Tm".to_string()];
    headers.extend((0..=13).map(|r| r.to_string()));
    headers.push("Match".to_string());
    headers.push("Games".to_string());

    let rows: Vec<Row> = state
        .runs_pool
        .iter()
        .skip(state.scroll_offset)
        .map(|r| {
            let mut cells = vec![r.team.clone()];
            cells.extend(r.buckets.iter().map(|b| b.to_string()));
            cells.push(r.matches.to_string());
            cells.push(r.games.to_string());
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(4)];
    widths.extend(std::iter::repeat(Constraint::Length(3)).take(14));
    widths.push(Constraint::Length(6));
    widths.push(Constraint::Length(6));

    let table = Table::new(rows, widths)
        .header(Row::new(headers).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

// ── Ladder ───────────────────────────────────────────────────────────

fn draw_ladder(f: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(
        " Ladder - player averaging {:.1} per game ",
        state.ladder_stat
    );

    let rows: Vec<Row> = state
        .ladder
        .iter()
        .map(|rung| {
            Row::new(vec![
                format!("{:.1}+", rung.threshold),
                format!("{:.1}%", rung.prob * 100.0),
                format_odds(rung.odds),
                format!("${:.2}", rung.wager),
                format!("${:.2}", rung.to_win),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header_row(vec!["Line", "P(hit)", "Odds", "Wager", "To win"]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn format_odds(odds: i32) -> String {
    if odds > 0 {
        format!("+{odds}")
    } else {
        format!("{odds}")
    }
}

// ── NBA daily ────────────────────────────────────────────────────────

fn draw_nba_daily(f: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let rows: Vec<Row> = state
        .scoreboard
        .iter()
        .map(|g| {
            let quarters = |q: &Option<[u32; 4]>| match q {
                Some(q) => format!("{:>3}{:>4}{:>4}{:>4}", q[0], q[1], q[2], q[3]),
                None => "  -   -   -   -".to_string(),
            };
            Row::new(vec![
                format!("{} @ {}", g.away_abbr, g.home_abbr),
                format!("{:>3}-{:<3}", g.away_score, g.home_score),
                quarters(&g.away_quarters),
                quarters(&g.home_quarters),
            ])
        })
        .collect();

    let scoreboard = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(header_row(vec!["Game", "Score", "Away Q1-Q4", "Home Q1-Q4"]))
    .block(Block::default().borders(Borders::ALL).title(" Scoreboard "));
    f.render_widget(scoreboard, halves[0]);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(rate) = state.leader_hold_rate {
        lines.push(Line::from(format!(
            "Half-time leaders held on in {:.0}% of games.",
            rate * 100.0
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(
        "Rolling win rates",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    for (team, rate, games) in state.win_rates.iter().take(12) {
        lines.push(Line::from(format!(
            "{team:<4} {:>5.1}%  ({games} gms)",
            rate * 100.0
        )));
    }

    let insights = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Insights "));
    f.render_widget(insights, halves[1]);
}

// ── Shared chrome ────────────────────────────────────────────────────

fn header_row(cells: Vec<&str>) -> Row<'static> {
    Row::new(
        cells
            .into_iter()
            .map(|c| Cell::from(c.to_string()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD))
}

fn draw_logs(f: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|entry| {
            let color = match entry.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                _ => Color::Gray,
            };
            Line::from(vec![
                Span::styled(format!("{} ", entry.time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<5} ", entry.level), Style::default().fg(color)),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect();

    let logs = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Log "));
    f.render_widget(logs, area);
}

fn draw_help(f: &mut Frame, area: Rect, state: &AppState) {
    let extra = match state.tab {
        Tab::Slump => "  [/] p1 -/+  {/} p0 -/+  a alpha  b beta",
        Tab::Props => "  g guide",
        Tab::Systems => "  f filter",
        _ => "",
    };
    let help = Paragraph::new(format!(
        "q quit  r refresh  tab/shift-tab pages  up/down scroll{extra}"
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}
