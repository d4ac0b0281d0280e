use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::collections::BTreeSet;
use std::io;
use std::time::{Duration, Instant};

use crate::audit::AuditLogger;
use crate::config::Config;
use crate::menu::{self, MenuEntry};
use crate::roles::{self, Role};
use crate::session::SessionStore;

struct DashboardState {
    last_update: Instant,
    session_line: String,
    user_roles: BTreeSet<Role>,
    recent_audits: Vec<crate::audit::AuditEntry>,
    scroll_offset: usize,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            session_line: "loading".to_string(),
            user_roles: BTreeSet::new(),
            recent_audits: Vec::new(),
            scroll_offset: 0,
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let config = Config::load()?;
        let mut session = SessionStore::new(config.session_path);
        session.load()?;

        self.session_line = match session.current_user() {
            Some(user) => format!("{} {}", user.first_name, user.last_name),
            None => "not signed in".to_string(),
        };
        self.user_roles = session.roles();

        let audit_logger = AuditLogger::new()?;
        self.recent_audits = audit_logger.read_logs(None, Some(50))?;

        self.last_update = Instant::now();
        Ok(())
    }
}

pub async fn run_dashboard() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = DashboardState::new();
    state.refresh()?;

    let result = run_app(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut DashboardState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') => {
                        state.refresh()?;
                    }
                    KeyCode::Down => {
                        if state.scroll_offset < state.recent_audits.len().saturating_sub(1) {
                            state.scroll_offset += 1;
                        }
                    }
                    KeyCode::Up => {
                        state.scroll_offset = state.scroll_offset.saturating_sub(1);
                    }
                    _ => {}
                }
            }
        }

        if state.last_update.elapsed() > Duration::from_secs(5) {
            state.refresh()?;
        }
    }
}

fn ui(f: &mut Frame, state: &DashboardState) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(f, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(body_chunks[0]);

    render_session(f, left_chunks[0], state);
    render_permissions(f, left_chunks[1], state);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body_chunks[1]);

    render_menu(f, right_chunks[0], state);
    render_audit_logs(f, right_chunks[1], state);

    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "VERGE",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled("Access Dashboard", Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().fg(Color::White));

    f.render_widget(title, area);
}

fn render_session(f: &mut Frame, area: Rect, state: &DashboardState) {
    let roles_line = if state.user_roles.is_empty() {
        Line::from(vec![
            Span::raw("Roles: "),
            Span::styled("none", Style::default().fg(Color::Yellow)),
        ])
    } else {
        let labels: Vec<String> = state
            .user_roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect();
        Line::from(vec![
            Span::raw("Roles: "),
            Span::styled(labels.join(", "), Style::default().fg(Color::Cyan)),
        ])
    };

    let text = vec![
        Line::from(vec![
            Span::raw("User: "),
            Span::styled(state.session_line.as_str(), Style::default().fg(Color::White)),
        ]),
        roles_line,
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Session"))
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}

fn render_permissions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut lines = Vec::new();

    for role in &state.user_roles {
        let grants = roles::permissions_for(role);
        if grants.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(role.as_str().to_string(), Style::default().fg(Color::Cyan)),
                Span::styled(" (no table entries)", Style::default().fg(Color::DarkGray)),
            ]));
            continue;
        }
        lines.push(Line::from(Span::styled(
            role.as_str().to_string(),
            Style::default().fg(Color::Cyan),
        )));
        for (resource, actions) in grants {
            let actions: Vec<&str> = actions.iter().map(|a| a.as_str()).collect();
            lines.push(Line::from(Span::raw(format!(
                "  {}: {}",
                resource,
                actions.join(", ")
            ))));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No roles in session",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Nominal Grants (advisory)"),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}

fn render_menu(f: &mut Frame, area: Rect, state: &DashboardState) {
    let visible: Vec<&MenuEntry> = menu::visible_menu(menu::MENU, &state.user_roles);

    let items: Vec<ListItem> = menu::MENU
        .iter()
        .map(|entry| {
            let shown = visible.contains(&entry);
            let (status_text, status_color) = if shown {
                ("[SHOWN] ", Color::Green)
            } else {
                ("[HIDDEN]", Color::DarkGray)
            };

            let label_style = if shown {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let content = vec![Line::from(vec![
                Span::styled(
                    status_text,
                    Style::default()
                        .fg(status_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(entry.label, label_style),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", entry.icon),
                    Style::default().fg(Color::DarkGray),
                ),
            ])];

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Menu"))
        .style(Style::default().fg(Color::White));

    f.render_widget(list, area);
}

fn render_audit_logs(f: &mut Frame, area: Rect, state: &DashboardState) {
    let items: Vec<ListItem> = state
        .recent_audits
        .iter()
        .skip(state.scroll_offset)
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let (status_text, status_color) = if entry.success {
                ("[OK]", Color::Green)
            } else {
                ("[FAIL]", Color::Red)
            };

            let action_str = format!("{:?}", entry.action);
            let time_str = entry.timestamp.format("%m-%d %H:%M:%S");
            let target = entry.user_id.clone().unwrap_or_default();

            let content = vec![Line::from(vec![
                Span::styled(
                    status_text,
                    Style::default()
                        .fg(status_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(time_str.to_string(), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(action_str, Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(target, Style::default().fg(Color::White)),
                Span::raw(" "),
                Span::styled(entry.roles.join(", "), Style::default().fg(Color::Yellow)),
            ])];

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Recent Activity"),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(list, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::raw(" quit  "),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::raw(" refresh  "),
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::raw(" scroll"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    f.render_widget(footer, area);
}
