use anyhow::Result;
use bowling_money::{
    format_currency, suggest_partner_names, BowlerType, ConfirmAction, DocumentStore,
    MoneyTransfer, PricingTable, SessionStore, SidePotKey, TotalsBreakdown,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Calculator,
    Partners,
    Favorites,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Calculator, Page::Partners, Page::Favorites];

    pub fn next(&self) -> Self {
        match self {
            Page::Calculator => Page::Partners,
            Page::Partners => Page::Favorites,
            Page::Favorites => Page::Calculator,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Calculator => Page::Favorites,
            Page::Partners => Page::Calculator,
            Page::Favorites => Page::Partners,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Calculator => "Calculator",
            Page::Partners => "Handicap Doubles",
            Page::Favorites => "Favorites",
        }
    }

    /// Persisted `activeTab` value
    pub fn tab(&self) -> &'static str {
        match self {
            Page::Calculator => "calculator",
            Page::Partners => "partners",
            Page::Favorites => "favorites",
        }
    }

    pub fn from_tab(tab: &str) -> Option<Self> {
        Page::ALL.into_iter().find(|page| page.tab() == tab)
    }
}

/// What the text prompt adds when submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Partner,
    Favorite,
}

#[derive(Debug, Clone)]
pub struct InputState {
    pub target: InputTarget,
    pub buffer: String,
}

pub struct App<S: DocumentStore> {
    pub store: SessionStore<S>,
    pub current_page: Page,
    pub partners_state: TableState,
    pub favorites_state: ListState,
    pub input: Option<InputState>,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<S: DocumentStore> App<S> {
    pub fn new(store: SessionStore<S>) -> Self {
        let current_page = Page::from_tab(&store.state().active_tab).unwrap_or(Page::Calculator);

        let mut app = Self {
            store,
            current_page,
            partners_state: TableState::default(),
            favorites_state: ListState::default(),
            input: None,
            status: None,
            should_quit: false,
        };
        app.clamp_selections();
        app
    }

    pub fn set_page(&mut self, page: Page) {
        self.current_page = page;
        self.store.set_active_tab(Some(page.tab()));
    }

    pub fn selected_partner_id(&self) -> Option<String> {
        self.partners_state
            .selected()
            .and_then(|i| self.store.state().doubles_entries.get(i))
            .map(|entry| entry.id.clone())
    }

    pub fn selected_favorite(&self) -> Option<String> {
        self.favorites_state
            .selected()
            .and_then(|i| self.store.state().favorites.get(i))
            .cloned()
    }

    /// Autocomplete candidates for the open prompt
    pub fn suggestions(&self) -> Vec<&'static str> {
        match &self.input {
            Some(input) => suggest_partner_names(&self.store.state().doubles_entries, &input.buffer),
            None => Vec::new(),
        }
    }

    fn clamp_selections(&mut self) {
        let partners = self.store.state().doubles_entries.len();
        self.partners_state
            .select(clamp(self.partners_state.selected(), partners));

        let favorites = self.store.state().favorites.len();
        self.favorites_state
            .select(clamp(self.favorites_state.selected(), favorites));
    }

    fn move_selection(&mut self, down: bool) {
        match self.current_page {
            Page::Partners => {
                let len = self.store.state().doubles_entries.len();
                let next = step(self.partners_state.selected(), len, down);
                self.partners_state.select(next);
            }
            Page::Favorites => {
                let len = self.store.state().favorites.len();
                let next = step(self.favorites_state.selected(), len, down);
                self.favorites_state.select(next);
            }
            Page::Calculator => {}
        }
    }

    // ========================================================================
    // KEY HANDLING
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.store.pending_confirmation().is_some() {
            self.handle_confirmation_key(key);
        } else if self.input.is_some() {
            self.handle_input_key(key);
        } else {
            self.handle_normal_key(key);
        }
        self.clamp_selections();
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.status = match self.store.confirm() {
                    Some(ConfirmAction::ResetSession) => Some("New week started".to_string()),
                    Some(ConfirmAction::ClearFavorites) => Some("Favorites cleared".to_string()),
                    None => None,
                };
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.store.cancel();
                self.status = Some("Cancelled".to_string());
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.submit_input(input);
                }
            }
            code => {
                let suggestion = self.suggestions().first().copied();
                let Some(input) = self.input.as_mut() else {
                    return;
                };
                match code {
                    KeyCode::Backspace => {
                        input.buffer.pop();
                    }
                    KeyCode::Tab => {
                        if let Some(name) = suggestion {
                            input.buffer = name.to_string();
                        }
                    }
                    KeyCode::Char(c) => input.buffer.push(c),
                    _ => {}
                }
            }
        }
    }

    fn submit_input(&mut self, input: InputState) {
        let name = input.buffer.trim().to_string();
        match input.target {
            InputTarget::Partner => match self.store.add_partner(&name) {
                Ok(_) => {
                    let last = self.store.state().doubles_entries.len().saturating_sub(1);
                    self.partners_state.select(Some(last));
                    self.status = Some(format!("Added {}", name));
                }
                Err(e) => self.status = Some(e.to_string()),
            },
            InputTarget::Favorite => {
                if name.is_empty() {
                    self.status = Some("Favorite name cannot be empty".to_string());
                } else if self.store.state().is_favorite(&name) {
                    self.status = Some(format!("{} is already a favorite", name));
                } else {
                    self.store.toggle_favorite(&name);
                    self.status = Some(format!("Added {} to favorites", name));
                }
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.set_page(self.current_page.previous())
            }
            KeyCode::Tab => self.set_page(self.current_page.next()),
            KeyCode::BackTab => self.set_page(self.current_page.previous()),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            _ => match self.current_page {
                Page::Calculator => self.handle_calculator_key(key),
                Page::Partners => self.handle_partners_key(key),
                Page::Favorites => self.handle_favorites_key(key),
            },
        }
    }

    fn handle_calculator_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.store.set_bowler_type(BowlerType::Regular),
            KeyCode::Char('s') => self.store.set_bowler_type(BowlerType::Sub),
            KeyCode::Char('1') => self.store.toggle_side_pot(SidePotKey::Scratch),
            KeyCode::Char('2') => self.store.toggle_side_pot(SidePotKey::Handicap),
            KeyCode::Char('3') => self.store.toggle_side_pot(SidePotKey::OptionalSideHandicap),
            KeyCode::Char('n') => self.store.request_confirmation(ConfirmAction::ResetSession),
            _ => {}
        }
    }

    fn handle_partners_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.open_input(InputTarget::Partner),
            KeyCode::Char('n') => self.store.request_confirmation(ConfirmAction::ResetSession),
            _ => {}
        }

        let Some(id) = self.selected_partner_id() else {
            return;
        };
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let next = self
                    .store
                    .state()
                    .entry(&id)
                    .map(|entry| entry.money_transfer.next())
                    .unwrap_or_default();
                self.store.update_partner_money_state(&id, next);
            }
            KeyCode::Char('0') => self.store.update_partner_money_state(&id, MoneyTransfer::NoMoneyYet),
            KeyCode::Char('1') => self.store.update_partner_money_state(&id, MoneyTransfer::IGave),
            KeyCode::Char('2') => self.store.update_partner_money_state(&id, MoneyTransfer::TheyGaveMe),
            KeyCode::Char('d') | KeyCode::Delete => self.store.remove_partner(&id),
            KeyCode::Char('f') => {
                let name = self
                    .store
                    .state()
                    .entry(&id)
                    .map(|entry| entry.partner_name.clone());
                if let Some(name) = name {
                    let favorite = self.store.toggle_favorite(&name);
                    self.status = Some(if favorite {
                        format!("Added {} to favorites", name)
                    } else {
                        format!("Removed {} from favorites and partners", name)
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_favorites_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.open_input(InputTarget::Favorite),
            KeyCode::Char('x') if !self.store.state().favorites.is_empty() => {
                self.store.request_confirmation(ConfirmAction::ClearFavorites)
            }
            KeyCode::Char('f') | KeyCode::Char('d') | KeyCode::Enter => {
                if let Some(name) = self.selected_favorite() {
                    self.store.toggle_favorite(&name);
                    self.status = Some(format!("Removed {} from favorites and partners", name));
                }
            }
            _ => {}
        }
    }

    fn open_input(&mut self, target: InputTarget) {
        self.input = Some(InputState {
            target,
            buffer: String::new(),
        });
        self.status = None;
    }
}

/// Keep a cursor inside a list of `len` rows
fn clamp(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (Some(i), len) => Some(i.min(len - 1)),
        (None, _) => Some(0),
    }
}

/// Wrapping cursor movement
fn step(selected: Option<usize>, len: usize, down: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let i = match selected {
        Some(i) if down => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    Some(i)
}

/// Label/amount rows of the totals card
pub fn totals_lines(totals: &TotalsBreakdown, pricing: &PricingTable) -> Vec<(String, String)> {
    vec![
        ("Lineage".to_string(), format_currency(totals.lineage_fee)),
        ("Side pots".to_string(), format_currency(totals.side_pot_fee)),
        (
            format!(
                "Doubles you pay ({} × {})",
                totals.partners_who_paid_me_count,
                format_currency(pricing.doubles_team_cost)
            ),
            format_currency(totals.amount_owed_to_captain_for_doubles),
        ),
        (
            "Total to team captain".to_string(),
            format_currency(totals.total_owed_to_captain),
        ),
        (
            format!(
                "Money given to partners ({} × {})",
                totals.partners_i_paid_count,
                format_currency(pricing.doubles_partner_payment)
            ),
            format_currency(totals.amount_paid_to_partners_direct),
        ),
        (
            format!(
                "Money given to me ({} × {})",
                totals.partners_who_paid_me_count,
                format_currency(pricing.doubles_partner_payment)
            ),
            format!("-{}", format_currency(totals.amount_received_from_partners_direct)),
        ),
        ("Overall total".to_string(), format_currency(totals.grand_total)),
    ]
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui<S: DocumentStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("terminal loop failed: {}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: DocumentStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui<S: DocumentStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Page
            Constraint::Percentage(40), // Totals
        ])
        .split(chunks[1]);

    match app.current_page {
        Page::Calculator => render_calculator(f, content_chunks[0], app),
        Page::Partners => render_partners(f, content_chunks[0], app),
        Page::Favorites => render_favorites(f, content_chunks[0], app),
    }
    render_totals(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);

    if app.input.is_some() {
        render_input_popup(f, app);
    }
    if let Some(action) = app.store.pending_confirmation() {
        render_confirm_popup(f, action);
    }
}

fn render_header<S: DocumentStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut tab_spans = vec![Span::styled(
        " 🎳 Bowling League Money  ",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn choice_line(selected: bool, key: &str, label: &str, amount: String) -> Line<'static> {
    let marker = if selected { "[x]" } else { "[ ]" };
    let style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(key.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(format!("{} {:<24}", marker, label), style),
        Span::styled(amount, style),
    ])
}

fn render_calculator<S: DocumentStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let state = app.store.state();
    let pricing = app.store.pricing();
    let totals = app.store.totals();

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut content = vec![Line::from(""), Line::from(Span::styled("  LINEAGE", heading))];

    for (key, tier) in ["r", "s"].into_iter().zip(BowlerType::ALL) {
        content.push(choice_line(
            state.bowler_type == tier,
            key,
            tier.label(),
            format_currency(pricing.lineage_fee(tier)),
        ));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled("  SIDE POTS", heading)));
    for (i, key) in SidePotKey::ALL.iter().enumerate() {
        content.push(choice_line(
            state.side_pots.get(*key),
            &(i + 1).to_string(),
            key.label(),
            format_currency(pricing.side_pot_fee(*key)),
        ));
    }
    content.push(Line::from(vec![
        Span::raw("      Subtotal: "),
        Span::styled(
            format_currency(totals.side_pot_fee),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Lineage & Side Pots "),
    );

    f.render_widget(paragraph, area);
}

fn render_partners<S: DocumentStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let header_cells = ["Partner", "Money Exchanged", "Team Cost"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let state = app.store.snapshot();
    let pricing = app.store.pricing();

    let rows = state.doubles_entries.iter().map(|entry| {
        let star = if state.is_favorite(&entry.partner_name) { "★ " } else { "  " };
        let color = match entry.money_transfer {
            MoneyTransfer::NoMoneyYet => Color::White,
            MoneyTransfer::IGave => Color::Red,
            MoneyTransfer::TheyGaveMe => Color::Green,
        };

        let cells = vec![
            Cell::from(format!("{}{}", star, truncate(&entry.partner_name, 24))),
            Cell::from(entry.money_transfer.label()).style(Style::default().fg(color)),
            Cell::from(format_currency(pricing.team_cost(entry))),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(28),
            Constraint::Length(16),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Handicap Doubles "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.partners_state);
}

fn render_favorites<S: DocumentStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let state = app.store.snapshot();

    let items: Vec<ListItem> = state
        .favorites
        .iter()
        .map(|name| {
            let present = state.has_partner_named(name);
            let note = if present { "" } else { "  (removed this week)" };
            ListItem::new(Line::from(vec![
                Span::styled("★ ", Style::default().fg(Color::Yellow)),
                Span::raw(name.clone()),
                Span::styled(note, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Usual Partners "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.favorites_state);
}

fn render_totals<S: DocumentStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let totals = app.store.totals();
    let lines = totals_lines(&totals, app.store.pricing());

    let mut content = vec![Line::from("")];
    for (i, (label, amount)) in lines.into_iter().enumerate() {
        let style = match i {
            3 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            6 => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::White),
        };
        if i == 4 || i == 6 {
            content.push(Line::from("  ─────────────────────────────"));
        }
        content.push(Line::from(vec![
            Span::styled(format!("  {}: ", label), style),
            Span::styled(amount, style),
        ]));
    }

    let paragraph = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Totals "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar<S: DocumentStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut status_spans = vec![];

    if let Some(status) = &app.status {
        status_spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw("|"));
    }

    let hints: &[(&str, &str)] = match app.current_page {
        Page::Calculator => &[("r/s", "Tier"), ("1-3", "Side pots"), ("n", "New week")],
        Page::Partners => &[
            ("a", "Add"),
            ("Enter", "Money"),
            ("d", "Delete"),
            ("f", "Favorite"),
            ("n", "New week"),
        ],
        Page::Favorites => &[("a", "Add"), ("f", "Unfavorite"), ("x", "Clear all")],
    };

    for (key, label) in hints {
        status_spans.push(Span::raw(" "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {} |", label)));
    }
    status_spans.push(Span::styled(" Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_input_popup<S: DocumentStore>(f: &mut Frame, app: &App<S>) {
    let Some(input) = &app.input else {
        return;
    };
    let title = match input.target {
        InputTarget::Partner => " Add Partner ",
        InputTarget::Favorite => " Add Favorite ",
    };

    let mut content = vec![
        Line::from(vec![
            Span::styled("  Name: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(input.buffer.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];
    for name in app.suggestions().into_iter().take(6) {
        content.push(Line::from(Span::styled(
            format!("    {}", name),
            Style::default().fg(Color::DarkGray),
        )));
    }
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Enter add | Tab complete | Esc cancel",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let area = centered_rect(50, 14, f.size());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title),
        ),
        area,
    );
}

fn render_confirm_popup(f: &mut Frame, action: ConfirmAction) {
    let content = vec![
        Line::from(""),
        Line::from(format!("  {}", action.prompt())),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" confirm   "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ];

    let area = centered_rect(60, 8, f.size());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Are you sure? "),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let width = r.width * percent_x / 100;
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
