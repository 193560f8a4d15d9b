use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph, TableState};
use ratatui::{Frame, Terminal};

use tokio::sync::mpsc;

use crate::application::services::registry::ProbeRegistry;
use crate::application::services::scheduler::{SchedulerCommand, SchedulerObserver};
use crate::domain::entities::target::Target;
use crate::domain::ports::store::TargetStore;
use crate::presentation::tui::event::ActivePanel;
use crate::presentation::tui::logs::LogBuffer;
use crate::presentation::tui::widgets::add_form::{render_add_form, AddForm};
use crate::presentation::tui::widgets::target_grid::render_target_grid;

const LOG_PANEL_HEIGHT: u16 = 10;

struct App {
    store: Arc<dyn TargetStore>,
    registry: Arc<ProbeRegistry>,
    observer: SchedulerObserver,
    commands: mpsc::UnboundedSender<SchedulerCommand>,
    logs: LogBuffer,

    targets: Vec<Target>,
    active_panel: ActivePanel,
    table_state: TableState,
    form: Option<AddForm>,

    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    fn new(
        store: Arc<dyn TargetStore>,
        registry: Arc<ProbeRegistry>,
        observer: SchedulerObserver,
        commands: mpsc::UnboundedSender<SchedulerCommand>,
        logs: LogBuffer,
    ) -> Self {
        Self {
            store,
            registry,
            observer,
            commands,
            logs,
            targets: Vec::new(),
            active_panel: ActivePanel::default(),
            table_state: TableState::default(),
            form: None,
            should_quit: false,
            tick_rate: Duration::from_millis(250),
        }
    }

    fn refresh_data(&mut self) {
        match self.store.snapshot() {
            Ok(targets) => self.targets = targets,
            Err(e) => tracing::warn!("could not read target list: {e}"),
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let count = self.targets.len();
        if let Some(sel) = self.table_state.selected() {
            if count == 0 {
                self.table_state.select(None);
            } else if sel >= count {
                self.table_state.select(Some(count - 1));
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.form.is_some() {
            self.handle_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') => self.form = Some(AddForm::default()),
            KeyCode::Char('c') => self.trigger_check(),
            KeyCode::Char('r') => {
                if let Err(e) = self.store.reload() {
                    tracing::warn!("reload failed: {e}");
                }
                self.refresh_data();
            }
            KeyCode::Tab => self.active_panel = self.active_panel.next(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab => form.focused = form.focused.toggle(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => form.input(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        if !form.is_complete() {
            tracing::warn!("address and probe are both required");
            return;
        }

        let address = form.address.trim().to_string();
        let probe = form.probe.trim().to_string();
        if self.registry.find(&probe).is_none() {
            tracing::warn!("probe '{probe}' is not loaded, target will fail its checks");
        }

        match self.store.append(Target::new(address.clone(), probe)) {
            Ok(()) => {
                tracing::info!("added target '{address}'");
                self.form = None;
                self.refresh_data();
                self.trigger_check();
            }
            Err(e) => tracing::warn!("could not save target: {e}"),
        }
    }

    fn trigger_check(&self) {
        if self.commands.send(SchedulerCommand::CheckNow).is_err() {
            tracing::warn!("scheduler is no longer running");
        }
    }

    fn scroll_down(&mut self) {
        if self.active_panel != ActivePanel::Targets {
            return;
        }
        let count = self.targets.len();
        if count > 0 {
            let i = self
                .table_state
                .selected()
                .map_or(0, |i| if i >= count - 1 { 0 } else { i + 1 });
            self.table_state.select(Some(i));
        }
    }

    fn scroll_up(&mut self) {
        if self.active_panel != ActivePanel::Targets {
            return;
        }
        let count = self.targets.len();
        if count > 0 {
            let i = self
                .table_state
                .selected()
                .map_or(count - 1, |i| if i == 0 { count - 1 } else { i - 1 });
            self.table_state.select(Some(i));
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let [header_area, gauge_area, grid_area, log_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(LOG_PANEL_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header_area);
        self.render_gauge(frame, gauge_area);
        render_target_grid(
            frame,
            &self.targets,
            &mut self.table_state,
            self.active_panel == ActivePanel::Targets && self.form.is_none(),
            grid_area,
        );
        self.render_logs(frame, log_area);
        self.render_status_bar(frame, status_area);

        if let Some(ref form) = self.form {
            render_add_form(frame, form, &self.registry.names(), area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let up = self
            .targets
            .iter()
            .filter(|t| t.last_status.as_ref().is_some_and(|s| s.success))
            .count();

        let header = Line::from(vec![
            Span::styled(
                " LOOKOUT ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("│ "),
            Span::styled(
                format!("[{}]", self.active_panel),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" │ "),
            Span::styled(
                format!("{up}/{} up", self.targets.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_gauge(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let gauge = if self.observer.is_running() {
            let total = self.observer.targets_total().max(1);
            let done = self.observer.targets_done().min(total);
            #[allow(clippy::cast_precision_loss)]
            let ratio = done as f64 / total as f64;
            Gauge::default()
                .block(block.title("Checking"))
                .gauge_style(Style::default().fg(Color::Yellow))
                .ratio(ratio)
                .label(format!("{done}/{total}"))
        } else {
            let left = self.observer.seconds_until_next_check();
            Gauge::default()
                .block(block.title("Next check"))
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(0.0)
                .label(format!("in {left}s"))
        };

        frame.render_widget(gauge, area);
    }

    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let border_color = if self.active_panel == ActivePanel::Logs {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title("Logs")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        // Show the newest lines that fit in the panel.
        let visible = area.height.saturating_sub(2) as usize;
        let lines = self.logs.lines();
        let items: Vec<ListItem<'_>> = lines
            .iter()
            .rev()
            .take(visible)
            .rev()
            .map(|line| {
                ListItem::new(Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(Color::Gray),
                )))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    #[allow(clippy::unused_self)]
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let bar = Line::from(vec![
            Span::styled(" q", key_style),
            Span::raw(":quit "),
            Span::styled("a", key_style),
            Span::raw(":add "),
            Span::styled("c", key_style),
            Span::raw(":check now "),
            Span::styled("r", key_style),
            Span::raw(":reload "),
            Span::styled("Tab", key_style),
            Span::raw(":panel "),
            Span::styled("j/k", key_style),
            Span::raw(":nav"),
        ]);

        frame.render_widget(
            Paragraph::new(bar).style(Style::default().bg(Color::DarkGray)),
            area,
        );
    }
}

/// Restore the terminal to its normal state.
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        eprintln!("Failed to disable raw mode: {e}");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        eprintln!("Failed to leave alternate screen: {e}");
    }
}

/// Launch the interactive dashboard.
///
/// Runs on the calling thread until the user quits; the scheduler keeps
/// running on the async runtime and is observed through `observer`.
///
/// # Errors
///
/// Returns an error if terminal setup, rendering, or event handling fails.
pub fn run_tui(
    store: Arc<dyn TargetStore>,
    registry: Arc<ProbeRegistry>,
    observer: SchedulerObserver,
    commands: mpsc::UnboundedSender<SchedulerCommand>,
    logs: LogBuffer,
) -> anyhow::Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        // Raw mode was enabled but alternate screen failed — restore before returning
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    // Install panic hook so terminal is restored even on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(store, registry, observer, commands, logs);
    app.refresh_data();

    let result = run_app_loop(&mut terminal, &mut app);

    // Restore terminal on normal exit
    restore_terminal();
    let _ = terminal.show_cursor();

    // Restore the default panic hook
    let _ = std::panic::take_hook();

    result
}

fn run_app_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        let timeout = app.tick_rate.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            app.refresh_data();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
