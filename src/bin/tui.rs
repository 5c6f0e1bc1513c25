//! Boarding TUI - interactive viewer for the boarding simulation
//!
//! Draws the cabin with the aisle in the middle and colors aisle passengers
//! by status. The configured policy picks rows; the user drives the clock:
//! - space / enter: show the next tick (asks the policy for a row when
//!   every tick of the previous action has been shown)
//! - a: toggle autoplay at `render_fps`
//! - r: new episode
//! - q / Esc: quit

use boarding_sim::domain::{CabinRow, Passenger, PassengerStatus};
use boarding_sim::infra::{Config, EpisodeSummary};
use boarding_sim::services::{
    BoardingEnv, BoardingPolicy, BoardingSnapshot, FrameRecorder, PolicyKind, TickFrame,
};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Boarding TUI - step through a boarding episode
#[derive(Parser, Debug)]
#[command(name = "boarding-tui", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE or config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    seats_per_row: Option<usize>,

    #[arg(short, long, value_enum)]
    policy: Option<PolicyKind>,

    #[arg(long)]
    seed: Option<u64>,

    /// Autoplay frame rate
    #[arg(long)]
    fps: Option<u32>,
}

const SEAT_EMPTY: Color = Color::DarkGray;
const SEAT_OCCUPIED: Color = Color::Blue;

fn status_color(status: PassengerStatus) -> Color {
    match status {
        PassengerStatus::Moving => Color::Green,
        PassengerStatus::Stalled => Color::Red,
        PassengerStatus::Stowing => Color::Yellow,
        PassengerStatus::Seated => SEAT_OCCUPIED,
    }
}

struct App {
    env: BoardingEnv,
    policy: Box<dyn BoardingPolicy>,
    /// Ticks run by the env but not yet shown
    recorder: FrameRecorder,
    /// Tick on screen; `None` right after a reset
    current: Option<TickFrame>,
    autoplay: bool,
    frame: Duration,
    last_action: Option<usize>,
    shown_reward: i64,
    last_summary: Option<EpisodeSummary>,
    error: Option<String>,
}

impl App {
    fn new(config: &Config, fps: u32) -> anyhow::Result<Self> {
        let mut env = BoardingEnv::from_config(config)?;
        env.reset();
        Ok(Self {
            env,
            policy: config.policy().build(config.seed()),
            recorder: FrameRecorder::new(),
            current: None,
            autoplay: false,
            frame: Duration::from_millis(1000 / u64::from(fps.max(1))),
            last_action: None,
            shown_reward: 0,
            last_summary: None,
            error: None,
        })
    }

    /// State on screen: the frame being replayed, or the live simulation
    fn view(&self) -> BoardingSnapshot<'_> {
        match &self.current {
            Some(frame) => frame.snapshot(),
            None => self.env.simulation().snapshot(),
        }
    }

    fn finished(&self) -> bool {
        self.env.is_terminated() && self.recorder.is_empty()
    }

    /// Show the next recorded tick, running a new action when none is queued
    fn advance(&mut self) {
        if self.recorder.is_empty() {
            self.act();
        }
        if let Some(frame) = self.recorder.pop_front() {
            self.shown_reward += frame.report.reward;
            self.current = Some(frame);
        }
        if self.finished() {
            self.autoplay = false;
        }
    }

    fn act(&mut self) {
        if self.env.is_terminated() {
            return;
        }
        let Some(row) = self.policy.choose(&self.env.action_mask()) else {
            return;
        };
        match self.env.step_observed(row, &mut self.recorder) {
            Ok(result) => {
                self.last_action = Some(row);
                if result.terminated {
                    self.last_summary =
                        Some(self.env.stats().summary(self.env.episode(), self.policy.name()));
                }
            }
            Err(e) => {
                self.autoplay = false;
                self.error = Some(e.to_string());
            }
        }
    }

    fn reset(&mut self) {
        self.env.reset();
        self.recorder.clear();
        self.current = None;
        self.last_action = None;
        self.shown_reward = 0;
        self.last_summary = None;
        self.error = None;
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(|| Config::resolve_config_path(&[]));
    let mut config = Config::load_from_path(&config_path);
    if args.rows.is_some() || args.seats_per_row.is_some() {
        let rows = args.rows.unwrap_or(config.rows());
        let seats_per_row = args.seats_per_row.unwrap_or(config.seats_per_row());
        config = config.with_cabin(rows, seats_per_row);
    }
    if let Some(policy) = args.policy {
        config = config.with_policy(policy);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    let mut app = App::new(&config, args.fps.unwrap_or(config.render_fps()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let poll_rate = Duration::from_millis(50);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char(' ') | KeyCode::Enter => app.advance(),
                        KeyCode::Char('a') => {
                            app.autoplay = !app.autoplay && !app.finished();
                            last_frame = Instant::now();
                        }
                        KeyCode::Char('r') => app.reset(),
                        _ => {}
                    }
                }
            }
        }

        if app.autoplay && last_frame.elapsed() >= app.frame {
            app.advance();
            last_frame = Instant::now();
        }
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Cabin + side panels
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Keys
        ])
        .split(f.area());

    draw_header(f, main_chunks[0], app);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);

    draw_cabin(f, body_chunks[0], app);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35), // Line entering plane
            Constraint::Percentage(40), // Lobby
            Constraint::Min(7),         // Legend
        ])
        .split(body_chunks[1]);

    draw_queue(f, side_chunks[0], app);
    draw_lobby(f, side_chunks[1], app);
    draw_legend(f, side_chunks[2]);
    draw_progress(f, main_chunks[2], app);
    draw_keys(f, main_chunks[3], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let tick_reward = app.current.as_ref().map_or(0, |frame| frame.report.reward);
    let (state_text, state_color) = if app.finished() {
        ("FINISHED", Color::Magenta)
    } else if app.autoplay {
        ("AUTOPLAY", Color::Green)
    } else {
        ("PAUSED", Color::Yellow)
    };
    let action = app.last_action.map(|row| format!("row {}", row)).unwrap_or_else(|| "-".into());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Boarding ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(state_text, Style::default().fg(state_color)),
        Span::raw(format!(
            " | ep {} | tick {} | policy {} | last {} | tick reward {:+} | reward {} | lobby {} aisle {} seated {}",
            app.env.episode(),
            view.tick,
            app.policy.name(),
            action,
            tick_reward,
            app.shown_reward,
            view.in_lobby(),
            view.in_aisle(),
            view.seated(),
        )),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn seat_span(row: &CabinRow, index: usize) -> Span<'static> {
    let seat = &row.seats()[index];
    let color = if seat.is_occupied() { SEAT_OCCUPIED } else { SEAT_EMPTY };
    Span::styled(format!("S{:02} ", seat.number().0), Style::default().fg(color))
}

fn aisle_span(passenger: Option<&Passenger>) -> Span<'static> {
    match passenger {
        Some(p) => Span::styled(
            format!(" {} ", p.label()),
            Style::default().fg(Color::Black).bg(status_color(p.status)),
        ),
        None => Span::styled("  :  ", Style::default().fg(Color::DarkGray)),
    }
}

fn draw_cabin(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let slots = view.aisle.slots();
    let left = view.cabin.seats_per_row() / 2;

    let lines: Vec<Line> = view
        .cabin
        .rows()
        .iter()
        .map(|row| {
            let mut spans: Vec<Span> = (0..left).map(|i| seat_span(row, i)).collect();
            spans.push(aisle_span(slots.get(row.index()).and_then(Option::as_ref)));
            spans.push(Span::raw(" "));
            spans.extend((left..row.seats().len()).map(|i| seat_span(row, i)));
            Line::from(spans)
        })
        .collect();

    let cabin = Paragraph::new(lines).block(
        Block::default()
            .title(" Cabin ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(cabin, area);
}

fn draw_queue(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let items: Vec<ListItem> = view
        .aisle
        .waiting_outside()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", p.label())),
                Span::styled(p.status.as_str(), Style::default().fg(status_color(p.status))),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Line entering plane ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}

fn draw_lobby(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let items: Vec<ListItem> = view
        .lobby
        .rows()
        .iter()
        .map(|row| {
            let labels: Vec<String> = row.passengers().iter().map(|p| p.label()).collect();
            let marker_color = if row.is_empty() { Color::DarkGray } else { Color::Green };
            let highlight = if app.last_action == Some(row.row()) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("R{:02} ", row.row()), Style::default().fg(marker_color)),
                Span::styled(labels.join(" "), highlight),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Lobby ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(list, area);
}

fn draw_legend(f: &mut Frame, area: Rect) {
    let entries = [
        (status_color(PassengerStatus::Moving), "Passenger: Moving"),
        (status_color(PassengerStatus::Stalled), "Passenger: Stalled"),
        (status_color(PassengerStatus::Stowing), "Passenger: Stowing Luggage"),
        (SEAT_EMPTY, "Seat: Empty"),
        (SEAT_OCCUPIED, "Seat: Occupied"),
    ];
    let items: Vec<ListItem> = entries
        .iter()
        .map(|(color, text)| {
            ListItem::new(Line::from(vec![
                Span::styled("   ", Style::default().bg(*color)),
                Span::raw(format!(" {}", text)),
            ]))
        })
        .collect();

    let legend = List::new(items).block(Block::default().title(" Legend ").borders(Borders::ALL));
    f.render_widget(legend, area);
}

fn draw_progress(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let total = view.cabin.total_seats().max(1);
    let ratio = view.seated() as f64 / total as f64;

    let label = match &app.last_summary {
        Some(summary) if app.finished() => format!(
            "{}/{} seated | {} ticks | reward {} | stall ratio {:.2}",
            summary.seated, total, summary.ticks, summary.total_reward, summary.stall_ratio
        ),
        _ => format!("{}/{} seated", view.seated(), total),
    };

    let gauge = Gauge::default()
        .block(Block::default().title(" Seated ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "space/enter step | a autoplay | r reset | q quit",
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(error) = &app.error {
        spans.push(Span::styled(format!("  {}", error), Style::default().fg(Color::Red)));
    }
    let keys = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(keys, area);
}
