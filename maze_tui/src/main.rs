use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_core::{
    Command, Direction, Theme,
    agent::{Agent, Explorer, RandomWalker},
    builder::StandardMazeBuilder,
    creator::{DangerousCreator, StandardCreator},
    factory::{FancyFactory, StandardFactory},
    game::{Game, RoomView, SideView, Strategy},
    layout::Layout as MazeLayout,
};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, Stdout, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// How many log lines the message panel keeps.
const LOG_CAPACITY: usize = 200;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Construction strategy used to build the maze
    #[arg(short, long, value_enum, default_value_t = StrategyKind::Standard)]
    strategy: StrategyKind,

    /// Layout file to build with the strategy's builder family
    #[arg(short, long, value_name = "LAYOUT_FILE")]
    layout: Option<PathBuf>,

    /// Run commands from a file ('-' for stdin) instead of the TUI
    #[arg(long, value_name = "SCRIPT_FILE")]
    script: Option<PathBuf>,

    /// Let an agent drive from the start
    #[arg(long)]
    autoplay: bool,

    /// Agent used when autoplay is on
    #[arg(long, value_enum, default_value_t = AgentKind::Explorer)]
    agent: AgentKind,

    /// Seed for the random agent
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    Standard,
    Fancy,
    Builder,
    FancyBuilder,
    Creator,
    Dangerous,
}

impl StrategyKind {
    fn theme(self) -> Theme {
        match self {
            StrategyKind::Fancy | StrategyKind::FancyBuilder => Theme::Fancy,
            StrategyKind::Dangerous => Theme::Dangerous,
            _ => Theme::Standard,
        }
    }

    /// Builds the strategy. A layout always goes through a builder of the
    /// kind's theme.
    fn into_strategy(self, layout: Option<MazeLayout>) -> Strategy {
        if let Some(layout) = layout {
            return Strategy::Layout {
                builder: Box::new(StandardMazeBuilder::themed(self.theme())),
                layout,
            };
        }
        match self {
            StrategyKind::Standard => Strategy::Factory(Box::new(StandardFactory)),
            StrategyKind::Fancy => Strategy::Factory(Box::new(FancyFactory)),
            StrategyKind::Builder => Strategy::Builder(Box::new(StandardMazeBuilder::new())),
            StrategyKind::FancyBuilder => {
                Strategy::Builder(Box::new(StandardMazeBuilder::themed(Theme::Fancy)))
            }
            StrategyKind::Creator => Strategy::Creator(Box::new(StandardCreator)),
            StrategyKind::Dangerous => Strategy::Creator(Box::new(DangerousCreator)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Explorer,
    Random,
}

impl AgentKind {
    fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Explorer => Box::new(Explorer::new()),
            AgentKind::Random => Box::new(RandomWalker::new(seed)),
        }
    }
}

struct App {
    /// The traversal controller.
    game: Game,
    /// Agent used while autoplay is on.
    agent: Box<dyn Agent>,
    autoplay: bool,
    /// Set after 'o': the next direction key opens instead of moving.
    pending_open: bool,
    /// Notifications, oldest first.
    log: Vec<String>,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(game: Game, agent: Box<dyn Agent>, autoplay: bool) -> Result<Self> {
        let mut app = App {
            game,
            agent,
            autoplay,
            pending_open: false,
            log: Vec::new(),
            should_quit: false,
        };
        app.apply(Command::Look)?;
        Ok(app)
    }

    fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > LOG_CAPACITY {
            let excess = self.log.len() - LOG_CAPACITY;
            self.log.drain(..excess);
        }
    }

    /// Runs one command and records its notification.
    fn apply(&mut self, command: Command) -> Result<()> {
        let heading = match command {
            Command::Look => "--- looking around".to_string(),
            Command::Move(direction) => format!("--- trying to go {direction}"),
            Command::Open(direction) => format!("--- trying to open {direction}"),
        };
        self.push_log(heading);
        let event = self.game.execute(command)?;
        for line in event.to_string().lines() {
            self.push_log(line.to_string());
        }
        Ok(())
    }

    fn direction_key(&mut self, direction: Direction) -> Result<()> {
        let command = if self.pending_open {
            Command::Open(direction)
        } else {
            Command::Move(direction)
        };
        self.pending_open = false;
        self.apply(command)
    }

    /// Handles one step of autoplay.
    fn tick(&mut self) -> Result<()> {
        if !self.autoplay {
            return Ok(());
        }
        let view = self.game.view()?;
        let command = self.agent.next_command(&view);
        self.apply(command)
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Up | KeyCode::Char('k') => self.direction_key(Direction::North)?,
            KeyCode::Right | KeyCode::Char('l') => self.direction_key(Direction::East)?,
            KeyCode::Down | KeyCode::Char('j') => self.direction_key(Direction::South)?,
            KeyCode::Left | KeyCode::Char('h') => self.direction_key(Direction::West)?,
            KeyCode::Char('o') => self.pending_open = true,
            KeyCode::Char(' ') => self.apply(Command::Look)?,
            KeyCode::Char('a') => self.autoplay = !self.autoplay,
            _ => {}
        }
        Ok(())
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.script.is_some())?;

    let layout = match &args.layout {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout file {}", path.display()))?;
            let layout: MazeLayout = source
                .parse()
                .with_context(|| format!("Invalid layout file {}", path.display()))?;
            Some(layout)
        }
        None => None,
    };

    let mut game =
        Game::create(args.strategy.into_strategy(layout)).context("Failed to build the maze")?;
    tracing::info!(strategy = ?args.strategy, start = game.current_room(), "game ready");

    if let Some(script) = &args.script {
        let source = if script.as_os_str() == "-" {
            io::read_to_string(io::stdin()).context("Failed to read script from stdin")?
        } else {
            std::fs::read_to_string(script)
                .with_context(|| format!("Failed to read script file {}", script.display()))?
        };
        return run_script(&mut game, &source, &mut io::stdout().lock());
    }

    // Create the application state
    let mut app = App::new(game, args.agent.build(args.seed), args.autoplay)?;

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Run the main application loop, restoring the terminal even on failure
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    result
}

/// Installs the tracing subscriber.
///
/// Logs go to `log_file` when given. Without one they go to stderr in
/// script mode and are dropped in the TUI, where stderr would tear the
/// alternate screen.
fn init_logging(log_file: Option<&Path>, script_mode: bool) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if script_mode => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Executes one command per line, writing each notification to `out`.
/// Blank lines and lines starting with '#' are skipped.
fn run_script(game: &mut Game, source: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", game.get_current_room()?)?;
    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = line
            .parse()
            .with_context(|| format!("Invalid command on line {}: '{}'", index + 1, line))?;
        writeln!(out, "--- {line}")?;
        let event = game.execute(command)?;
        writeln!(out, "{event}")?;
    }
    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(400); // Autoplay rate
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code)?;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick()?;
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Room and maze overview
            Constraint::Percentage(45), // Message log
            Constraint::Percentage(10), // Help
        ])
        .split(frame.area());

    let top = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_layout[0]);

    match app.game.view() {
        Ok(view) => render_room(frame, top[0], &view),
        Err(error) => frame.render_widget(
            Paragraph::new(error.to_string()).block(Block::default().borders(Borders::ALL)),
            top[0],
        ),
    }
    render_overview(frame, top[1], &app.game);
    render_log(frame, main_layout[1], &app.log);

    let mode = match (app.autoplay, app.pending_open) {
        (true, _) => "AUTOPLAY",
        (false, true) => "OPEN which side?",
        (false, false) => "MOVE",
    };
    let help_text = Paragraph::new(format!(
        "[{mode}] arrows/hjkl: move  o+arrow: open  space: look  a: autoplay  q/Esc: quit"
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

fn theme_style(theme: Theme) -> Style {
    match theme {
        Theme::Standard => Style::default().fg(Color::DarkGray),
        Theme::Fancy => Style::default().fg(Color::Magenta),
        Theme::Dangerous => Style::default().fg(Color::Red),
    }
}

fn side_span(side: SideView) -> Span<'static> {
    match side {
        SideView::Wall(theme) => Span::styled("#####", theme_style(theme)),
        SideView::ClosedDoor => Span::styled("[ | ]", Style::default().fg(Color::Yellow)),
        SideView::OpenDoor { leads_to } => Span::styled(
            format!("[ {leads_to} ]"),
            Style::default().fg(Color::Green),
        ),
        SideView::Room(room) => {
            Span::styled(format!("( {room} )"), Style::default().fg(Color::Cyan))
        }
    }
}

/// Draws the current room with its four sides.
fn render_room(frame: &mut Frame, area: Rect, view: &RoomView) {
    let center = Span::styled(
        format!("   room {}   ", view.room),
        theme_style(view.theme).bold(),
    );
    let lines = vec![
        Line::from(side_span(view.side(Direction::North))),
        Line::from(""),
        Line::from(vec![
            side_span(view.side(Direction::West)),
            center,
            side_span(view.side(Direction::East)),
        ]),
        Line::from(""),
        Line::from(side_span(view.side(Direction::South))),
    ];
    let room_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Current Room").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(room_paragraph, area);
}

/// Lists every room and door of the maze.
fn render_overview(frame: &mut Frame, area: Rect, game: &Game) {
    let maze = game.maze();
    let mut items: Vec<ListItem> = maze
        .room_ids()
        .into_iter()
        .map(|id| {
            let marker = if id == game.current_room() { "@" } else { " " };
            ListItem::new(format!("{marker} room {id}"))
        })
        .collect();
    items.extend(maze.doors().map(|(id, door)| {
        let (a, b) = door.rooms();
        let state = if door.is_open() { "open" } else { "closed" };
        ListItem::new(format!("  door {id}: {a} <-> {b} ({state})"))
    }));

    let overview =
        List::new(items).block(Block::default().borders(Borders::ALL).title("Maze"));
    frame.render_widget(overview, area);
}

/// Shows the newest notifications that fit.
fn render_log(frame: &mut Frame, area: Rect, log: &[String]) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = log.len().saturating_sub(visible);
    let lines: Vec<Line> = log[start..]
        .iter()
        .map(|line| {
            if line.starts_with("---") {
                Line::styled(line.as_str(), Style::default().fg(Color::Cyan))
            } else {
                Line::from(line.as_str())
            }
        })
        .collect();
    let log_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Messages"));
    frame.render_widget(log_widget, area);
}
