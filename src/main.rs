mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use unscramble::{
    catalog::WordCatalog,
    game::{GameSession, UserMessage},
    language::Language,
    ranking::{GameRecord, RankingDb},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    settings::{Difficulty, FileSettingsStore, Settings, SettingsStore},
};

const TICK_RATE_MS: u64 = 250;

/// terminal word-unscrambling game with persistent local rankings
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Unscramble the word on screen before the queue runs out. \
Correct guesses score points; finished games are ranked against your \
previous sessions."
)]
pub struct Cli {
    /// word-list language for this run (overrides saved settings)
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// difficulty for this run (overrides saved settings)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// print the ranking of past games and exit
    #[clap(long)]
    ranking: bool,

    /// delete all recorded games and exit
    #[clap(long)]
    clear_ranking: bool,
}

/// Which screen currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Game,
    GameOver,
    Settings,
    Ranking,
}

#[derive(Debug)]
pub struct App {
    pub session: GameSession,
    pub settings: Settings,
    pub store: FileSettingsStore,
    pub catalog: WordCatalog,
    pub ranking_db: RankingDb,
    pub screen: Screen,
    /// The guess being typed on the game screen.
    pub guess: String,
    /// The player name being typed on the game-over screen.
    pub name_input: String,
    /// Settings being edited on the settings screen; applied on save only.
    pub pending: Settings,
    /// Cached rows for the ranking screen.
    pub ranking_rows: Vec<GameRecord>,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let store = FileSettingsStore::new();
        let (mut settings, settings_error) = match store.load() {
            Ok(settings) => (settings, false),
            Err(_) => (Settings::default(), true),
        };
        if let Some(language) = cli.language {
            settings.language = language;
        }
        if let Some(difficulty) = cli.difficulty {
            settings.word_count = difficulty.word_count();
        }

        let mut catalog = WordCatalog::new()?;
        catalog.seed_bundled()?;
        let ranking_db = RankingDb::new()?;

        let mut session = GameSession::new(&settings);
        session.start(&settings, &catalog);
        if settings_error && session.state().user_message.is_none() {
            // Defaults are in play; tell the player but keep going.
            session.set_user_message(UserMessage::ErrorAccessingSettings);
        }

        Ok(Self {
            session,
            settings,
            store,
            catalog,
            ranking_db,
            screen: Screen::Game,
            guess: String::new(),
            name_input: String::new(),
            pending: settings,
            ranking_rows: Vec::new(),
        })
    }

    /// Restart with the current settings: fresh queue, score back to zero.
    pub fn new_game(&mut self) {
        self.session.start(&self.settings, &self.catalog);
        self.guess.clear();
        self.name_input.clear();
        self.screen = Screen::Game;
    }

    /// Record the finished game under `name_input`, then start over.
    pub fn finish_game(&mut self) {
        if let Some(record) = self.session.complete(self.name_input.trim()) {
            // Best-effort local write; a failed insert loses the record
            // but must not take the game down.
            let _ = self.ranking_db.insert(&record);
        }
        self.new_game();
    }

    pub fn submit_guess(&mut self) {
        let guess = std::mem::take(&mut self.guess);
        self.session.submit_guess(&guess);
        if self.session.state().is_game_over {
            self.screen = Screen::GameOver;
        }
    }

    pub fn skip_word(&mut self) {
        self.guess.clear();
        self.session.skip();
        if self.session.state().is_game_over {
            self.screen = Screen::GameOver;
        }
    }

    /// Persist the pending settings; on success the session reloads with
    /// a fresh queue, on failure the previous settings stay in force.
    pub fn save_settings(&mut self) {
        match self.store.save(&self.pending) {
            Ok(()) => {
                self.settings = self.pending;
                self.new_game();
            }
            Err(_) => {
                self.session.set_user_message(UserMessage::ErrorWritingSettings);
                self.screen = Screen::Game;
            }
        }
    }

    pub fn open_ranking(&mut self) {
        self.ranking_rows = self.ranking_db.ranking().unwrap_or_default();
        self.screen = Screen::Ranking;
    }

    pub fn close_ranking(&mut self) {
        self.screen = if self.session.state().is_game_over {
            Screen::GameOver
        } else {
            Screen::Game
        };
    }

    /// Settings errors are transient banners; any keypress acknowledges
    /// them. A failed word draw is terminal until settings change.
    fn acknowledge_notice(&mut self) {
        match self.session.state().user_message {
            Some(UserMessage::ErrorAccessingSettings) | Some(UserMessage::ErrorWritingSettings) => {
                self.session.clear_user_message();
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.clear_ranking {
        let db = RankingDb::new()?;
        db.clear()?;
        println!("ranking cleared");
        return Ok(());
    }

    if cli.ranking {
        let db = RankingDb::new()?;
        print_ranking(&db.ranking()?);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli)?;
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = run(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn print_ranking(records: &[GameRecord]) {
    if records.is_empty() {
        println!("no games recorded yet");
        return;
    }
    println!("{:<4} {:<16} {:>6}  {}", "#", "name", "score", "date");
    for (idx, record) in records.iter().enumerate() {
        println!(
            "{:<4} {:<16} {:>6}  {}",
            idx + 1,
            record.name,
            record.score,
            record.date.format("%Y-%m-%d %H:%M")
        );
    }
}

fn run<B: ratatui::backend::Backend, E: unscramble::runtime::AppEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if is_quit(&key) {
                    break;
                }
                if !handle_key(app, &key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Returns false when the app should exit.
fn handle_key(app: &mut App, key: &KeyEvent) -> bool {
    app.acknowledge_notice();

    match app.screen {
        Screen::Game => match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.pending = app.settings;
                app.screen = Screen::Settings;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.open_ranking();
            }
            KeyCode::Char(c) => {
                if app.session.state().is_active() {
                    app.guess.push(c);
                }
            }
            KeyCode::Backspace => {
                app.guess.pop();
            }
            KeyCode::Enter => app.submit_guess(),
            KeyCode::Tab => app.skip_word(),
            _ => {}
        },
        Screen::GameOver => match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.open_ranking();
            }
            KeyCode::Char(c) => app.name_input.push(c),
            KeyCode::Backspace => {
                app.name_input.pop();
            }
            KeyCode::Enter => app.finish_game(),
            _ => {}
        },
        Screen::Settings => match key.code {
            KeyCode::Esc => app.screen = Screen::Game,
            KeyCode::Left | KeyCode::Right => {
                app.pending.language = match app.pending.language {
                    Language::English => Language::Spanish,
                    Language::Spanish => Language::English,
                };
            }
            KeyCode::Up | KeyCode::Down => {
                let current = Difficulty::from_word_count(app.pending.word_count)
                    .unwrap_or(Difficulty::Easy);
                let all = Difficulty::all();
                let idx = all.iter().position(|d| *d == current).unwrap_or(0);
                let next = match key.code {
                    KeyCode::Up => (idx + all.len() - 1) % all.len(),
                    _ => (idx + 1) % all.len(),
                };
                app.pending.word_count = all[next].word_count();
            }
            KeyCode::Enter => app.save_settings(),
            _ => {}
        },
        Screen::Ranking => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.close_ranking(),
            _ => {}
        },
    }

    true
}
