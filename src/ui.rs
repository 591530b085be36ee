use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{App, Screen};
use unscramble::game::UserMessage;
use unscramble::settings::Difficulty;

const HORIZONTAL_MARGIN: u16 = 5;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Game => render_game(self, area, buf),
            Screen::GameOver => render_game_over(self, area, buf),
            Screen::Settings => render_settings(self, area, buf),
            Screen::Ranking => render_ranking(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn user_message_text(message: UserMessage) -> &'static str {
    match message {
        UserMessage::ErrorAccessingSettings => {
            "could not read saved settings; playing with defaults"
        }
        UserMessage::ErrorWritingSettings => "could not save settings; keeping the old ones",
        UserMessage::ErrorGettingWords => {
            "could not load any words; change settings (ctrl+s) or quit (esc)"
        }
    }
}

fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let state = app.session.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(2),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    let header = Line::from(vec![
        Span::styled(format!("score {}", state.score), bold().fg(Color::Green)),
        Span::raw("   "),
        Span::styled(
            format!("word {}/{}", state.word_index, state.word_count),
            bold(),
        ),
        Span::raw("   "),
        Span::styled(state.language.to_string(), dim()),
    ]);
    Paragraph::new(header)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if state.is_loading {
        Paragraph::new(Span::styled("loading words...", dim()))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        return;
    }

    if let Some(message) = state.user_message {
        Paragraph::new(Span::styled(
            user_message_text(message),
            bold().fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
        return;
    }

    // Letter-spaced when the terminal is wide enough for it.
    let spaced = spaced_letters(&state.scrambled_word);
    let display = if (spaced.width() as u16) <= chunks[1].width {
        spaced
    } else {
        state.scrambled_word.clone()
    };
    let word_area = centered_line(chunks[1]);
    Paragraph::new(Span::styled(
        display,
        bold().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED),
    ))
    .alignment(Alignment::Center)
    .render(word_area, buf);

    let guess_line = if state.is_guess_wrong {
        Line::from(vec![
            Span::styled(format!("> {}", app.guess), bold()),
            Span::raw("   "),
            Span::styled("wrong, try again or skip", bold().fg(Color::Red)),
        ])
    } else {
        Line::from(Span::styled(format!("> {}", app.guess), bold()))
    };
    Paragraph::new(guess_line)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(enter)guess (tab)skip (ctrl+s)settings (ctrl+r)ranking (esc)quit",
        Style::default().add_modifier(Modifier::ITALIC).fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_game_over(app: &App, area: Rect, buf: &mut Buffer) {
    let state = app.session.state();

    let mut lines = vec![
        Line::from(Span::styled("game over", bold().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            format!("final score {}", state.score),
            bold().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!(
                "{} right / {} wrong",
                state.right_words.len(),
                state.wrong_words.len()
            ),
            dim(),
        )),
    ];
    if !state.wrong_words.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("missed: {}", state.wrong_words.join(", ")),
            dim(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("your name: ", bold()),
        Span::styled(
            format!("{}_", app.name_input),
            bold().fg(Color::Yellow),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(enter)save & play again (ctrl+r)ranking (esc)quit",
        Style::default().add_modifier(Modifier::ITALIC).fg(Color::Cyan),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered_block(area, 9), buf);
}

fn render_settings(app: &App, area: Rect, buf: &mut Buffer) {
    let difficulty = Difficulty::from_word_count(app.pending.word_count)
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{} words", app.pending.word_count));

    let lines = vec![
        Line::from(Span::styled("settings", bold().fg(Color::Yellow))),
        Line::from(""),
        Line::from(vec![
            Span::styled("language:   ", dim()),
            Span::styled(app.pending.language.to_string(), bold()),
            Span::styled("  (left/right)", dim()),
        ]),
        Line::from(vec![
            Span::styled("difficulty: ", dim()),
            Span::styled(
                format!("{} ({} words)", difficulty, app.pending.word_count),
                bold(),
            ),
            Span::styled("  (up/down)", dim()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "saving restarts the game with a fresh word queue",
            dim(),
        )),
        Line::from(Span::styled(
            "(enter)save (esc)cancel",
            Style::default().add_modifier(Modifier::ITALIC).fg(Color::Cyan),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_block(area, 7), buf);
}

fn render_ranking(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled("ranking", bold().fg(Color::Yellow))),
        Line::from(""),
    ];

    if app.ranking_rows.is_empty() {
        lines.push(Line::from(Span::styled("no games recorded yet", dim())));
    } else {
        for (idx, record) in app.ranking_rows.iter().take(15).enumerate() {
            let name = if record.name.is_empty() {
                "anonymous"
            } else {
                record.name.as_str()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:>2}. ", idx + 1), dim()),
                Span::styled(format!("{name:<16}"), bold()),
                Span::styled(format!("{:>5}  ", record.score), bold().fg(Color::Green)),
                Span::styled(record.date.format("%Y-%m-%d %H:%M").to_string(), dim()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(esc)back",
        Style::default().add_modifier(Modifier::ITALIC).fg(Color::Cyan),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_block(area, (app.ranking_rows.len().min(15) + 5) as u16), buf);
}

/// Widen the scrambled word so single letters read as tiles.
fn spaced_letters(word: &str) -> String {
    let mut out = String::new();
    for (i, c) in word.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn centered_line(area: Rect) -> Rect {
    let offset = area.height / 2;
    Rect {
        x: area.x,
        y: area.y + offset,
        width: area.width,
        height: area.height.min(1),
    }
}

fn centered_block(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let offset = (area.height - height) / 2;
    Rect {
        x: area.x,
        y: area.y + offset,
        width: area.width,
        height,
    }
}
