//! Drawing of each session state into the inline viewport.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::commit::CommitCandidate;
use crate::session::{ConfirmationGate, Editor, Session, SessionState};

/// Rows reserved below the prompt for the UI.
pub const VIEWPORT_HEIGHT: u16 = 12;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
const COMMAND_PREFIX: &str = "git commit -m \"";
const CONFIRM_QUESTION: &str = "Do you confirm this commit message? ";

pub fn render(frame: &mut Frame, session: &Session, tick: usize) {
    let area = frame.area();
    match session.state() {
        SessionState::Loading => {
            frame.render_widget(Paragraph::new(loading_line(tick)), area);
        }
        SessionState::Error(message) => {
            let text = Paragraph::new(Line::from(message.as_str()).red()).wrap(Wrap { trim: false });
            frame.render_widget(text, area);
        }
        SessionState::Browsing {
            candidates,
            selector,
        } => render_candidates(frame, area, candidates, selector.selected()),
        SessionState::Editing { editor, .. } => render_editor(frame, area, editor),
        SessionState::Confirming { pending, gate } => {
            render_confirmation(frame, area, pending, gate);
        }
        SessionState::Done => {}
    }
}

fn loading_line(tick: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            SPINNER_FRAMES[tick % SPINNER_FRAMES.len()],
            Style::new().fg(Color::LightGreen),
        ),
        Span::raw(" Generating commit messages..."),
    ])
}

fn refresh_hint() -> Line<'static> {
    let hint = Style::new()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC | Modifier::UNDERLINED);
    Line::from(vec![
        Span::styled("Press", hint),
        Span::styled(" Ctrl + r ", Style::new().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
        Span::styled("to refresh", hint),
    ])
}

fn render_candidates(frame: &mut Frame, area: Rect, candidates: &[CommitCandidate], selected: usize) {
    let mut lines = vec![refresh_hint()];

    for (index, candidate) in candidates.iter().enumerate() {
        let is_selected = index == selected;
        let marker = if is_selected { "▶" } else { " " };
        let subject_style = if is_selected {
            Style::new()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::new()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::new().fg(Color::LightCyan)),
            Span::raw(format!(" {}. ", index + 1)),
            Span::styled(candidate.subject.as_str(), subject_style),
        ]));
    }

    if let Some(candidate) = candidates.get(selected) {
        let body = candidate.body.trim();
        if !body.is_empty() {
            lines.push(Line::default());
            lines.extend(
                body.lines()
                    .map(|line| Line::from(format!("     {line}")).dark_gray()),
            );
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_editor(frame: &mut Frame, area: Rect, editor: &Editor) {
    let [prefix_area, input_area] = Layout::horizontal([
        Constraint::Length(COMMAND_PREFIX.len() as u16),
        Constraint::Min(1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(COMMAND_PREFIX), prefix_area);

    // Keep room for the closing quote.
    let width = input_area.width.saturating_sub(1).max(1) as usize;
    let input = editor.input();
    let scroll = input.visual_scroll(width);
    let line = Line::from(vec![
        Span::styled(input.value(), Style::new().add_modifier(Modifier::UNDERLINED)),
        Span::raw("\""),
    ]);
    frame.render_widget(
        Paragraph::new(line).scroll((0, scroll as u16)),
        input_area,
    );

    let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
    frame.set_cursor_position((input_area.x + cursor, input_area.y));
}

fn render_confirmation(
    frame: &mut Frame,
    area: Rect,
    pending: &CommitCandidate,
    gate: &ConfirmationGate,
) {
    let answer_style = if gate.accepted() {
        Style::new().fg(Color::Green)
    } else {
        Style::new().fg(Color::Red)
    };
    let lines = vec![
        Line::from(vec![
            Span::raw(COMMAND_PREFIX),
            Span::styled(pending.subject.as_str(), Style::new().add_modifier(Modifier::REVERSED)),
            Span::raw("\""),
        ]),
        Line::from(vec![
            Span::raw(CONFIRM_QUESTION),
            Span::styled(gate.label(), answer_style),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
