//! Text projections of the session. Nothing here mutates state.

use crate::config::{Preferences, Theme, ViewMode};
use crate::core::{Session, Tab};
use crate::models::{Action, HistoryEntry, Program};
use crate::utils::table::Table;
use ansi_term::{Colour, Style};
use regex::Regex;
use std::sync::LazyLock;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?|ftp|file)://[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|]")
        .expect("valid regex")
});

/// Wrap every URL in `text` as an OSC 8 terminal hyperlink.
pub fn linkify(text: &str) -> String {
    URL.replace_all(text, |caps: &regex::Captures| {
        let url = &caps[0];
        format!("\x1b]8;;{url}\x1b\\{url}\x1b]8;;\x1b\\")
    })
    .into_owned()
}

struct Palette {
    title: Style,
    header: Style,
    muted: Style,
    active: Style,
}

impl Palette {
    fn of(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                title: Colour::Blue.bold(),
                header: Colour::Blue.bold(),
                muted: Colour::Fixed(244).normal(),
                active: Colour::Black.on(Colour::Fixed(153)).bold(),
            },
            Theme::Dark => Palette {
                title: Colour::Cyan.bold(),
                header: Colour::Cyan.bold(),
                muted: Colour::Fixed(245).normal(),
                active: Colour::White.on(Colour::Fixed(24)).bold(),
            },
        }
    }
}

fn color_for_action(action: &str) -> Colour {
    match Action::parse(action) {
        Some(Action::UpdateData) => Colour::Yellow,
        Some(
            Action::AddRow
            | Action::AddColumn
            | Action::AddProgram
            | Action::AddTrainee
            | Action::ImportFile,
        ) => Colour::Green,
        Some(Action::DeleteRow | Action::DeleteProgram | Action::DeleteTrainee) => Colour::Red,
        Some(Action::RenameProgram | Action::RenameTrainee) => Colour::Cyan,
        Some(Action::MoveProgram) => Colour::Purple,
        None => Colour::White,
    }
}

/// Trainee tabs followed by the history tab; the active one is highlighted.
pub fn render_tabs(session: &Session, theme: Theme) -> String {
    let palette = Palette::of(theme);
    let mut tabs: Vec<String> = session
        .trainees
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let label = format!(" {}. {} ", i + 1, t.name);
            if i == session.current && session.active_tab == Tab::Trainee {
                palette.active.paint(label).to_string()
            } else {
                label
            }
        })
        .collect();

    let history = " History/היסטוריה ".to_string();
    tabs.push(if session.active_tab == Tab::History {
        palette.active.paint(history).to_string()
    } else {
        history
    });
    tabs.join("│")
}

/// One block: its number, title and cells.
pub fn render_program(number: usize, program: &Program, prefs: &Preferences) -> String {
    let palette = Palette::of(prefs.theme);
    let mut out = format!(
        "{} {}\n",
        palette.muted.paint(format!("[{number}]")),
        palette.title.paint(&program.title)
    );

    let grid = &program.data;
    match prefs.view_mode {
        ViewMode::Grid => {
            let mut header = vec!["#".to_string()];
            header.extend(grid.header().iter().cloned());
            let mut table = Table::new(&header);
            for (i, row) in grid.body().iter().enumerate() {
                let mut cells = vec![(i + 1).to_string()];
                cells.extend(row.iter().cloned());
                table.add_row(cells);
            }
            out.push_str(&table.render_with(palette.header, linkify));
        }
        ViewMode::List => {
            for (i, row) in grid.body().iter().enumerate() {
                let fields: Vec<String> = grid
                    .header()
                    .iter()
                    .zip(row)
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(label, value)| {
                        format!("{}: {}", palette.header.paint(label), linkify(value))
                    })
                    .collect();
                let fields = if fields.is_empty() {
                    palette.muted.paint("(empty)").to_string()
                } else {
                    fields.join(" · ")
                };
                let number = palette.muted.paint(format!("{}.", i + 1));
                out.push_str(&format!("  {number} {fields}\n"));
            }
        }
    }
    out
}

/// The current trainee's tab with every block, in display order.
pub fn render_session(session: &Session, prefs: &Preferences) -> String {
    let mut out = render_tabs(session, prefs.theme);
    out.push_str("\n\n");

    if session.programs.is_empty() {
        out.push_str("No programs yet. Add one with `myfit program add <title>`.\n");
        return out;
    }
    for (i, program) in session.programs.iter().enumerate() {
        out.push_str(&render_program(i + 1, program, prefs));
        out.push('\n');
    }
    out
}

/// History entries, newest first: stored entries by descending id, queued
/// (not yet stored) entries above them.
pub fn render_history(entries: &[HistoryEntry], theme: Theme) -> String {
    let palette = Palette::of(theme);
    if entries.is_empty() {
        return "No history yet.\n".to_string();
    }

    let mut ordered: Vec<&HistoryEntry> = entries.iter().collect();
    ordered.sort_by_key(|h| (h.id.as_i64().is_none(), h.id.as_i64()));

    let mut out = String::new();
    for h in ordered.into_iter().rev() {
        out.push_str(&format!(
            "{}  {}  {}\n",
            palette.muted.paint(&h.timestamp),
            Style::new().bold().paint(&h.trainee_name),
            color_for_action(&h.action).paint(&h.action)
        ));
        if !h.description.is_empty() {
            for line in textwrap::wrap(&h.description, 76) {
                out.push_str(&format!("    {}\n", linkify(&line)));
            }
        }
    }
    out
}
