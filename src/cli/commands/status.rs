use super::with_session;
use crate::config::Config;
use crate::core::{DirtySet, Session};
use crate::errors::AppResult;
use crate::models::RecordId;
use crate::ui::messages::{header, success};

fn describe(id: &RecordId, name: Option<&str>) -> String {
    let label = name.map_or_else(|| format!("#{id}"), |n| format!("'{n}'"));
    if id.is_temporary() {
        format!("new {label}")
    } else {
        format!("modified {label}")
    }
}

fn print_changes(
    title: &str,
    changes: &DirtySet,
    name_of: impl Fn(&RecordId) -> Option<String>,
) {
    if !changes.is_pending() {
        return;
    }
    println!(
        "{title}: {} to write, {} to delete",
        changes.dirty_len(),
        changes.deleted_len()
    );
    for id in changes.dirty() {
        println!("  + {}", describe(id, name_of(id).as_deref()));
    }
    for id in changes.deleted() {
        println!("  - deleted #{id}");
    }
}

pub fn print_status(session: &Session) {
    print_changes("Trainees", &session.trainee_changes, |id| {
        session
            .trainees
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.name.clone())
    });
    print_changes("Programs", &session.program_changes, |id| {
        session
            .programs
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.title.clone())
    });
    if !session.journal.is_empty() {
        println!(
            "History: {} entries waiting for their trainee to be saved",
            session.journal.len()
        );
    }
}

pub fn handle(cfg: &Config) -> AppResult<()> {
    with_session(cfg, |ctx| {
        if !ctx.session.needs_buffer() {
            success("No pending changes");
            return Ok(());
        }
        header("Pending changes");
        print_status(&ctx.session);
        Ok(())
    })
}
