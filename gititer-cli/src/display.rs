use colored::{ColoredString, Colorize};
use gititer_core::ChangeKind;

pub fn change_icon(kind: ChangeKind) -> ColoredString {
    match kind {
        ChangeKind::Added => "+".green(),
        ChangeKind::Modified => "~".yellow(),
        ChangeKind::Deleted => "-".red(),
        ChangeKind::Renamed => "→".blue(),
    }
}

pub fn message_line(message: &str) -> ColoredString {
    if message.is_empty() {
        "(none)".dimmed()
    } else {
        message.white().bold()
    }
}

pub fn warning(text: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), text.yellow());
}
