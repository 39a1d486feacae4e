//! Parsing of chat input lines.
use workshop_core::DocumentFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChatCommand {
    Send(String),
    Retry,
    Next,
    Status,
    /// Star the latest assistant message.
    Star,
    Unstar(String),
    Check(String),
    Sidebar,
    Download(DocumentFormat),
    Help,
    Quit,
    /// Recognized command with bad or missing arguments.
    Invalid(String),
    Empty,
}

pub(crate) const HELP_TEXT: &str = "\
Befehle:
  /retry                 letzte Anfrage wiederholen
  /next                  zum nächsten Abschnitt
  /status                Fortschritt neu laden
  /star                  letzte Antwort als Tipp merken
  /unstar <nr|id>        Tipp entfernen
  /check <nr|id>         Checklistenpunkt abhaken
  /sidebar               Seitenleiste ein-/ausblenden
  /download pdf|docx|xlsx
  /quit                  beenden";

pub(crate) fn parse_chat_line(line: &str) -> ChatCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatCommand::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ChatCommand::Send(trimmed.to_string());
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name.to_ascii_lowercase().as_str() {
        "retry" => ChatCommand::Retry,
        "next" | "weiter" => ChatCommand::Next,
        "status" | "refresh" => ChatCommand::Status,
        "star" => ChatCommand::Star,
        "unstar" => with_arg(arg, "/unstar <nr|id>", ChatCommand::Unstar),
        "check" => with_arg(arg, "/check <nr|id>", ChatCommand::Check),
        "sidebar" => ChatCommand::Sidebar,
        "download" => match DocumentFormat::from_name(arg) {
            Some(format) => ChatCommand::Download(format),
            None => ChatCommand::Invalid("/download pdf|docx|xlsx".to_string()),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        // Unknown slash commands are sent as text.
        _ => ChatCommand::Send(trimmed.to_string()),
    }
}

fn with_arg(arg: &str, usage: &str, build: fn(String) -> ChatCommand) -> ChatCommand {
    if arg.is_empty() {
        ChatCommand::Invalid(usage.to_string())
    } else {
        build(arg.to_string())
    }
}

/// Resolves a 1-based list position or a literal id against `ids`.
pub(crate) fn resolve_reference<'a>(reference: &str, ids: &[&'a str]) -> Option<&'a str> {
    if let Ok(position) = reference.parse::<usize>() {
        return position.checked_sub(1).and_then(|index| ids.get(index)).copied();
    }
    ids.iter().copied().find(|id| *id == reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_chat_line("  Ich eröffne ein Café  "),
            ChatCommand::Send("Ich eröffne ein Café".into())
        );
        assert_eq!(parse_chat_line("   "), ChatCommand::Empty);
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_chat_line("/RETRY"), ChatCommand::Retry);
        assert_eq!(parse_chat_line("/next"), ChatCommand::Next);
        assert_eq!(parse_chat_line("/quit"), ChatCommand::Quit);
        assert_eq!(parse_chat_line("/sidebar"), ChatCommand::Sidebar);
    }

    #[test]
    fn download_needs_a_known_format() {
        assert_eq!(
            parse_chat_line("/download word"),
            ChatCommand::Download(DocumentFormat::Docx)
        );
        assert!(matches!(parse_chat_line("/download"), ChatCommand::Invalid(_)));
        assert!(matches!(parse_chat_line("/download odt"), ChatCommand::Invalid(_)));
    }

    #[test]
    fn arguments_are_required() {
        assert_eq!(parse_chat_line("/check 2"), ChatCommand::Check("2".into()));
        assert!(matches!(parse_chat_line("/unstar"), ChatCommand::Invalid(_)));
    }

    #[test]
    fn unknown_commands_are_sent_verbatim() {
        assert_eq!(parse_chat_line("/50k Umsatz"), ChatCommand::Send("/50k Umsatz".into()));
    }

    #[test]
    fn references_resolve_by_position_or_id() {
        let ids = ["c1", "c2"];
        assert_eq!(resolve_reference("2", &ids), Some("c2"));
        assert_eq!(resolve_reference("c1", &ids), Some("c1"));
        assert_eq!(resolve_reference("0", &ids), None);
        assert_eq!(resolve_reference("3", &ids), None);
    }
}
