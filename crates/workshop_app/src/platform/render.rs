//! Text rendering of the chat view model.
//!
//! The renderer remembers what it already printed so each call only emits
//! what changed since the previous frame.
use workshop_core::{
    ChatMessage, ChatViewModel, DoorScore, GapWarning, Role, SectionStatus, SessionPhase, UiHint,
};

#[derive(Debug, Default)]
pub(crate) struct ChatRenderer {
    seen_messages: usize,
    last_status: Option<String>,
    last_sidebar: Option<String>,
    last_error: Option<String>,
    last_notice: Option<String>,
    last_transition: Option<String>,
    paywall_shown: bool,
    reminder_shown: bool,
}

impl ChatRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn render(&mut self, view: &ChatViewModel) -> Vec<String> {
        let mut out = Vec::new();

        for message in view.messages.iter().skip(self.seen_messages) {
            // User lines were typed at the prompt already.
            if message.role == Role::Assistant {
                out.extend(render_message(message));
            }
        }
        self.seen_messages = view.messages.len();

        let transition = view.transition.as_ref().map(|transition| {
            let mut block = format!(
                "== Abschnitt abgeschlossen: {} ==",
                transition.finished_title.as_deref().unwrap_or("-")
            );
            if let Some(text) = &transition.generated_text {
                block.push('\n');
                block.push_str(text);
            }
            match &transition.next_title {
                Some(next) => block.push_str(&format!("\nWeiter mit: {next} (/next)")),
                None => block.push_str("\nAbschließen mit /next"),
            }
            block
        });
        if changed(&mut self.last_transition, transition) {
            if let Some(block) = &self.last_transition {
                out.push(block.clone());
            }
        }

        let status = status_line(view);
        if changed(&mut self.last_status, Some(status)) {
            out.extend(self.last_status.clone());
        }

        let sidebar = (!view.sidebar_collapsed).then(|| sidebar_block(view));
        if changed(&mut self.last_sidebar, sidebar.filter(|block| !block.is_empty())) {
            out.extend(self.last_sidebar.clone());
        }

        if changed(&mut self.last_error, view.error.clone()) {
            if let Some(error) = &self.last_error {
                out.push(format!("! {error} (/retry)"));
            }
        }
        if changed(&mut self.last_notice, view.notice.clone()) {
            if let Some(notice) = &self.last_notice {
                out.push(format!("i {notice}"));
            }
        }

        match &view.paywall {
            Some(paywall) if !self.paywall_shown => {
                self.paywall_shown = true;
                out.push(format!("* {} ({})", paywall.title, paywall.locked_section));
                out.extend(paywall.benefits.iter().map(|b| format!("  + {b}")));
            }
            None => self.paywall_shown = false,
            _ => {}
        }
        if let Some(reminder) = &view.endowment_reminder {
            if !self.reminder_shown {
                self.reminder_shown = true;
                out.push(format!("i {}", reminder.text));
            }
        }

        if view.phase == SessionPhase::Complete && view.transition.is_none() {
            let line = "Ihr Businessplan ist fertig. /download pdf|docx|xlsx".to_string();
            if changed(&mut self.last_transition, Some(line.clone())) {
                out.push(line);
            }
        }
        out
    }
}

fn changed(slot: &mut Option<String>, next: Option<String>) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}

fn render_message(message: &ChatMessage) -> Vec<String> {
    let mut lines = vec![format!("> {}", message.text)];
    match &message.hint {
        Some(UiHint::QuickReplies(options)) if !options.is_empty() => {
            lines.push(format!("  Vorschläge: {}", options.join(" | ")));
        }
        Some(UiHint::Example(text)) => lines.push(format!("  Beispiel: {text}")),
        Some(UiHint::Template(text)) => lines.push(format!("  Vorlage: {text}")),
        Some(UiHint::Warning(text)) => lines.push(format!("  Achtung: {text}")),
        _ => {}
    }
    lines
}

fn status_line(view: &ChatViewModel) -> String {
    let phase = match view.phase {
        SessionPhase::Idle if view.loading => "verbinde",
        SessionPhase::Idle => "bereit",
        SessionPhase::Active if view.loading => "denkt nach",
        SessionPhase::Active => "aktiv",
        SessionPhase::Transitioning => "Abschnitt fertig",
        SessionPhase::Complete => "abgeschlossen",
    };
    let mut line = format!("[{}% | {}", view.progress, phase);
    if let Some(title) = &view.current_section_title {
        line.push_str(&format!(" | {title}"));
        if let Some(step) = view.current_step {
            line.push_str(&format!(" Schritt {step}"));
        }
    }
    if let Some(completion) = &view.completion {
        if !completion.can_finish && !completion.missing_sections.is_empty() {
            line.push_str(&format!(" | offen: {}", completion.missing_sections.join(", ")));
        }
    }
    line.push(']');
    line
}

fn sidebar_block(view: &ChatViewModel) -> String {
    let mut lines = Vec::new();
    if !view.sections.is_empty() {
        lines.push("Abschnitte:".to_string());
        for section in &view.sections {
            let marker = match section.status {
                SectionStatus::Completed => "x",
                SectionStatus::InProgress => ">",
                SectionStatus::Available => " ",
                SectionStatus::Locked => "-",
            };
            let score = section
                .quality_score
                .map(|score| format!(" ({score})"))
                .unwrap_or_default();
            lines.push(format!("  [{marker}] {}. {}{score}", section.ordinal, section.title));
        }
    }
    if !view.checklist.is_empty() {
        lines.push("Checkliste:".to_string());
        for (index, item) in view.checklist.iter().enumerate() {
            let marker = if item.done { "x" } else { " " };
            lines.push(format!("  {}. [{marker}] {}", index + 1, item.label));
        }
    }
    if !view.starred_tips.is_empty() {
        lines.push("Gemerkte Tipps:".to_string());
        for (index, tip) in view.starred_tips.iter().enumerate() {
            lines.push(format!("  {}. {}", index + 1, tip.text));
        }
    }
    lines.join("\n")
}

pub(crate) fn render_doors(doors: &[DoorScore]) -> Vec<String> {
    doors
        .iter()
        .map(|door| {
            format!(
                "  {:<26} {:>3}  {}",
                door.door.title(),
                door.score,
                door.status.key()
            )
        })
        .collect()
}

pub(crate) fn render_gap_warnings(warnings: &[GapWarning]) -> Vec<String> {
    warnings
        .iter()
        .map(|warning| format!("! {}: {}", warning.title, warning.advice))
        .collect()
}
