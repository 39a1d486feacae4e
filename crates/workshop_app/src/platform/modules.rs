//! Workshop modules: prompts with coaching, scaffolding and concept reviews.
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use workshop_core::{
    scaffolding_level, validate_answer, CoachingFeedback, ConceptTracker, Difficulty,
    DifficultyTracker, Scaffolding, REQUEST_FAILED_TEXT,
};
use workshop_engine::{
    CoachingRequest, EngineCommand, EngineEvent, ModulePrompt, WorkshopModule, WorkshopOverview,
};
use workshop_logging::{workshop_info, workshop_warn};

use super::effects::EffectRunner;
use super::read_line;

const RESPONSE_WAIT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptInput {
    Answer(String),
    Skip,
    Quit,
}

fn parse_prompt_line(line: &str) -> PromptInput {
    match line.trim().to_ascii_lowercase().as_str() {
        "/skip" => PromptInput::Skip,
        "/quit" | "/exit" => PromptInput::Quit,
        _ => PromptInput::Answer(line.trim().to_string()),
    }
}

/// Help lines shown before a prompt.
fn prompt_help(prompt: &ModulePrompt, scaffolding: Scaffolding, difficulty: Difficulty) -> Vec<String> {
    let mut lines = Vec::new();
    let show_example = scaffolding.shows_examples() || difficulty == Difficulty::Guided;
    if let Some(example) = prompt.example.as_deref().filter(|_| show_example) {
        lines.push(format!("  Beispiel: {example}"));
    }
    if let Some(template) = prompt.template.as_deref().filter(|_| scaffolding.shows_templates()) {
        lines.push(format!("  Vorlage: {template}"));
    }
    match difficulty {
        Difficulty::Guided => {
            lines.push("  Tipp: Antworten Sie in zwei, drei konkreten Sätzen mit Zahlen.".to_string())
        }
        Difficulty::Advanced => lines.push("  Kurz und präzise genügt.".to_string()),
        Difficulty::Standard => {}
    }
    lines
}

fn render_feedback(feedback: &CoachingFeedback) -> Vec<String> {
    let source = if feedback.is_fallback { " (offline)" } else { "" };
    let mut lines = vec![format!("  Coach{source} [{}]: {}", feedback.score, feedback.feedback)];
    lines.extend(feedback.suggestions.iter().map(|s| format!("    - {s}")));
    lines
}

struct ModuleSession<'a> {
    runner: &'a EffectRunner,
    session_id: String,
    lines: &'a mpsc::Receiver<String>,
    difficulty: DifficultyTracker,
    concepts: ConceptTracker,
    step: u64,
}

pub(crate) fn run_modules(
    runner: &EffectRunner,
    session_id: &str,
    lines: &mpsc::Receiver<String>,
) -> Result<()> {
    runner.send(EngineCommand::StartWorkshop {
        session_id: session_id.to_string(),
    });
    let overview = runner.await_event(RESPONSE_WAIT, |event| match event {
        EngineEvent::WorkshopStarted(result) => Some(result),
        _ => None,
    });
    let overview: WorkshopOverview = match overview {
        Some(Ok(overview)) => overview,
        Some(Err(err)) => {
            workshop_warn!("workshop start failed: {}", err);
            println!("{REQUEST_FAILED_TEXT}");
            return Ok(());
        }
        None => {
            println!("{REQUEST_FAILED_TEXT}");
            return Ok(());
        }
    };

    let mut session = ModuleSession {
        runner,
        session_id: overview.session_id.clone(),
        lines,
        difficulty: DifficultyTracker::new(),
        concepts: ConceptTracker::new(),
        step: 0,
    };
    println!("Workshop mit {} Modulen. /skip überspringt eine Frage, /quit beendet.", overview.modules.len());

    for summary in overview
        .modules
        .iter()
        .filter(|module| module.number >= overview.current_module)
    {
        let Some(module) = session.fetch_module(summary.number) else {
            println!("{REQUEST_FAILED_TEXT}");
            return Ok(());
        };
        if !session.run_module(&module) {
            return Ok(());
        }
    }
    println!("Alle Module bearbeitet.");
    Ok(())
}

impl ModuleSession<'_> {
    fn fetch_module(&self, number: u32) -> Option<WorkshopModule> {
        self.runner.send(EngineCommand::FetchModule {
            session_id: self.session_id.clone(),
            number,
        });
        match self.runner.await_event(RESPONSE_WAIT, |event| match event {
            EngineEvent::ModuleFetched(result) => Some(result),
            _ => None,
        })? {
            Ok(module) => Some(module),
            Err(err) => {
                workshop_warn!("module {} unavailable: {}", number, err);
                None
            }
        }
    }

    /// Returns false when the user quit.
    fn run_module(&mut self, module: &WorkshopModule) -> bool {
        println!();
        println!("== Modul {}: {} ==", module.number, module.title);
        if let Some(intro) = &module.intro {
            println!("{intro}");
        }

        for prompt in &module.prompts {
            self.step += 1;
            if !self.review_due_concepts() {
                return false;
            }

            let scaffolding = scaffolding_level(module.number, self.difficulty.last());
            println!();
            println!("{}", prompt.question);
            for line in prompt_help(prompt, scaffolding, self.difficulty.difficulty()) {
                println!("{line}");
            }

            let Some(line) = read_line(self.lines, "> ") else {
                return false;
            };
            let answer = match parse_prompt_line(&line) {
                PromptInput::Quit => return false,
                PromptInput::Skip => continue,
                PromptInput::Answer(answer) => answer,
            };
            for issue in validate_answer(&answer, prompt.min_len, prompt.max_len) {
                println!("  Hinweis: {issue}");
            }

            let feedback = self.coach(module.number, prompt, answer);
            for line in render_feedback(&feedback) {
                println!("{line}");
            }
            self.difficulty.record(feedback.score);
            if let Some(concept) = &prompt.concept {
                self.concepts.track(concept, concept, self.step);
            }
        }
        true
    }

    fn coach(&self, module: u32, prompt: &ModulePrompt, answer: String) -> CoachingFeedback {
        let request = CoachingRequest {
            session_id: self.session_id.clone(),
            module,
            question_id: prompt.id.clone(),
            answer: answer.clone(),
        };
        self.runner.send(EngineCommand::RequestCoaching(request));
        let question_id = prompt.id.clone();
        self.runner
            .await_event(RESPONSE_WAIT, |event| match event {
                EngineEvent::CoachingReady {
                    question_id: id,
                    feedback,
                } if id == question_id => Some(feedback),
                _ => None,
            })
            .unwrap_or_else(|| workshop_core::fallback_feedback(&answer))
    }

    /// Returns false when the user quit.
    fn review_due_concepts(&mut self) -> bool {
        let due: Vec<(String, String)> = self
            .concepts
            .due(self.step)
            .into_iter()
            .map(|concept| (concept.id.clone(), concept.label.clone()))
            .collect();
        for (id, label) in due {
            println!("Wiederholung: Sitzt \"{label}\"? (j/n)");
            let Some(line) = read_line(self.lines, "> ") else {
                return false;
            };
            let success = matches!(line.trim().to_ascii_lowercase().as_str(), "j" | "ja" | "y");
            self.concepts.review(&id, success, self.step);
            workshop_info!("reviewed concept {} success={}", id, success);
        }
        true
    }
}
