//! Interactive GZ questionnaire with a local door preview.
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use workshop_core::{
    gap_warnings, validate_answer, AssessmentWizard, DoorScore, QuestionKind, REQUEST_FAILED_TEXT,
};
use workshop_engine::{AssessmentOutcome, EngineCommand, EngineEvent};
use workshop_logging::{workshop_info, workshop_warn};

use super::effects::EffectRunner;
use super::persistence;
use super::read_line;
use super::render::{render_doors, render_gap_warnings};

const RESPONSE_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
enum WizardInput {
    Answer(String),
    Back,
    Quit,
}

fn parse_wizard_line(line: &str) -> WizardInput {
    match line.trim().to_ascii_lowercase().as_str() {
        "/back" | "/zurück" => WizardInput::Back,
        "/quit" | "/exit" => WizardInput::Quit,
        _ => WizardInput::Answer(line.trim().to_string()),
    }
}

pub(crate) fn run_assessment(
    runner: &EffectRunner,
    session_id: &str,
    lines: &mpsc::Receiver<String>,
) -> Result<()> {
    let mut wizard = AssessmentWizard::new();
    println!("GZ-Check: /back für die vorige Frage, /quit zum Abbrechen.");

    while let Some(question) = wizard.current() {
        println!();
        println!("[{}%] {}", wizard.progress_percent(), question.prompt);
        match question.kind {
            QuestionKind::Choice(options) => {
                for option in options {
                    println!("  {}) {}", option.key, option.label);
                }
            }
            QuestionKind::Text { min_len, .. } if question.required => {
                println!("  (mindestens {min_len} Zeichen)");
            }
            QuestionKind::Text { .. } => println!("  (optional, Enter zum Überspringen)"),
        }

        let Some(line) = read_line(lines, "> ") else {
            return Ok(());
        };
        match parse_wizard_line(&line) {
            WizardInput::Quit => return Ok(()),
            WizardInput::Back => {
                wizard.back();
                continue;
            }
            WizardInput::Answer(answer) => match question.kind {
                QuestionKind::Choice(_) => wizard.answer(&answer.to_ascii_uppercase()),
                QuestionKind::Text { min_len, max_len } => {
                    if !answer.is_empty() {
                        for issue in validate_answer(&answer, min_len, max_len) {
                            println!("  Hinweis: {issue}");
                        }
                    }
                    wizard.answer(&answer);
                }
            },
        }

        if !wizard.next() {
            println!("  Bitte geben Sie eine gültige Antwort ein.");
            continue;
        }
        println!("  Vorschau:");
        for line in render_doors(&wizard.door_preview()) {
            println!("{line}");
        }
    }

    let preview = wizard.door_preview();
    println!();
    println!("Ihre lokale Einschätzung:");
    print_doors(&preview);

    match submit(runner, session_id, &wizard) {
        Some(outcome) => {
            println!();
            println!("Auswertung (Gesamt {}):", outcome.overall_score);
            let doors = if outcome.doors.is_empty() {
                preview
            } else {
                outcome.doors.clone()
            };
            print_doors(&doors);
            if let Some(profile) = &outcome.personality {
                println!("Gründertyp: {} ({})", profile.label, profile.traits.join(", "));
            }
            if let Some(recommendation) = &outcome.recommendation {
                println!("Empfehlung: {recommendation}");
            }
            persistence::save_assessment(
                runner.store(),
                session_id,
                &doors,
                outcome.personality.as_ref(),
            );
        }
        None => {
            println!("{REQUEST_FAILED_TEXT} Die lokale Einschätzung wurde gespeichert.");
            persistence::save_assessment(runner.store(), session_id, &preview, None);
        }
    }
    Ok(())
}

fn print_doors(doors: &[DoorScore]) {
    for line in render_doors(doors) {
        println!("{line}");
    }
    for line in render_gap_warnings(&gap_warnings(doors)) {
        println!("{line}");
    }
}

fn submit(
    runner: &EffectRunner,
    session_id: &str,
    wizard: &AssessmentWizard,
) -> Option<AssessmentOutcome> {
    runner.send(EngineCommand::StartAssessment {
        session_id: session_id.to_string(),
    });
    let started = runner.await_event(RESPONSE_WAIT, |event| match event {
        EngineEvent::AssessmentStarted(result) => Some(result),
        _ => None,
    })?;
    let started = match started {
        Ok(started) => started,
        Err(err) => {
            workshop_warn!("assessment start failed: {}", err);
            return None;
        }
    };
    workshop_info!("assessment {:?} started", started.assessment_id);

    runner.send(EngineCommand::SubmitAssessment {
        session_id: started.session_id,
        answers: wizard.answers().clone(),
    });
    let scored = runner.await_event(RESPONSE_WAIT, |event| match event {
        EngineEvent::AssessmentScored(result) => Some(result),
        _ => None,
    })?;
    match scored {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            workshop_warn!("assessment submit failed: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wizard_commands() {
        assert_eq!(parse_wizard_line(" /BACK "), WizardInput::Back);
        assert_eq!(parse_wizard_line("/quit"), WizardInput::Quit);
        assert_eq!(parse_wizard_line(" b "), WizardInput::Answer("b".into()));
    }
}
