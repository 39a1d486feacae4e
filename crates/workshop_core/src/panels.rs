//! Paywall, endowment reminder and gap warnings derived from session state.
use crate::scoring::{DoorScore, DoorStatus};
use crate::SectionInfo;

/// Number of sections usable before the paywall appears.
pub const FREE_SECTIONS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaywallView {
    pub title: String,
    pub benefits: Vec<String>,
    pub locked_section: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndowmentReminder {
    pub progress: u8,
    pub answered: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapWarning {
    pub door: DoorScore,
    pub title: String,
    pub advice: String,
}

pub fn paywall(
    sections: &[SectionInfo],
    current_section: Option<&str>,
    unlocked: bool,
) -> Option<PaywallView> {
    if unlocked {
        return None;
    }
    let current = sections
        .iter()
        .find(|section| Some(section.id.as_str()) == current_section)?;
    if current.ordinal <= FREE_SECTIONS {
        return None;
    }
    Some(PaywallView {
        title: "Vollversion freischalten".to_string(),
        benefits: vec![
            "Alle Abschnitte Ihres Businessplans".to_string(),
            "Persönliches Coaching zu jeder Antwort".to_string(),
            "Export als PDF, Word und Excel-Finanzplan".to_string(),
        ],
        locked_section: current.title.clone(),
    })
}

pub fn endowment_reminder(progress: u8, answered: usize) -> Option<EndowmentReminder> {
    if !(20..100).contains(&progress) || answered == 0 {
        return None;
    }
    Some(EndowmentReminder {
        progress,
        answered,
        text: format!(
            "Sie haben bereits {answered} Antworten gegeben und {progress}% Ihres Businessplans erarbeitet. Diese Arbeit bleibt gespeichert."
        ),
    })
}

/// Warnings for doors that are not yet passed, blocked doors first.
pub fn gap_warnings(doors: &[DoorScore]) -> Vec<GapWarning> {
    let mut open: Vec<&DoorScore> = doors
        .iter()
        .filter(|door| door.status != DoorStatus::Passed)
        .collect();
    open.sort_by_key(|door| (door.status, door.door));
    open.into_iter()
        .map(|door| GapWarning {
            door: *door,
            title: door.door.title().to_string(),
            advice: match door.status {
                DoorStatus::Blocked => format!(
                    "{} ist derzeit nicht erfüllt ({} Punkte). Ohne Nachweis droht die Ablehnung.",
                    door.door.title(),
                    door.score
                ),
                _ => format!(
                    "{} ist gefährdet ({} Punkte). Ergänzen Sie Nachweise oder Erfahrungen.",
                    door.door.title(),
                    door.score
                ),
            },
        })
        .collect()
}
