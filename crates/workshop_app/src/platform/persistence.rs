use serde::{Deserialize, Serialize};
use workshop_core::{ChecklistItem, DoorScore, Msg, PersistedChat, StarredTip};
use workshop_engine::{LocalStore, PersonalityProfile, StorageSlot};
use workshop_logging::{workshop_error, workshop_info};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct StoredChat {
    session_id: String,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
    #[serde(default)]
    progress: u8,
    #[serde(default)]
    current_section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChecklistItem {
    id: String,
    label: String,
    done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTip {
    id: String,
    text: String,
    #[serde(default)]
    section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoredAnnotations {
    #[serde(default)]
    checklist: Vec<StoredChecklistItem>,
    #[serde(default)]
    starred_tips: Vec<StoredTip>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDoor {
    door: String,
    score: u8,
    status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPersonality {
    label: String,
    traits: Vec<String>,
}

pub(crate) fn load_chat(store: &LocalStore, session_id: &str) -> Option<PersistedChat> {
    let stored: StoredChat = store.get_slot(session_id, StorageSlot::Chat)?;
    workshop_info!("restoring chat session at {}%", stored.progress);
    Some(PersistedChat {
        session_id: stored.session_id,
        user_name: stored.user_name,
        user_email: stored.user_email,
        progress: stored.progress,
        current_section: stored.current_section,
    })
}

/// Also records the session as the one to resume next time.
pub(crate) fn save_chat(store: &LocalStore, chat: &PersistedChat) {
    let stored = StoredChat {
        session_id: chat.session_id.clone(),
        user_name: chat.user_name.clone(),
        user_email: chat.user_email.clone(),
        progress: chat.progress,
        current_section: chat.current_section.clone(),
    };
    if let Err(err) = store.set_slot(&chat.session_id, StorageSlot::Chat, &stored) {
        workshop_error!("failed to persist chat session: {}", err);
        return;
    }
    if let Err(err) = store.set_last_session(&chat.session_id) {
        workshop_error!("failed to remember last session: {}", err);
    }
}

/// Sidebar and annotation state as a message for the store.
pub(crate) fn load_local_state(store: &LocalStore, session_id: &str) -> Msg {
    let sidebar_collapsed = store
        .get_slot(session_id, StorageSlot::Sidebar)
        .unwrap_or(false);
    let annotations: StoredAnnotations = store
        .get_slot(session_id, StorageSlot::Annotations)
        .unwrap_or_default();
    Msg::LocalStateRestored {
        sidebar_collapsed,
        checklist: annotations
            .checklist
            .into_iter()
            .map(|item| ChecklistItem {
                id: item.id,
                label: item.label,
                done: item.done,
            })
            .collect(),
        starred_tips: annotations
            .starred_tips
            .into_iter()
            .map(|tip| StarredTip {
                id: tip.id,
                text: tip.text,
                section: tip.section,
            })
            .collect(),
    }
}

pub(crate) fn save_annotations(
    store: &LocalStore,
    session_id: &str,
    checklist: &[ChecklistItem],
    starred_tips: &[StarredTip],
) {
    let stored = StoredAnnotations {
        checklist: checklist
            .iter()
            .map(|item| StoredChecklistItem {
                id: item.id.clone(),
                label: item.label.clone(),
                done: item.done,
            })
            .collect(),
        starred_tips: starred_tips
            .iter()
            .map(|tip| StoredTip {
                id: tip.id.clone(),
                text: tip.text.clone(),
                section: tip.section.clone(),
            })
            .collect(),
    };
    if let Err(err) = store.set_slot(session_id, StorageSlot::Annotations, &stored) {
        workshop_error!("failed to persist annotations: {}", err);
    }
}

pub(crate) fn save_sidebar(store: &LocalStore, session_id: &str, collapsed: bool) {
    if let Err(err) = store.set_slot(session_id, StorageSlot::Sidebar, &collapsed) {
        workshop_error!("failed to persist sidebar state: {}", err);
    }
}

pub(crate) fn save_assessment(
    store: &LocalStore,
    session_id: &str,
    doors: &[DoorScore],
    personality: Option<&PersonalityProfile>,
) {
    let stored: Vec<StoredDoor> = doors
        .iter()
        .map(|door| StoredDoor {
            door: door.door.key().to_string(),
            score: door.score,
            status: door.status.key().to_string(),
        })
        .collect();
    if let Err(err) = store.set_slot(session_id, StorageSlot::GzDoors, &stored) {
        workshop_error!("failed to persist door scores: {}", err);
    }
    if let Some(profile) = personality {
        let stored = StoredPersonality {
            label: profile.label.clone(),
            traits: profile.traits.clone(),
        };
        if let Err(err) = store.set_slot(session_id, StorageSlot::Personality, &stored) {
            workshop_error!("failed to persist personality profile: {}", err);
        }
    }
}
