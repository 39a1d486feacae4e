use workshop_core::{update, ChatState, ChecklistItem, Effect, Msg, StarredTip};

fn tip(id: &str) -> StarredTip {
    StarredTip {
        id: id.to_string(),
        text: format!("Tipp {id}"),
        section: Some("zielgruppe".to_string()),
    }
}

fn item(id: &str, done: bool) -> ChecklistItem {
    ChecklistItem {
        id: id.to_string(),
        label: format!("Aufgabe {id}"),
        done,
    }
}

#[test]
fn starring_a_tip_twice_keeps_one_entry() {
    let state = ChatState::new("s1");
    let (state, effects) = update(state, Msg::TipStarred(tip("t1")));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.starred_tips().len(), 1);

    let (state, effects) = update(state, Msg::TipStarred(tip("t1")));
    assert!(effects.is_empty());
    assert_eq!(state.starred_tips().len(), 1);
}

#[test]
fn unstarring_emits_persist_effect() {
    let (state, _) = update(ChatState::new("s1"), Msg::TipStarred(tip("t1")));
    let (state, effects) = update(
        state,
        Msg::TipUnstarred {
            id: "t1".to_string(),
        },
    );

    assert!(state.starred_tips().is_empty());
    assert_eq!(
        effects,
        vec![Effect::PersistAnnotations {
            session_id: "s1".to_string(),
            checklist: Vec::new(),
            starred_tips: Vec::new(),
        }]
    );

    let (_, effects) = update(
        state,
        Msg::TipUnstarred {
            id: "t1".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn checklist_merge_dedupes_by_id_and_keeps_local_progress() {
    let state = ChatState::new("s1");
    let (state, _) = update(
        state,
        Msg::ChecklistReceived(vec![item("c1", false), item("c2", false)]),
    );
    let (state, effects) = update(
        state,
        Msg::ChecklistToggled {
            id: "c1".to_string(),
        },
    );
    assert_eq!(effects.len(), 1);

    let (state, _) = update(
        state,
        Msg::ChecklistReceived(vec![item("c1", false), item("c3", true)]),
    );
    let ids: Vec<_> = state.checklist().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    assert!(state.checklist()[0].done);
    assert!(state.checklist()[2].done);
}

#[test]
fn toggling_unknown_checklist_item_is_ignored() {
    let (mut state, effects) = update(
        ChatState::new("s1"),
        Msg::ChecklistToggled {
            id: "nope".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn restored_local_state_dedupes_tips() {
    let (state, effects) = update(
        ChatState::new("s1"),
        Msg::LocalStateRestored {
            sidebar_collapsed: true,
            checklist: vec![item("c1", true)],
            starred_tips: vec![tip("t1"), tip("t1"), tip("t2")],
        },
    );
    assert!(effects.is_empty());
    assert!(state.sidebar_collapsed());
    assert_eq!(state.starred_tips().len(), 2);
    assert_eq!(state.checklist().len(), 1);
}
