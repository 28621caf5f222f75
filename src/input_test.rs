use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    assert!(!Modifiers::shift().command());
}

#[test]
fn modifiers_deserialize_from_dom_event_keys() {
    let m: Modifiers = serde_json::from_str(r#"{"shiftKey": true, "altKey": true}"#).unwrap();
    assert_eq!(m, Modifiers { shift: true, alt: true, ..Modifiers::default() });
    let m: Modifiers = serde_json::from_str(r#"{"meta": true}"#).unwrap();
    assert!(m.meta);
}

// =============================================================
// Button
// =============================================================

#[test]
fn button_from_dom_codes() {
    assert_eq!(Button::from_dom(0), Some(Button::Primary));
    assert_eq!(Button::from_dom(1), Some(Button::Middle));
    assert_eq!(Button::from_dom(2), Some(Button::Secondary));
    assert_eq!(Button::from_dom(3), None);
}

// =============================================================
// Gesture
// =============================================================

#[test]
fn gesture_default_is_idle() {
    assert!(Gesture::default().is_idle());
    assert!(!Gesture::Resizing(Handle::Se).is_idle());
    assert_ne!(Gesture::Resizing(Handle::Se), Gesture::Resizing(Handle::Nw));
}
