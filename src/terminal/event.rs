use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::core::key::KeyToken;

/// Translates a terminal event into a key token. Only key presses of plain
/// (or shifted) characters and Ctrl+C are key commands.
pub fn to_key_token(event: &Event) -> Option<KeyToken> {
    let Event::Key(key_event) = event else {
        return None;
    };
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::trace!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => Some(KeyToken::Interrupt),
        (m, KeyCode::Char(_)) if m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => None,
        (_, KeyCode::Char(c)) => KeyToken::from_input(c.encode_utf8(&mut [0; 4])),
        _ => None,
    }
}
