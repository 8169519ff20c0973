//! Non-blocking keyboard collection and the mapping to viewer actions.

use crate::catalog::BodyId;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub(crate) enum ViewerAction {
    /// Point the camera at a body.
    View(BodyId),
    OrbitLeft,
    OrbitRight,
    OrbitUp,
    OrbitDown,
    /// Adjust the camera standoff distance.
    Nearer,
    Farther,
    ToggleDistanceMode,
    ToggleLabels,
    ToggleOrbits,
    TogglePause,
    Quit,
}

pub(crate) fn collect_input_nonblocking(
    max_frame_time: Duration,
) -> anyhow::Result<Vec<KeyCode>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(k.code);
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_action(key: KeyCode) -> Option<ViewerAction> {
    match key {
        KeyCode::Char('0') => Some(ViewerAction::View(BodyId::Sun)),
        KeyCode::Char('1') => Some(ViewerAction::View(BodyId::Mercury)),
        KeyCode::Char('2') => Some(ViewerAction::View(BodyId::Venus)),
        KeyCode::Char('3') => Some(ViewerAction::View(BodyId::Earth)),
        KeyCode::Char('4') => Some(ViewerAction::View(BodyId::Mars)),
        KeyCode::Char('5') => Some(ViewerAction::View(BodyId::Jupiter)),
        KeyCode::Char('6') => Some(ViewerAction::View(BodyId::Saturn)),
        KeyCode::Char('7') => Some(ViewerAction::View(BodyId::Uranus)),
        KeyCode::Char('8') => Some(ViewerAction::View(BodyId::Neptune)),
        KeyCode::Char('9') => Some(ViewerAction::View(BodyId::Moon)),

        KeyCode::Left => Some(ViewerAction::OrbitLeft),
        KeyCode::Right => Some(ViewerAction::OrbitRight),
        KeyCode::Up => Some(ViewerAction::OrbitUp),
        KeyCode::Down => Some(ViewerAction::OrbitDown),

        KeyCode::Char('d') => Some(ViewerAction::Nearer),
        KeyCode::Char('D') => Some(ViewerAction::Farther),

        KeyCode::Char('m') | KeyCode::Char('M') => Some(ViewerAction::ToggleDistanceMode),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(ViewerAction::ToggleLabels),
        KeyCode::Char('o') | KeyCode::Char('O') => Some(ViewerAction::ToggleOrbits),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(ViewerAction::TogglePause),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(ViewerAction::Quit),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_select_bodies_in_catalog_order() {
        for (ch, id) in ('0'..='9').zip(BodyId::ALL) {
            match map_key_to_action(KeyCode::Char(ch)) {
                Some(ViewerAction::View(got)) => assert_eq!(got, id),
                other => panic!("key {ch}: unexpected mapping {other:?}"),
            }
        }
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert!(map_key_to_action(KeyCode::Char('z')).is_none());
        assert!(map_key_to_action(KeyCode::Tab).is_none());
    }
}
