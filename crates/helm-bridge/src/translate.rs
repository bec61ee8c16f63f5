use helm_proto::{wrap_heading, ButtonEvent};

use crate::state::ApState;

/// One pending store write produced from a button press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreWrite {
    Enabled(bool),
    Heading(f64),
}

/// Map a button press onto at most one autopilot write.
///
/// Toggle with unknown enabled-state enables (the keypad shows unknown as
/// off, and the first press should turn the pilot on, not be swallowed).
/// Heading nudges with an unknown heading are dropped since there is nothing
/// to add the delta to.
pub fn translate(event: ButtonEvent, state: &ApState) -> Option<StoreWrite> {
    match event.heading_delta() {
        None => Some(StoreWrite::Enabled(!state.enabled.unwrap_or(false))),
        Some(delta) => {
            let heading = state.heading_command?;
            Some(StoreWrite::Heading(wrap_heading(heading + delta)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(enabled: bool, heading: f64) -> ApState {
        ApState { enabled: Some(enabled), heading_command: Some(heading) }
    }

    #[test]
    fn toggle_from_unknown_enables() {
        let state = ApState::default();
        assert_eq!(translate(ButtonEvent::Toggle, &state), Some(StoreWrite::Enabled(true)));
    }

    #[test]
    fn toggle_negates_known_state() {
        assert_eq!(
            translate(ButtonEvent::Toggle, &known(true, 0.0)),
            Some(StoreWrite::Enabled(false))
        );
        assert_eq!(
            translate(ButtonEvent::Toggle, &known(false, 0.0)),
            Some(StoreWrite::Enabled(true))
        );
    }

    #[test]
    fn heading_nudge_on_unknown_heading_is_dropped() {
        let state = ApState { enabled: Some(true), heading_command: None };
        assert_eq!(translate(ButtonEvent::HeadingUp1, &state), None);
    }

    #[test]
    fn heading_nudge_wraps() {
        assert_eq!(
            translate(ButtonEvent::HeadingUp10, &known(true, 355.0)),
            Some(StoreWrite::Heading(5.0))
        );
        assert_eq!(
            translate(ButtonEvent::HeadingDown10, &known(true, 5.0)),
            Some(StoreWrite::Heading(355.0))
        );
        assert_eq!(
            translate(ButtonEvent::HeadingDown1, &known(false, 0.0)),
            Some(StoreWrite::Heading(359.0))
        );
        assert_eq!(
            translate(ButtonEvent::HeadingUp1, &known(false, 123.0)),
            Some(StoreWrite::Heading(124.0))
        );
    }
}
