//! Button events reported by the keypad firmware.

/// One physical button press, carried in the value field of a
/// `BUTTON_EVENT_CODE` frame. Values outside 1..=5 are not events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    HeadingDown10 = 1,
    HeadingDown1 = 2,
    Toggle = 3,
    HeadingUp10 = 4,
    HeadingUp1 = 5,
}

impl ButtonEvent {
    pub fn from_value(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::HeadingDown10),
            2 => Some(Self::HeadingDown1),
            3 => Some(Self::Toggle),
            4 => Some(Self::HeadingUp10),
            5 => Some(Self::HeadingUp1),
            _ => None,
        }
    }

    /// Heading adjustment in degrees, `None` for the toggle button.
    pub fn heading_delta(self) -> Option<f64> {
        match self {
            Self::HeadingDown10 => Some(-10.0),
            Self::HeadingDown1 => Some(-1.0),
            Self::Toggle => None,
            Self::HeadingUp10 => Some(10.0),
            Self::HeadingUp1 => Some(1.0),
        }
    }
}

/// Normalize a heading into [0, 360).
pub fn wrap_heading(deg: f64) -> f64 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_mapping() {
        assert_eq!(ButtonEvent::from_value(1), Some(ButtonEvent::HeadingDown10));
        assert_eq!(ButtonEvent::from_value(3), Some(ButtonEvent::Toggle));
        assert_eq!(ButtonEvent::from_value(5), Some(ButtonEvent::HeadingUp1));
        assert_eq!(ButtonEvent::from_value(0), None);
        assert_eq!(ButtonEvent::from_value(6), None);
        assert_eq!(ButtonEvent::from_value(0x100), None);
    }

    #[test]
    fn deltas() {
        assert_eq!(ButtonEvent::HeadingDown10.heading_delta(), Some(-10.0));
        assert_eq!(ButtonEvent::HeadingDown1.heading_delta(), Some(-1.0));
        assert_eq!(ButtonEvent::Toggle.heading_delta(), None);
        assert_eq!(ButtonEvent::HeadingUp1.heading_delta(), Some(1.0));
        assert_eq!(ButtonEvent::HeadingUp10.heading_delta(), Some(10.0));
    }

    #[test]
    fn heading_wraps() {
        assert_eq!(wrap_heading(370.0), 10.0);
        assert_eq!(wrap_heading(-5.0), 355.0);
        assert_eq!(wrap_heading(0.0), 0.0);
        assert_eq!(wrap_heading(360.0), 0.0);
        assert_eq!(wrap_heading(359.0 + 10.0), 9.0);
    }
}
