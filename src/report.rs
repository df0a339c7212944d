//! Side-button report decoding
//!
//! The Rapoo 2.4G dongle delivers button state on hidraw as fixed-layout
//! reports: byte 0 is the report type, byte 1 a button bitmask. Only
//! type-1 reports carry the side buttons. The bit positions below were
//! observed on the M50 Plus/Silent dongle (24AE:2015) and are specific to
//! that hardware revision.

/// Report type carrying the button bitmask.
pub const REPORT_TYPE_BUTTONS: u8 = 0x01;

/// Bitmask bit for the rear side button.
pub const MASK_BACK: u8 = 0x10;

/// Bitmask bit for the front side button.
pub const MASK_FORWARD: u8 = 0x08;

/// Extract the button mask from a raw report, if it is one we recognize.
///
/// Anything shorter than two bytes or with a different report type is not
/// ours to interpret; the caller ignores it.
pub fn parse_report(data: &[u8]) -> Option<u8> {
    if data.len() >= 2 && data[0] == REPORT_TYPE_BUTTONS {
        Some(data[1])
    } else {
        None
    }
}

/// The two logical side buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Back,
    Forward,
}

/// A press (true) or release (false) transition of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub button: Button,
    pub pressed: bool,
}

/// Last observed state of both side buttons.
///
/// There is exactly one of these per session, even when several hidraw
/// nodes are open for the same physical device.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    back: bool,
    forward: bool,
}

impl ButtonState {
    /// Compare a freshly decoded mask against the stored state, update the
    /// state, and return one edge per button that changed. Back is reported
    /// before forward when both change in the same report.
    pub fn apply_mask(&mut self, mask: u8) -> Vec<Edge> {
        let back = mask & MASK_BACK != 0;
        let forward = mask & MASK_FORWARD != 0;

        let mut edges = Vec::new();
        if back != self.back {
            self.back = back;
            edges.push(Edge {
                button: Button::Back,
                pressed: back,
            });
        }
        if forward != self.forward {
            self.forward = forward;
            edges.push(Edge {
                button: Button::Forward,
                pressed: forward,
            });
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_short_reports() {
        assert_eq!(parse_report(&[]), None);
        assert_eq!(parse_report(&[0x01]), None);
    }

    #[test]
    fn test_parse_rejects_other_report_types() {
        assert_eq!(parse_report(&[0x02, 0x18]), None);
        assert_eq!(parse_report(&[0x00, 0x18, 0x00]), None);
    }

    #[test]
    fn test_parse_accepts_button_reports() {
        assert_eq!(parse_report(&[0x01, 0x18]), Some(0x18));
        // Trailing bytes beyond the mask are unused but harmless
        assert_eq!(parse_report(&[0x01, 0x00, 0xff, 0xff]), Some(0x00));
    }

    #[test]
    fn test_both_buttons_press_in_order() {
        let mut state = ButtonState::default();
        let edges = state.apply_mask(MASK_BACK | MASK_FORWARD);
        assert_eq!(
            edges,
            vec![
                Edge { button: Button::Back, pressed: true },
                Edge { button: Button::Forward, pressed: true },
            ]
        );
    }

    #[test]
    fn test_no_change_no_edges() {
        let mut state = ButtonState::default();
        assert!(state.apply_mask(0x00).is_empty());

        // Press back, then repeat the same mask: only the first yields an edge
        assert_eq!(state.apply_mask(MASK_BACK).len(), 1);
        assert!(state.apply_mask(MASK_BACK).is_empty());
    }

    #[test]
    fn test_release_edge() {
        let mut state = ButtonState::default();
        state.apply_mask(MASK_FORWARD);

        let edges = state.apply_mask(0x00);
        assert_eq!(
            edges,
            vec![Edge { button: Button::Forward, pressed: false }]
        );
    }

    #[test]
    fn test_unrelated_mask_bits_ignored() {
        let mut state = ButtonState::default();
        // Bits outside 0x10/0x08 never produce edges
        assert!(state.apply_mask(0xe7).is_empty());
    }

    #[test]
    fn test_independent_buttons() {
        let mut state = ButtonState::default();
        state.apply_mask(MASK_BACK);

        // Forward press while back is held: one edge, back untouched
        let edges = state.apply_mask(MASK_BACK | MASK_FORWARD);
        assert_eq!(
            edges,
            vec![Edge { button: Button::Forward, pressed: true }]
        );

        // Back release while forward stays held
        let edges = state.apply_mask(MASK_FORWARD);
        assert_eq!(edges, vec![Edge { button: Button::Back, pressed: false }]);
    }
}
