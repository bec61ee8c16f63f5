pub mod buttons;
pub mod crc;
pub mod frame;

pub use buttons::{wrap_heading, ButtonEvent};
pub use frame::{Frame, AP_ENABLED_CODE, BUTTON_EVENT_CODE, FRAME_LEN};
