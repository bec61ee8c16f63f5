use serde_json::Value;

/// Store names the bridge watches and writes.
pub const ENABLED: &str = "ap.enabled";
pub const HEADING_COMMAND: &str = "ap.heading_command";

/// Last-known view of the autopilot values, fed from the state store.
///
/// Both fields start unknown and only ever follow what the store reported;
/// the bridge never invents a value. "Haven't heard yet" and "heard and it's
/// false/zero" are distinct states.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ApState {
    pub enabled: Option<bool>,
    pub heading_command: Option<f64>,
}

impl ApState {
    /// Merge one store update. The store feed is lax about types, so a value
    /// that does not coerce is dropped and the previous value kept.
    pub fn apply(&mut self, name: &str, value: &Value) {
        match name {
            ENABLED => {
                if let Some(b) = coerce_bool(value) {
                    self.enabled = Some(b);
                }
            }
            HEADING_COMMAND => {
                if let Some(deg) = coerce_finite(value) {
                    self.heading_command = Some(deg);
                }
            }
            _ => {}
        }
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

fn coerce_finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}
