use crate::error::{LedgerError, Result};
use crate::ledger::LedgerState;
use serde_json::Value;

/// Parses a serialized snapshot, enforcing the structural minimum:
/// the document must be valid JSON, `version` must be present and
/// truthy, and `history` must be a sequence. Everything else is
/// permissive; missing fields take their defaults.
pub fn parse(text: &str) -> Result<LedgerState> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| LedgerError::InvalidFormat(e.to_string()))?;
    if !version_is_truthy(&value) {
        return Err(LedgerError::InvalidFormat(
            "missing or falsy `version` field".into(),
        ));
    }
    if !matches!(value.get("history"), Some(Value::Array(_))) {
        return Err(LedgerError::InvalidFormat(
            "`history` is not a sequence".into(),
        ));
    }
    // Second pass decodes into the typed state with field defaults.
    serde_json::from_str(text).map_err(|e| LedgerError::InvalidFormat(e.to_string()))
}

/// Renders the full state as a human-readable JSON document.
pub fn render(state: &LedgerState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

fn version_is_truthy(value: &Value) -> bool {
    match value.get("version") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
