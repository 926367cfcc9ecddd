use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One recorded balance adjustment. Field names match the snapshot
/// wire format. `delta` is kept unrounded as evaluated; `balance` is
/// the ledger balance right after this entry, rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    /// Creation time, milliseconds since the epoch.
    pub ts: i64,
    /// Normalized expression text, leading sign always explicit.
    pub expr: String,
    pub desc: String,
    pub delta: Decimal,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_wire_names() {
        let entry = Entry {
            ts: 1700000000000,
            expr: "+100".into(),
            desc: "Initial".into(),
            delta: dec!(100),
            balance: dec!(100),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["ts"], 1700000000000i64);
        assert_eq!(json["expr"], "+100");
        assert_eq!(json["desc"], "Initial");
        assert!(json["delta"].is_number());
        assert!(json["balance"].is_number());
    }

    #[test]
    fn test_entry_missing_fields_default() {
        let entry: Entry = serde_json::from_str(r#"{"expr": "+1"}"#).unwrap();
        assert_eq!(entry.expr, "+1");
        assert_eq!(entry.ts, 0);
        assert_eq!(entry.delta, Decimal::ZERO);
    }
}
