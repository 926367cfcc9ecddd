use crate::entry::Entry;
use crate::error::{LedgerError, Result};
use crate::eval;
use crate::money::{round2, today_iso};
use crate::snapshot;
use crate::store::{InMemoryStore, STORE_KEY, SnapshotStore};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SCHEMA_VERSION: u32 = 1;

/// The whole persisted unit: schema tag, current balance, expiry date
/// of the budgeting period, and the append-only entry history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerState {
    pub version: u32,
    pub balance: Decimal,
    pub expiry: String,
    pub history: Vec<Entry>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            balance: Decimal::ZERO,
            expiry: today_iso(),
            history: Vec::new(),
        }
    }
}

/// Owns the ledger state and every mutating operation over it. Each
/// mutation is followed by a write-through of the whole serialized
/// state; the store never holds a live reference.
pub struct Ledger<S: SnapshotStore = InMemoryStore> {
    state: LedgerState,
    store: S,
}

impl<S: SnapshotStore> Ledger<S> {
    /// Loads the persisted snapshot from `store`, falling back to the
    /// default state if it is absent or invalid. Corruption degrades
    /// silently; the warning is the only trace of it.
    pub fn open(store: S) -> Self {
        let state = match store.get(STORE_KEY) {
            Some(text) => match snapshot::parse(&text) {
                Ok(state) => state,
                Err(err) => {
                    warn!(%err, "stored snapshot is invalid, starting from defaults");
                    LedgerState::default()
                }
            },
            None => LedgerState::default(),
        };
        Self { state, store }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn balance(&self) -> Decimal {
        self.state.balance
    }

    pub fn expiry(&self) -> &str {
        &self.state.expiry
    }

    pub fn history(&self) -> &[Entry] {
        &self.state.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the storage collaborator, dropping the in-memory state.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Evaluates `raw` as a balance adjustment and appends it.
    ///
    /// The trimmed text gets a `+` prepended unless it already starts
    /// with an operator, so a bare amount means an increase. Fails
    /// before any mutation; on success exactly one entry is appended,
    /// the balance updated and the state persisted.
    pub fn add_entry(&mut self, raw: &str, description: &str) -> Result<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::EmptyInput);
        }
        let expr = if matches!(trimmed.chars().next(), Some('+' | '-' | '*' | '/')) {
            trimmed.to_string()
        } else {
            format!("+{trimmed}")
        };
        let delta = eval::evaluate(&expr)?;
        let balance = round2(self.state.balance + delta);
        self.state.history.push(Entry {
            ts: Utc::now().timestamp_millis(),
            expr,
            desc: description.to_string(),
            delta,
            balance,
        });
        self.state.balance = balance;
        debug!(%delta, %balance, "entry added");
        self.persist();
        Ok(delta)
    }

    /// Removes the most recent entry, if any. The balance is then
    /// recomputed from the surviving deltas rather than adjusted
    /// incrementally, so any prior drift heals here.
    pub fn undo(&mut self) -> bool {
        if self.state.history.pop().is_none() {
            return false;
        }
        self.recompute_balance();
        debug!(balance = %self.state.balance, "last entry removed");
        self.persist();
        true
    }

    /// Sets the balance to the rounded sum of all deltas. Idempotent.
    pub fn recompute_balance(&mut self) {
        let sum: Decimal = self.state.history.iter().map(|e| e.delta).sum();
        self.state.balance = round2(sum);
    }

    /// Replaces the expiry date unconditionally. Validating the date
    /// (format, not-in-the-past) is the caller's concern.
    pub fn update_expiry(&mut self, date: impl Into<String>) {
        self.state.expiry = date.into();
        self.persist();
    }

    /// Replaces the entire state with a parsed snapshot. No merge:
    /// either the whole document is accepted or nothing changes.
    pub fn import_data(&mut self, text: &str) -> Result<()> {
        let state = snapshot::parse(text)?;
        self.state = state;
        debug!(entries = self.state.history.len(), "snapshot imported");
        self.persist();
        Ok(())
    }

    /// Serializes the full current state. Pure.
    pub fn export_data(&self) -> Result<String> {
        Ok(snapshot::render(&self.state)?)
    }

    fn persist(&mut self) {
        match snapshot::render(&self.state) {
            Ok(text) => self.store.set(STORE_KEY, &text),
            Err(err) => warn!(%err, "failed to serialize snapshot"),
        }
    }
}
