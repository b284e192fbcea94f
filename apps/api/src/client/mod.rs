/// Client-side usage gate — the bounded free-usage counter held entirely on
/// the client, re-derived from persisted key-value storage at startup.
///
/// This is a client-trust model by design: nothing server-side enforces the
/// quota, and clearing the local store resets it. The gate reproduces the
/// original behavior faithfully rather than adding server enforcement.
use std::collections::HashMap;

/// Free analyses before the gate closes.
pub const FREE_ANALYSES: u32 = 3;

/// Storage key marking that an email was captured.
pub const EMAIL_KEY: &str = "zeroname_email";
/// Storage key holding the usage counter as an integer string.
pub const USAGE_KEY: &str = "zeroname_usage";

/// Local persisted key-value storage. Absence of a key reads as the
/// zero/default value; there is no schema versioning.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, used by tests and as a fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// The gate's derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No email captured yet; the upload flow is not reachable.
    NoEmail,
    /// Email captured, quota not exhausted.
    EmailCaptured { usage: u32 },
    /// Quota exhausted. Terminal: no transition leads back out.
    LimitReached { usage: u32 },
}

/// Usage gate over a persisted store.
///
/// The counter is monotonically non-decreasing and incremented by exactly 1
/// per successfully completed analysis. Callers must check `can_analyze`
/// before constructing any request.
pub struct UsageGate<S: StateStore> {
    store: S,
}

impl<S: StateStore> UsageGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Re-derives the state from the store. A malformed counter value reads
    /// as zero.
    pub fn state(&self) -> GateState {
        let usage = self.usage();
        if self.store.get(EMAIL_KEY).is_none() {
            GateState::NoEmail
        } else if usage >= FREE_ANALYSES {
            GateState::LimitReached { usage }
        } else {
            GateState::EmailCaptured { usage }
        }
    }

    pub fn usage(&self) -> u32 {
        self.store
            .get(USAGE_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn remaining(&self) -> u32 {
        FREE_ANALYSES.saturating_sub(self.usage())
    }

    /// Records the captured email. Transitions unconditionally: the external
    /// email sink is best-effort and the gate never blocks on it.
    pub fn capture_email(&mut self, email: &str) {
        self.store.set(EMAIL_KEY, email);
    }

    /// Whether an analysis may be dispatched at all.
    pub fn can_analyze(&self) -> bool {
        matches!(self.state(), GateState::EmailCaptured { .. })
    }

    /// Increments the counter after a validated successful analysis. A failed
    /// attempt must not call this. Returns the new count.
    pub fn record_success(&mut self) -> u32 {
        let next = self.usage() + 1;
        self.store.set(USAGE_KEY, &next.to_string());
        next
    }
}
