//! Connection-acquisition strategies for the lookup gateway.
//!
//! A lookup is one operation parameterized by how the pooled connection is
//! obtained. Clients choose a strategy with a selector string; anything
//! unrecognised falls back to the default acquisition path.

/// How the gateway obtains the connection that runs a keyed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStrategy {
    /// Borrowed checkout from the gateway's own pool. Selector `"0"` and
    /// every unrecognised or absent selector.
    PoolDefault,
    /// Owned checkout from the gateway's own pool. Selector `"1"`.
    OwnedCheckout,
    /// The connection bound to the inbound request, when one exists.
    /// Selector `"2"`; falls back to [`Self::PoolDefault`] without a
    /// request context (WebSocket and bare calls).
    RequestScoped,
    /// The process-wide bound pool. Selector `"3"`.
    ProcessBound,
    /// The application-state pool handle wired at server construction.
    /// Selector `"4"`.
    AppShared,
}

impl LookupStrategy {
    /// Every strategy, in selector order.
    pub const ALL: [Self; 5] = [
        Self::PoolDefault,
        Self::OwnedCheckout,
        Self::RequestScoped,
        Self::ProcessBound,
        Self::AppShared,
    ];

    /// Map a wire selector to a strategy.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("1") => Self::OwnedCheckout,
            Some("2") => Self::RequestScoped,
            Some("3") => Self::ProcessBound,
            Some("4") => Self::AppShared,
            _ => Self::PoolDefault,
        }
    }
}

impl Default for LookupStrategy {
    fn default() -> Self {
        Self::PoolDefault
    }
}
