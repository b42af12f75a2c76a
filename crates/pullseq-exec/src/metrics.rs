//! Tracing hooks for terminal consumers.
//!
//! Compiled to no-ops unless the `tracing` feature is on.

/// Which accessor a terminal ended up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    Count,
    View,
    BulkCopy,
    Pull,
}

impl AccessPath {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessPath::Count => "count",
            AccessPath::View => "view",
            AccessPath::BulkCopy => "bulk_copy",
            AccessPath::Pull => "pull",
        }
    }
}

#[cfg(feature = "tracing")]
pub fn record_access(terminal: &'static str, path: AccessPath) {
    tracing::trace!(terminal, path = path.as_str(), "terminal access");
}

#[cfg(not(feature = "tracing"))]
pub fn record_access(_terminal: &'static str, _path: AccessPath) { /* no-op */
}

#[cfg(feature = "tracing")]
pub fn record_release(items_pulled: usize) {
    tracing::trace!(items_pulled, "cursor released");
}

#[cfg(not(feature = "tracing"))]
pub fn record_release(_items_pulled: usize) { /* no-op */
}
