/// Errors raised while reconciling an audit listing.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The node returned more than one entry for the same payment hash in
    /// one direction within the window. Silently keeping either entry would
    /// corrupt the aggregates, so this is surfaced instead.
    #[error("duplicate {direction} entry for payment hash {payment_hash}")]
    DuplicateHash {
        payment_hash: String,
        direction: &'static str,
    },

    /// A payment's parts span more than one channel. Multi-path payments
    /// across different channels are not modelled by this reconciliation.
    #[error("multi-path payment across different channels is not supported (hash {payment_hash}, {direction})")]
    MultiPathUnsupported {
        payment_hash: String,
        direction: &'static str,
    },

    /// An entry with no parts carries no timestamp or channel to aggregate.
    #[error("{direction} entry for payment hash {payment_hash} has no parts")]
    EmptyEntry {
        payment_hash: String,
        direction: &'static str,
    },
}
