use thiserror::Error;

/// Result type local to pullseq-mem.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("memory budget exceeded for tag '{tag}': requested {requested} bytes, capacity {capacity}, used {used}")]
    BudgetExceeded {
        tag: &'static str,
        requested: usize,
        capacity: usize,
        used: usize,
    },

    #[error("lease of {elements} elements of {elem_bytes} bytes overflows (tag '{tag}')")]
    CapacityOverflow {
        tag: &'static str,
        elements: usize,
        elem_bytes: usize,
    },
}

impl From<Error> for pullseq_core::Error {
    fn from(e: Error) -> Self {
        pullseq_core::Error::Allocation(e.to_string())
    }
}
