//! Set operators over a caller equality.
//!
//! Each stage keeps a [`DedupSet`] that is only built on the first pull, so
//! constructing a pipeline never allocates. Results are first-seen values in
//! source order. Counts are never known cheaply.

mod distinct;
mod except;
mod union;

pub use distinct::Distinct;
pub use except::Except;
pub use union::Union;

use pullseq_core::EqualityComparer;
use pullseq_mem::DedupSet;

enum Seen<T, C> {
    Pending(C),
    Active(DedupSet<T, C>),
    Released,
}

impl<T, C: EqualityComparer<T>> Seen<T, C> {
    /// The set, built on first use with room for `hint` values. `None` once
    /// released.
    fn get(&mut self, hint: usize) -> Option<&mut DedupSet<T, C>> {
        if let Seen::Pending(_) = self {
            if let Seen::Pending(comparer) = std::mem::replace(self, Seen::Released) {
                *self = Seen::Active(DedupSet::with_capacity(hint, comparer));
            }
        }
        match self {
            Seen::Active(set) => Some(set),
            _ => None,
        }
    }

    fn release(&mut self) {
        *self = Seen::Released;
    }
}
