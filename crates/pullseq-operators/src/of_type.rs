//! Keep the elements whose runtime type is `R`.

use std::any::Any;
use std::marker::PhantomData;

use pullseq_core::{Offset, Result, Stage};

/// Filters boxed values by runtime type. Declines every fast path.
pub struct OfType<S, R> {
    _target: PhantomData<fn() -> R>,
    source: S,
}

impl<S, R> OfType<S, R>
where
    S: Stage<Item = Box<dyn Any>>,
    R: 'static,
{
    pub fn new(source: S) -> Self {
        Self {
            _target: PhantomData,
            source,
        }
    }
}

impl<S, R> Stage for OfType<S, R>
where
    S: Stage<Item = Box<dyn Any>>,
    R: 'static,
{
    type Item = R;

    fn try_get_count(&self) -> Option<usize> {
        None
    }

    fn try_get_view(&self) -> Option<&[R]> {
        None
    }

    fn try_bulk_copy(&mut self, _dest: &mut Vec<R>, _offset: Offset, _len: usize) -> Result<bool> {
        Ok(false)
    }

    fn try_pull_next(&mut self) -> Result<Option<R>> {
        while let Some(boxed) = self.source.try_pull_next()? {
            if let Ok(hit) = boxed.downcast::<R>() {
                return Ok(Some(*hit));
            }
        }
        Ok(None)
    }

    fn release(&mut self) {
        self.source.release();
    }
}
