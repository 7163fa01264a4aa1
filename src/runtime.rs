//! Tokio driver for [`CardForm`] settle timers.
//!
//! Every keystroke aborts the field's previous timer task and spawns a new
//! one that sleeps for the settle delay and then ticks the form. Dropping the
//! driver aborts every task and disposes the form, so no callback can run
//! after the owner is gone.
//!
//! Requires the `runtime` feature and must be used inside a tokio runtime.

use crate::form::{CardForm, Field, FormObserver};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// A [`CardForm`] whose settle timers run on tokio.
pub struct AsyncCardForm<O> {
    form: Arc<Mutex<CardForm<O>>>,
    timers: HashMap<Field, JoinHandle<()>>,
    origin: Instant,
}

fn lock<O>(form: &Mutex<CardForm<O>>) -> MutexGuard<'_, CardForm<O>> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<O> AsyncCardForm<O>
where
    O: FormObserver + Send + 'static,
{
    /// Wraps a form. Its clock starts now.
    pub fn new(form: CardForm<O>) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            timers: HashMap::new(),
            origin: Instant::now(),
        }
    }

    /// Feeds a keystroke and (re)starts the field's settle timer.
    ///
    /// Returns false if the form has been disposed.
    pub fn input(&mut self, field: Field, raw: &str) -> bool {
        let now = self.origin.elapsed();
        let delay = {
            let mut form = lock(&self.form);
            if form.input(field, raw, now).is_none() {
                return false;
            }
            form.config().settle_delay()
        };

        if let Some(previous) = self.timers.remove(&field) {
            previous.abort();
            trace!(%field, "settle timer replaced");
        }

        let form = Arc::clone(&self.form);
        let origin = self.origin;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Ticking also settles fields rescheduled as a side effect of
            // this edit, e.g. the CVC after a network change.
            lock(&form).tick(origin.elapsed());
        });
        self.timers.insert(field, handle);
        true
    }

    /// Runs `f` with shared access to the form.
    pub fn with_form<R>(&self, f: impl FnOnce(&CardForm<O>) -> R) -> R {
        f(&lock(&self.form))
    }

    /// Runs `f` with exclusive access to the form.
    pub fn with_form_mut<R>(&self, f: impl FnOnce(&mut CardForm<O>) -> R) -> R {
        f(&mut lock(&self.form))
    }

    /// Aborts every timer and disposes the form.
    pub fn dispose(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        lock(&self.form).dispose();
    }
}

impl<O> Drop for AsyncCardForm<O> {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        lock(&self.form).dispose();
    }
}
