//! Strict mode: notice severities and panic capture
//!
//! While a strict run is active a process-wide panic hook is chained in
//! front of the previous one. Panics raised inside [`catch`] on the same
//! thread are recorded (location only) and kept off stderr; every other
//! panic still reaches the previous hook. Dropping the [`PanicGuard`]
//! restores the previous hook.

use crate::fault::{Fault, Frame};
use bitflags::bitflags;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

bitflags! {
    /// Severities of non-fatal diagnostics a test can raise with
    /// [`Tester::notice`](crate::Tester::notice)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Severity: u32 {
        const NOTICE = 1 << 0;
        const WARNING = 1 << 1;
        const DEPRECATED = 1 << 2;
        const USER = 1 << 3;
    }
}

impl Severity {
    /// Build a mask from names (`notice`, `warning`, `deprecated`, `user`,
    /// `all`); unknown names are ignored
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Severity {
        names
            .iter()
            .fold(Severity::empty(), |mask, name| match name.as_ref() {
                "notice" => mask | Severity::NOTICE,
                "warning" => mask | Severity::WARNING,
                "deprecated" => mask | Severity::DEPRECATED,
                "user" => mask | Severity::USER,
                "all" => Severity::all(),
                _ => mask,
            })
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::all()
    }
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<Frame>> = const { RefCell::new(None) };
}

struct Installed {
    guards: usize,
    restore: Box<dyn FnOnce() + Send>,
}

/// Hook shared by every live guard; the previous hook comes back when the
/// last guard drops
static INSTALLED: Mutex<Option<Installed>> = Mutex::new(None);

/// Keeps the capturing panic hook installed
pub(crate) struct PanicGuard {
    _private: (),
}

impl PanicGuard {
    pub(crate) fn install() -> Self {
        let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);

        match installed.as_mut() {
            Some(state) => state.guards += 1,
            None => {
                *installed = Some(Installed {
                    guards: 1,
                    restore: chain_hook(),
                })
            }
        }

        PanicGuard { _private: () }
    }
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);

        let last = match installed.as_mut() {
            Some(state) => {
                state.guards -= 1;
                state.guards == 0
            }
            None => false,
        };

        if last {
            if let Some(state) = installed.take() {
                (state.restore)();
            }
        }
    }
}

/// Put the capturing hook in front of the current one and return the
/// function that undoes it
fn chain_hook() -> Box<dyn FnOnce() + Send> {
    let previous = Arc::new(panic::take_hook());
    let chained = Arc::clone(&previous);

    panic::set_hook(Box::new(move |info| {
        if CAPTURING.with(Cell::get) {
            let frame = info
                .location()
                .map(|location| Frame::new(location.file(), location.line()));
            LAST_PANIC.with(|slot| *slot.borrow_mut() = frame);
        } else {
            (*chained)(info);
        }
    }));

    Box::new(move || {
        // drops our hook, and with it the second reference to `previous`
        drop(panic::take_hook());

        match Arc::try_unwrap(previous) {
            Ok(hook) => panic::set_hook(hook),
            Err(shared) => panic::set_hook(Box::new(move |info| (*shared)(info))),
        }
    })
}

/// Run `body`, converting a panic into a [`Fault`] of kind `panic`.
///
/// When the strict hook is installed the fault carries the panic location.
pub(crate) fn catch<R>(body: impl FnOnce() -> R) -> Result<R, Fault> {
    let was_capturing = CAPTURING.with(|flag| flag.replace(true));
    LAST_PANIC.with(|slot| slot.borrow_mut().take());

    let outcome = panic::catch_unwind(AssertUnwindSafe(body));

    CAPTURING.with(|flag| flag.set(was_capturing));

    outcome.map_err(|payload| {
        let location = LAST_PANIC.with(|slot| slot.borrow_mut().take());
        Fault::from_panic(payload, location)
    })
}
