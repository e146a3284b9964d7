//! Panic capture for test code.
//!
//! A process-wide panic hook is installed the first time test code runs.
//! While a thread is inside [`catching`], a panic on that thread is recorded
//! (location and backtrace) instead of printed. Panics anywhere else go to
//! the hook that was installed before.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;

use crate::ledger::CallSite;
use crate::raised::{captured_trace, Outcome, Raised};

#[derive(Default)]
struct Origin {
    site: Option<CallSite>,
    trace: Option<String>,
}

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
    static LAST_PANIC: RefCell<Option<Origin>> = RefCell::new(None);
}

static HOOK: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if DEPTH.with(Cell::get) == 0 {
            previous(info);
            return;
        }
        let origin = Origin {
            site: info
                .location()
                .map(|loc| CallSite::new(loc.file().to_string(), loc.line(), loc.column())),
            trace: captured_trace(Backtrace::capture()),
        };
        LAST_PANIC.with(|last| *last.borrow_mut() = Some(origin));
    }));
});

/// Marks the current thread as running test code until dropped.
struct Catching;

impl Catching {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Catching
    }
}

impl Drop for Catching {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Runs `f`, turning a panic into a [`Raised`] of kind `panic` located where
/// the panic happened.
pub(crate) fn catching(f: impl FnOnce() -> Outcome) -> Outcome {
    Lazy::force(&HOOK);
    let _catching = Catching::enter();
    LAST_PANIC.with(|last| last.borrow_mut().take());
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let origin = LAST_PANIC
            .with(|last| last.borrow_mut().take())
            .unwrap_or_default();
        Err(Raised::from_panic(payload).with_origin(origin.site, origin.trace))
    })
}
