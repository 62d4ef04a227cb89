use crate::{
    fault::Fault,
    outcome::{failure, success, Outcome},
};
use futures_util::{future::poll_fn, pin_mut, FutureExt};
use log::{debug, warn};
use std::{
    any::Any,
    backtrace::{Backtrace, BacktraceStatus},
    cell::{Cell, RefCell},
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

/// Category reported for every absorbed defect.
const DEFECT_CATEGORY: &str = "panic";

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    /// `Some(force_backtrace)` while a capture boundary runs user code on this thread.
    static ARMED: Cell<Option<bool>> = Cell::new(None);

    /// Backtrace recorded by the panic hook at the panic site.
    static PANIC_TRACE: RefCell<Option<Backtrace>> = RefCell::new(None);
}

/// Installs, once per process, a panic hook that records a backtrace for armed
/// threads and then hands over to whatever hook was set before.
/// A hook set by the application afterwards replaces it, defects then carry no trace.
fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            if let Some(force) = ARMED.with(Cell::get) {
                let trace = if force {
                    Backtrace::force_capture()
                } else {
                    Backtrace::capture()
                };
                PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            }

            previous(info);
        }));
    });
}

/// Keeps current thread armed until dropped.
struct Armed {
    previous: Option<bool>,
}

impl Drop for Armed {
    fn drop(&mut self) {
        ARMED.with(|armed| armed.set(self.previous));
    }
}

/// What a capture boundary does with a defect (a panic) raised by the wrapped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefectPolicy {
    /// Re-wraps the defect as a failed outcome carrying a `Fault::defect`.
    #[default]
    Absorb,

    /// Resumes unwinding, the defect reaches the caller untouched.
    Propagate,
}

/// Configuration of a capture boundary.
///
/// Free functions `from_sync` and `from_async` run with `Capture::default()`,
/// which absorbs defects and embeds a backtrace only when `RUST_BACKTRACE` asks for it.
///
/// ```rust
/// use routcome::{Capture, DefectPolicy, Fault};
///
/// let capture = Capture::new()
///     .policy(DefectPolicy::Absorb)
///     .force_backtrace(false);
///
/// let out = capture.run(|| -> Result<i32, Fault> { panic!("boom") });
/// assert!(out.fold(|_| false, |fault| fault.is_defect()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Capture {
    policy: DefectPolicy,

    /// Captures backtrace even if it is disabled through environment.
    force_backtrace: bool,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets policy field.
    pub fn policy(mut self, policy: DefectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets force_backtrace field.
    pub fn force_backtrace(mut self, force: bool) -> Self {
        self.force_backtrace = force;
        self
    }

    /// Calls `op` right away and classifies how it finished:
    /// `Ok` becomes a success, `Err` a failure with the fault unchanged
    /// and a panic is handled according to the policy.
    pub fn run<T, E, Op>(self, op: Op) -> Outcome<T, Fault>
    where
        Op: FnOnce() -> Result<T, E>,
        E: Into<Fault>,
    {
        let caught = {
            let _armed = self.arm();
            panic::catch_unwind(AssertUnwindSafe(op))
        };

        match caught {
            Ok(result) => classify(result),
            Err(payload) => self.on_defect(payload),
        }
    }

    /// Asynchronous version of `run`. Panics raised while calling `op`
    /// and while polling its future are both treated as defects.
    pub async fn run_async<T, E, Fut, Op>(self, op: Op) -> Outcome<T, Fault>
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Fault>,
    {
        let started = {
            let _armed = self.arm();
            panic::catch_unwind(AssertUnwindSafe(op))
        };
        let pending = match started {
            Ok(pending) => pending,
            Err(payload) => return self.on_defect(payload),
        };
        pin_mut!(pending);

        // Armed per poll, consecutive polls may run on different threads.
        let armed = poll_fn(|cx| {
            let _armed = self.arm();
            pending.as_mut().poll(cx)
        });

        match AssertUnwindSafe(armed).catch_unwind().await {
            Ok(result) => classify(result),
            Err(payload) => self.on_defect(payload),
        }
    }

    /// Marks current thread so the panic hook records a backtrace.
    fn arm(&self) -> Armed {
        install_hook();
        PANIC_TRACE.with(|slot| *slot.borrow_mut() = None);

        Armed {
            previous: ARMED.with(|armed| armed.replace(Some(self.force_backtrace))),
        }
    }

    fn on_defect<T>(&self, payload: Box<dyn Any + Send>) -> Outcome<T, Fault> {
        let message = payload_message(payload.as_ref()).to_owned();
        let trace = PANIC_TRACE.with(|slot| slot.borrow_mut().take());

        match self.policy {
            DefectPolicy::Propagate => {
                debug!("Capture::on_defect - propagating: {}", message);
                panic::resume_unwind(payload)
            }
            DefectPolicy::Absorb => {
                warn!("Capture::on_defect - absorbed: {}", message);
                failure(Fault::defect(DEFECT_CATEGORY, with_trace(message, trace)))
            }
        }
    }
}

/// Appends backtrace recorded at the panic site, if there is one.
fn with_trace(message: String, trace: Option<Backtrace>) -> String {
    match trace {
        Some(trace) if trace.status() == BacktraceStatus::Captured => {
            format!("{}\n{}", message, trace)
        }
        _ => message,
    }
}

fn classify<T, E>(result: Result<T, E>) -> Outcome<T, Fault>
where
    E: Into<Fault>,
{
    result.map_err(Into::into).into()
}

/// Extracts message from panic payload. `panic!` produces either
/// `&'static str` or `String`, anything else is opaque.
fn payload_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(&s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}

/// Runs `op` with default capture configuration.
///
/// ```rust
/// use routcome::{failure, from_sync, success, Fault};
///
/// assert_eq!(from_sync(|| Ok::<_, Fault>(1)), success(1));
/// assert_eq!(
///     from_sync(|| Err::<i32, _>(Fault::new("x"))),
///     failure(Fault::new("x"))
/// );
/// ```
pub fn from_sync<T, E, Op>(op: Op) -> Outcome<T, Fault>
where
    Op: FnOnce() -> Result<T, E>,
    E: Into<Fault>,
{
    Capture::default().run(op)
}

/// Awaits future returned by `op` with default capture configuration.
pub async fn from_async<T, E, Fut, Op>(op: Op) -> Outcome<T, Fault>
where
    Op: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Fault>,
{
    Capture::default().run_async(op).await
}

/// Success if `value` is present, otherwise failure built by `on_error`.
pub fn from_nullable<T, E, OnError>(value: Option<T>, on_error: OnError) -> Outcome<T, E>
where
    OnError: FnOnce() -> E,
{
    match value {
        Some(value) => success(value),
        None => failure(on_error()),
    }
}

/// Calls exactly one of `on_success` and `on_error`, picked by `condition`.
pub fn from_predicate<T, E, OnSuccess, OnError>(
    condition: bool,
    on_success: OnSuccess,
    on_error: OnError,
) -> Outcome<T, E>
where
    OnSuccess: FnOnce() -> T,
    OnError: FnOnce() -> E,
{
    if condition {
        success(on_success())
    } else {
        failure(on_error())
    }
}
