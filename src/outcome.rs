use crate::fault::Fault;
use futures_util::future::{ready, Either};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Variant<S, F> {
    Success(S),
    Failure(F),
}

/// Result of an operation: exactly one of a success value `S` or a fault `F`.
///
/// Variants are private. Outcomes are built with [`success`] and [`failure`]
/// (or the capturing constructors in [`crate::capture`]) and consumed through
/// [`Outcome::fold`] and the combinators defined on top of it.
///
/// ```rust
/// use routcome::{failure, success, Outcome};
///
/// let doubled: Outcome<i32, &str> = success(5).map(|x| x * 2);
/// assert_eq!(doubled, success(10));
///
/// let failed: Outcome<i32, &str> = failure("e");
/// assert_eq!(failed.map(|x| x * 2), failure("e"));
/// ```
///
/// Equality and hashing look at the variant first, so `success(1)` never equals
/// `failure(1)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome<S, F>(Variant<S, F>);

/// Wraps value as a success.
pub fn success<S, F>(value: S) -> Outcome<S, F> {
    Outcome(Variant::Success(value))
}

/// Wraps fault as a failure.
pub fn failure<S, F>(fault: F) -> Outcome<S, F> {
    Outcome(Variant::Failure(fault))
}

impl<S, F> Outcome<S, F> {
    /// Calls exactly one of the handlers, depending on variant, and returns its result.
    pub fn fold<B, OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure) -> B
    where
        OnSuccess: FnOnce(S) -> B,
        OnFailure: FnOnce(F) -> B,
    {
        match self.0 {
            Variant::Success(value) => on_success(value),
            Variant::Failure(fault) => on_failure(fault),
        }
    }

    /// Borrows wrapped value, consuming operations can then be used
    /// without giving up `self`.
    pub fn as_ref(&self) -> Outcome<&S, &F> {
        match &self.0 {
            Variant::Success(value) => success(value),
            Variant::Failure(fault) => failure(fault),
        }
    }

    /// Transforms success value, failures are passed through untouched.
    pub fn map<S2, Func>(self, f: Func) -> Outcome<S2, F>
    where
        Func: FnOnce(S) -> S2,
    {
        self.fold(|value| success(f(value)), failure)
    }

    /// Transforms fault value. This is the only way to change `F`.
    pub fn map_failure<F2, Func>(self, f: Func) -> Outcome<S, F2>
    where
        Func: FnOnce(F) -> F2,
    {
        self.fold(success, |fault| failure(f(fault)))
    }

    /// Chains another fallible step. Short-circuits on failure.
    ///
    /// ```rust
    /// use routcome::{failure, success};
    ///
    /// let positive = |x: i32| if x > 0 { success(x) } else { failure("neg") };
    ///
    /// assert_eq!(success(2).flat_map(positive), success(2));
    /// assert_eq!(success(-2).flat_map(positive), failure("neg"));
    /// ```
    pub fn flat_map<S2, Func>(self, f: Func) -> Outcome<S2, F>
    where
        Func: FnOnce(S) -> Outcome<S2, F>,
    {
        self.fold(f, failure)
    }

    /// Same as `flat_map`, but the next step is asynchronous.
    ///
    /// On failure `f` is never called and the returned future is ready on first poll.
    pub fn async_flat_map<S2, Fut, Func>(self, f: Func) -> impl Future<Output = Outcome<S2, F>>
    where
        Func: FnOnce(S) -> Fut,
        Fut: Future<Output = Outcome<S2, F>>,
    {
        self.fold(
            |value| Either::Left(f(value)),
            |fault| Either::Right(ready(failure::<S2, F>(fault))),
        )
    }

    /// Runs `f` for its side effect on success. No-op on failure.
    /// Use `as_ref` first to keep the outcome.
    pub fn for_each<T, Func>(self, f: Func)
    where
        Func: FnOnce(S) -> T,
    {
        self.fold(
            |value| {
                f(value);
            },
            |_| (),
        )
    }

    /// Awaits `f` on success and discards its output. No-op on failure.
    pub async fn for_each_async<T, Fut, Func>(self, f: Func)
    where
        Func: FnOnce(S) -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(pending) = self.map(f).get_or_none() {
            pending.await;
        }
    }

    /// Returns success value or computes `default`.
    /// `default` is called only on failure.
    pub fn get_or_else<Func>(self, default: Func) -> S
    where
        Func: FnOnce() -> S,
    {
        self.fold(|value| value, |_| default())
    }

    /// Returns success value, `None` on failure.
    pub fn get_or_none(self) -> Option<S> {
        self.fold(Some, |_| None)
    }

    /// Iterates over success value, yields nothing on failure.
    pub fn iter(&self) -> std::option::IntoIter<&S> {
        self.as_ref().get_or_none().into_iter()
    }

    pub fn into_result(self) -> Result<S, F> {
        self.fold(Ok, Err)
    }
}

impl<S> Outcome<S, Fault> {
    /// Leaves outcome world at `anyhow` boundary.
    pub fn into_anyhow(self) -> anyhow::Result<S> {
        self.fold(Ok, |fault| Err(anyhow::Error::new(fault)))
    }
}

impl<S, F> Debug for Outcome<S, F>
where
    S: Debug,
    F: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<S, F> From<Result<S, F>> for Outcome<S, F> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(value) => success(value),
            Err(fault) => failure(fault),
        }
    }
}

impl<S, F> From<Outcome<S, F>> for Result<S, F> {
    fn from(outcome: Outcome<S, F>) -> Self {
        outcome.into_result()
    }
}

impl<S, F> IntoIterator for Outcome<S, F> {
    type Item = S;
    type IntoIter = std::option::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.get_or_none().into_iter()
    }
}

impl<'a, S, F> IntoIterator for &'a Outcome<S, F> {
    type Item = &'a S;
    type IntoIter = std::option::IntoIter<&'a S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
