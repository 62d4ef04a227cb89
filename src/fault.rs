use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Where a `Fault` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Raised by the operation itself as an expected, modeled failure.
    Raised,

    /// Produced by absorbing a defect (a panic) at a capture boundary.
    Defect,
}

/// Recoverable fault, the failure payload produced by the capturing constructors.
///
/// Faults compare by message and origin, so two faults raised with the same
/// message are equal:
///
/// ```rust
/// use routcome::Fault;
///
/// assert_eq!(Fault::new("missing"), Fault::from("missing"));
/// assert!(!Fault::new("missing").is_defect());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fault {
    message: String,
    origin: Origin,
}

impl Fault {
    /// Creates ordinary, raised fault.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin: Origin::Raised,
        }
    }

    /// Creates fault that stands in for an absorbed defect.
    /// Both category and detail end up in the message.
    pub fn defect<C, D>(category: C, detail: D) -> Self
    where
        C: Display,
        D: Display,
    {
        Self {
            message: format!("defect ({}): {}", category, detail),
            origin: Origin::Defect,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Indicates if fault was produced by absorbing a panic.
    pub fn is_defect(&self) -> bool {
        self.origin == Origin::Defect
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Fault {}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Fault::new(message)
    }
}

/// Keeps the whole context chain, `anyhow` errors built with `.context(..)`
/// do not lose their cause on the way in. A `Fault` that left through
/// `Outcome::into_anyhow` comes back with its origin.
impl From<anyhow::Error> for Fault {
    fn from(err: anyhow::Error) -> Self {
        let origin = err.downcast_ref::<Fault>().map_or(Origin::Raised, Fault::origin);

        Self {
            message: format!("{:#}", err),
            origin,
        }
    }
}
