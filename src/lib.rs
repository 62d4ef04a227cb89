//! Two-state outcome type with combinators and fault-capturing constructors.
//!
//! An [`Outcome`] is either a success carrying a value or a failure carrying a
//! fault. Chains of [`Outcome::map`] and [`Outcome::flat_map`] never panic on their
//! own, failures travel through untouched and surface at the end of the chain.
//!
//! Constructors in [`capture`] turn fallible code into outcomes. An `Err` returned
//! by the operation is a recoverable fault and is kept as is. A panic is a defect,
//! by default it is absorbed into a [`Fault`] whose message carries the panic
//! message (see [`DefectPolicy`] to change that).
//!
//! ```rust
//! use routcome::{failure, from_nullable, from_sync, success, Fault};
//!
//! let port = from_sync(|| "8080".parse::<u16>().map_err(|e| Fault::new(e.to_string())))
//!     .map(|port| port + 1);
//! assert_eq!(port, success(8081));
//!
//! let host = from_nullable(None::<String>, || Fault::new("missing"));
//! assert_eq!(host, failure(Fault::new("missing")));
//! assert_eq!(host.get_or_else(|| "localhost".to_string()), "localhost");
//! ```
pub mod capture;
pub mod fault;
pub mod outcome;

pub use capture::{from_async, from_nullable, from_predicate, from_sync, Capture, DefectPolicy};
pub use fault::{Fault, Origin};
pub use macros::IntoFault;
pub use outcome::{failure, success, Outcome};
