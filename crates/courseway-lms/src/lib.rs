//! # Courseway LMS
//!
//! The host learning-management system as seen from the API.
//!
//! [`Lms`] is the collaborator interface the route layer calls once a request has
//! passed validation and authentication. Absence is reported as `Ok(None)` or
//! `Ok(false)`; [`LmsError`] is reserved for operations the host refused or could not
//! perform.
//!
//! [`InMemoryLms`] is the reference host used by tests and by the binary when a JSON
//! [`Fixture`] is configured.

pub mod error;
pub mod fixture;
pub mod host;
pub mod memory;

pub use error::{FixtureError, LmsError, LmsResult};
pub use fixture::{Fixture, FixtureCategory, FixtureCourse};
pub use host::{Lms, UserAccount};
pub use memory::InMemoryLms;
