//! # Courseway CLI
//!
//! Operator utilities behind the `courseway-cli` binary. They work offline: nothing
//! here talks to a running API.
//!
//! ```ignore
//! use courseway_cli::tools::{fixture_summary, password_hash};
//!
//! let hash = password_hash("secret", 10)?;
//! let summary = fixture_summary(Path::new("fixture.json"))?;
//! println!("{} users", summary.users);
//! ```

pub mod tools;
