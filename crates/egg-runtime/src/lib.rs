//! Runtime substrate for egg-generated parsers.
//!
//! Generated parsers and the egg grammar parser itself share two pieces:
//! [`State`], a random-access view over an input stream with forward-only
//! retention, and the primitive matchers in [`matchers`] operating on it.
//!
//! # Example
//!
//! ```
//! use egg_runtime::{State, byte, in_range};
//!
//! let mut src: &[u8] = b"a7";
//! let mut ps = State::new(&mut src);
//! assert!(byte::<b'a'>(&mut ps).is_match());
//! assert!(in_range::<b'0', b'9'>(&mut ps).is_match());
//! assert_eq!(ps.pos, 2);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod matchers;
pub mod state;

#[cfg(test)]
mod state_tests;

pub use matchers::{Match, any, byte, fail, in_range, matched};
pub use state::{ForgottenRange, State};
