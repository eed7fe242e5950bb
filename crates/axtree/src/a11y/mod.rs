/*! Accessibility vocabulary shared by the builder, filter, and search. */

mod role;

pub use role::*;
