//! Crate-level scenario tests with spy collaborators.

mod support;
