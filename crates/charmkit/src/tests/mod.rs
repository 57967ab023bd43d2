//! Behavioural test suites for the charm lifecycle.

mod behaviour;
mod support;
