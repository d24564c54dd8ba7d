//! Unit tests for the board module.
//!
//! Domain values are tested directly; services run against the in-memory
//! repository or a mocked repository when a race has to be staged.

mod fixtures;
