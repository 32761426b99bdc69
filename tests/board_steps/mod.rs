//! Step definitions for board BDD scenarios.


mod given;
mod then;
mod when;
