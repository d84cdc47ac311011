//! Clinic Dialogue - Diagnostic conversation game engine
//!
//! A human doctor interviews a language-model patient to find a hidden
//! diagnosis. The patient may privately consult its body, and a referee
//! checks patient messages and adjudicates diagnoses.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
