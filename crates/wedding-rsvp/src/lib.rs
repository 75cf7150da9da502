//! Server side of a guest-list gated wedding RSVP site.
//!
//! The `rsvp` module carries the domain: name normalization, guest-list
//! matching, the admission gate, the storage trait, and the HTTP surface.
//! `access` is the soft passphrase gate the site front end talks to.

pub mod access;
pub mod config;
pub mod error;
pub mod rsvp;
pub mod telemetry;
