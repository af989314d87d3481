//! Wire types and closed domain vocabularies shared by the client core and the CLI.

pub mod domain;
pub mod error;
pub mod protocol;
