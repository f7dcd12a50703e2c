//! Story script subdomain.
//!
//! The text model is asked for ten lines of the form `Page N: <text>`;
//! [`parsing::parse_story_script`] turns that reply into page texts.

pub mod parsing;

pub use parsing::{ScriptParseError, parse_story_script};
