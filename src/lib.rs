//! A CSS parsing and cascade engine: tokenize and parse a stylesheet, index
//! its rules for fast candidate lookup, and select a computed style for a
//! host-supplied DOM node (spec §1 PURPOSE & SCOPE).
//!
//! The module list mirrors the teacher's own `src/lib.rs`: small leaf
//! modules for value types (`length`, `color`, `atom`, `media`), a parser
//! front end (`frontend`) built on `cssparser`, and the cascade itself
//! (`select`) sitting on top of the data model (`style`, `selector`,
//! `rule`, `hash`).

pub mod alias;
pub mod atom;
pub mod bytecode;
pub mod color;
pub mod engine;
pub mod error;
pub mod frontend;
pub mod handler;
pub mod hash;
pub mod length;
pub mod log;
pub mod media;
pub mod parsers;
pub mod rule;
pub mod select;
pub mod selector;
pub mod session;
pub mod style;

pub use crate::atom::Atom;
pub use crate::bytecode::{StyleBlob, Value};
pub use crate::color::Color;
pub use crate::engine::CssEngine;
pub use crate::error::{CssError, ParseError};
pub use crate::frontend::parse_stylesheet;
pub use crate::handler::{NullSelectionHandler, PresentationalHint, SelectionHandler};
pub use crate::length::{Length, Unit};
pub use crate::media::MediaMask;
pub use crate::parsers::Parse;
pub use crate::rule::{Origin, Rule, RuleBody, RulePath, Stylesheet};
pub use crate::select::SelectionContext;
pub use crate::selector::{Combinator, Compound, Detail, Selector, Specificity};
pub use crate::session::Session;
pub use crate::style::{ComputedStyle, PropertyId};
