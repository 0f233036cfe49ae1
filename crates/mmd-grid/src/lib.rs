//! Music grid markdown for mmd.
//!
//! A grid document is plain text, one construct per line:
//!
//! ```text
//! # Autumn Leaves             title
//! ## Medium swing             subtitle
//! author: J. Kosma
//! - [A] x2 -> [B]             section header
//! 4/4 [: Cm7 F7 | Bbmaj7 :]   row of measures
//! %vspace-big%                vertical space
//! ```
//!
//! [`parse`] turns the text into a [`Grid`], [`Grid::to_html`] renders a
//! standalone page, and [`compile_file`] does both from file to file.
//!
//! # Quick Start
//!
//! ```
//! use mmd_grid::{RenderOptions, parse};
//!
//! let grid = parse("# Blues\n| C7 | F7 | C7 | C7 |");
//! let html = grid.to_html(&RenderOptions::default());
//! assert!(html.contains("<h1>Blues</h1>"));
//! ```

mod ast;
mod compile;
mod error;
mod html;
mod parser;

pub use ast::{
    Bar, BarBlock, BarItem, BarSize, BarlineKind, Block, Chord, Grid, GridInfo, SectionItem,
};
pub use compile::compile_file;
pub use error::GridError;
pub use html::RenderOptions;
pub use parser::parse;
