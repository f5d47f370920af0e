//! Statboard Core Library
//!
//! This crate provides the streaming encoder for the Statboard wire format:
//! a plain-text, tab-separated representation of one or more named datasets,
//! written incrementally to any [`std::io::Write`] sink.
//!
//! # Wire format
//!
//! ```text
//! session  := dataset ("\n" dataset)* "\n"
//! dataset  := name "\n" columns "\n" row+
//! columns  := field ("\t" field)*
//! row      := field ("\t" field)* "\n"
//! ```
//!
//! Fields are escaped before writing (tab becomes `#`, newline becomes `@`,
//! NUL becomes `!`), so no raw delimiter ever appears inside a field.
//!
//! # Example
//!
//! ```rust
//! use statboard_core::TabularWriter;
//!
//! let mut buf = Vec::new();
//! let mut writer = TabularWriter::new(&mut buf);
//! writer.begin_dataset("Readings");
//! writer.write_columns(&["sensor", "ok", "value"]);
//! writer
//!     .open_row()
//!     .write_text("kitchen")
//!     .write_bool(true)
//!     .write_int(21)
//!     .close();
//! writer.finish();
//! assert!(writer.err().is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod tabular;

pub use error::{ProtocolError, Result};
pub use tabular::{Row, TabularWriter};
