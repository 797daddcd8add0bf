//! # varsfile
//!
//! A small, embeddable configuration format: `key value` lines grouped under
//! optional `:/section` headers, with typed accessors, in-place mutation,
//! canonical save and mtime-based hot reload.
//!
//! ## Format
//!
//! ```text
//! # comment to end of line
//! title "quoted string value"
//!
//! :/video
//! width 1280
//! scale 1.5
//! vsync true
//! offset (0.5 -0.5)
//!
//! :/audio
//! volume 0.8
//! ```
//!
//! Keys under a header are addressed as `section/key` (`video/width`); keys
//! before the first header are addressed by their bare name. Values are stored
//! as text and decoded on request:
//!
//! - **String**: `"..."`, no escape processing
//! - **Int**: leading signed decimal
//! - **Float**: leading decimal literal
//! - **Bool**: `true` or `false`
//! - **Vec2 / Vec3 / Vec4**: `(x y)`, `(x y z)`, `(x y z w)`
//!
//! ## Example
//!
//! ```rust
//! use varsfile::{ConfigDocument, Vec2};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = ConfigDocument::parse(r#"
//! title "demo"
//!
//! :/video
//! width 1280
//! offset (0.5 -0.5)
//! "#)?;
//!
//! assert_eq!(doc.get_str("title")?, "demo");
//! assert_eq!(doc.get_int("video/width")?, 1280);
//! assert_eq!(doc.get_vec2("video/offset")?, Vec2::new(0.5, -0.5));
//!
//! // A missing key and a value of the wrong type are both errors, never a
//! // silent zero
//! assert!(doc.get_int("video/height").unwrap_err().is_not_found());
//! assert!(doc.get_int("title").is_err());
//!
//! doc.set_int("video/height", 720)?;
//! assert_eq!(doc.serialize(), "title \"demo\"\n\n:/video\nheight 720\noffset (0.5 -0.5)\nwidth 1280\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Files and hot reload
//!
//! ```rust,no_run
//! use varsfile::ConfigDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = ConfigDocument::load("settings.vars")?;
//! doc.set_bool("video/vsync", false)?;
//! doc.save()?;
//!
//! // Later, from the application's own polling loop
//! if doc.hot_reload()? {
//!     println!("settings changed on disk");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The library logs through the [`log`](https://docs.rs/log) facade and never
//! installs a logger. It does no locking; a document is meant to be owned by one
//! thread at a time.

// Module declarations
mod codec;
mod document;
mod error;
mod index;
mod parser;
mod reload;
mod scanner;
mod types;
mod writer;

// Public API exports
pub use document::{ConfigDocument, DocumentOptions};
pub use error::{ConfigError, ParseResult};
pub use types::{Vec2, Vec3, Vec4};

// Re-export submodules for advanced usage
pub use codec::{
    ValueCodec, check_value_text, decode_bool, decode_float, decode_int, decode_str, decode_tuple,
};
pub use index::{DEFAULT_CAPACITY, Iter, KeyIndex, fnv1a};
pub use parser::{ParseStats, VarsParser};
pub use reload::SourceStamp;
pub use scanner::{CharClass, SECTION_MARKER, Scanner, classify, is_key_char, is_valid_key};
pub use writer::{serialize, split_qualified};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
