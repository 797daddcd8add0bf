//! The root handle: a loaded file, its index and its reload stamp.
//!
//! [`ConfigDocument`] ties the other modules together. Reads go through the
//! index and the codec; writes encode, upsert into the index and stay in memory
//! until [`ConfigDocument::save`]. [`ConfigDocument::hot_reload`] re-parses the
//! whole file when its mtime moves forward.

use crate::codec::{self, ValueCodec};
use crate::error::{ConfigError, ParseResult};
use crate::index::{self, KeyIndex};
use crate::parser::VarsParser;
use crate::reload::SourceStamp;
use crate::scanner::is_valid_key;
use crate::types::{Vec2, Vec3, Vec4};
use crate::writer;
use log::{debug, warn};
use std::path::Path;
use std::time::SystemTime;

/// Document options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Initial number of index slots, capped at 65536. The index grows past this
    /// on demand.
    pub index_capacity: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            index_capacity: index::DEFAULT_CAPACITY,
        }
    }
}

/// A parsed configuration file.
///
/// Dropping the document releases its index and path. Borrowed results such as
/// [`get_str`](Self::get_str) cannot be held across `set_*`, `save` or
/// `hot_reload`, which all take `&mut self`.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    index: KeyIndex,
    source: Option<SourceStamp>,
    options: DocumentOptions,
}

impl ConfigDocument {
    /// Create an empty document with no source file
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Create an empty document with custom options
    pub fn with_options(options: DocumentOptions) -> Self {
        Self {
            index: KeyIndex::with_capacity(options.index_capacity),
            source: None,
            options,
        }
    }

    /// Load and parse a file
    pub fn load(path: impl AsRef<Path>) -> ParseResult<Self> {
        Self::load_with_options(path, DocumentOptions::default())
    }

    /// Load and parse a file with custom options
    pub fn load_with_options(path: impl AsRef<Path>, options: DocumentOptions) -> ParseResult<Self> {
        let path = path.as_ref();
        // Stat before reading so a write racing the read shows up as a newer mtime
        let modified = SourceStamp::read_mtime(path).ok();
        let index = Self::read_index(path, &options)?;

        Ok(Self {
            index,
            source: Some(SourceStamp::with_modified(path, modified)),
            options,
        })
    }

    /// Parse a document held in memory. It has no source path until
    /// [`save_as`](Self::save_as).
    pub fn parse(input: &str) -> ParseResult<Self> {
        Self::parse_with_options(input, DocumentOptions::default())
    }

    /// Parse a document held in memory with custom options
    pub fn parse_with_options(input: &str, options: DocumentOptions) -> ParseResult<Self> {
        let index = VarsParser::parse_document(input, options.index_capacity)?;
        Ok(Self {
            index,
            source: None,
            options,
        })
    }

    fn read_index(path: &Path, options: &DocumentOptions) -> ParseResult<KeyIndex> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e.to_string()))?;

        let mut index = KeyIndex::with_capacity(options.index_capacity);
        let stats = VarsParser::parse_into(&content, &mut index)?;
        debug!(
            "parsed {}: {} entries ({} lines, {} section headers)",
            path.display(),
            index.len(),
            stats.entries,
            stats.sections
        );
        Ok(index)
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    /// Raw value text for a qualified key
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.index.get(key)
    }

    fn lookup(&self, key: &str) -> ParseResult<&str> {
        self.index.get(key).ok_or_else(|| ConfigError::key_not_found(key))
    }

    /// Decode a value as any [`ValueCodec`] type
    pub fn get<T: ValueCodec>(&self, key: &str) -> ParseResult<T> {
        let text = self.lookup(key)?;
        T::decode(text).ok_or_else(|| ConfigError::type_error(key, T::TYPE_NAME, text))
    }

    /// Body of a quoted string value, borrowed from the document
    pub fn get_str(&self, key: &str) -> ParseResult<&str> {
        let text = self.lookup(key)?;
        codec::decode_str(text).ok_or_else(|| ConfigError::type_error(key, "String", text))
    }

    pub fn get_string(&self, key: &str) -> ParseResult<String> {
        self.get(key)
    }

    pub fn get_int(&self, key: &str) -> ParseResult<i64> {
        self.get(key)
    }

    pub fn get_float(&self, key: &str) -> ParseResult<f64> {
        self.get(key)
    }

    pub fn get_bool(&self, key: &str) -> ParseResult<bool> {
        self.get(key)
    }

    pub fn get_vec2(&self, key: &str) -> ParseResult<Vec2> {
        self.get(key)
    }

    pub fn get_vec3(&self, key: &str) -> ParseResult<Vec3> {
        self.get(key)
    }

    pub fn get_vec4(&self, key: &str) -> ParseResult<Vec4> {
        self.get(key)
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Get all qualified keys, in no particular order
    pub fn keys(&self) -> Vec<&str> {
        self.index.keys().collect()
    }

    /// Iterate over `(qualified key, value text)` pairs
    pub fn entries(&self) -> index::Iter<'_> {
        self.index.iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Encode `value` and insert or overwrite `key`.
    ///
    /// `key` is either `name` or `section/name`. Nothing is written to disk until
    /// [`save`](Self::save).
    pub fn set<T: ValueCodec>(&mut self, key: &str, value: &T) -> ParseResult<()> {
        if !is_valid_key(key) {
            return Err(ConfigError::invalid_key(key));
        }
        value
            .check()
            .map_err(|reason| ConfigError::invalid_value(key, reason))?;

        let text = value.encode();
        codec::check_value_text(&text).map_err(|reason| ConfigError::invalid_value(key, reason))?;

        self.index.insert(key, &text);
        Ok(())
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> ParseResult<()> {
        self.set(key, &value.to_string())
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> ParseResult<()> {
        self.set(key, &value)
    }

    pub fn set_float(&mut self, key: &str, value: f64) -> ParseResult<()> {
        self.set(key, &value)
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> ParseResult<()> {
        self.set(key, &value)
    }

    pub fn set_vec2(&mut self, key: &str, value: Vec2) -> ParseResult<()> {
        self.set(key, &value)
    }

    pub fn set_vec3(&mut self, key: &str, value: Vec3) -> ParseResult<()> {
        self.set(key, &value)
    }

    pub fn set_vec4(&mut self, key: &str, value: Vec4) -> ParseResult<()> {
        self.set(key, &value)
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    /// Canonical text form of the document
    pub fn serialize(&self) -> String {
        writer::serialize(&self.index)
    }

    /// Write the canonical form back to the source file
    pub fn save(&mut self) -> ParseResult<()> {
        let Some(stamp) = self.source.as_mut() else {
            return Err(ConfigError::custom(
                "document has no source path; use save_as",
            ));
        };

        writer::write_file(stamp.path(), &writer::serialize(&self.index))?;
        stamp.refresh();
        debug!("saved {} entries to {}", self.index.len(), stamp.path().display());
        Ok(())
    }

    /// Write the canonical form to `path` and make it the source file
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> ParseResult<()> {
        let path = path.as_ref();
        writer::write_file(path, &self.serialize())?;
        self.source = Some(SourceStamp::new(path));
        debug!("saved {} entries to {}", self.index.len(), path.display());
        Ok(())
    }

    // ---------------------------------------------------------------
    // Reload
    // ---------------------------------------------------------------

    /// True when the source file has a newer mtime than the loaded contents
    pub fn is_stale(&self) -> bool {
        self.source.as_ref().is_some_and(SourceStamp::is_stale)
    }

    /// Re-parse the source file if it changed on disk.
    ///
    /// Returns `Ok(true)` when the contents were replaced and `Ok(false)` when
    /// there is no source path, the file cannot be stat'ed, or its mtime is not
    /// newer. A read or parse failure returns the error and keeps the current
    /// contents.
    pub fn hot_reload(&mut self) -> ParseResult<bool> {
        let Some(stamp) = self.source.as_mut() else {
            return Ok(false);
        };

        let observed = match SourceStamp::read_mtime(stamp.path()) {
            Ok(observed) => observed,
            Err(e) => {
                warn!("cannot stat {} for reload: {}", stamp.path().display(), e);
                return Ok(false);
            }
        };

        if !stamp.is_newer(observed) {
            return Ok(false);
        }

        let index = Self::read_index(stamp.path(), &self.options)?;
        self.index = index;
        stamp.set_modified(observed);
        debug!("reloaded {}", stamp.path().display());
        Ok(true)
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    /// Source file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.source.as_ref().map(SourceStamp::path)
    }

    /// Mtime of the contents currently held, if known
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.source.as_ref().and_then(SourceStamp::modified)
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// The underlying index
    pub fn index(&self) -> &KeyIndex {
        &self.index
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new()
    }
}
