//! Decoding and encoding between JSON text and [`Json`] documents.
//!
//! Numbers keep their exact decimal text (`serde_json`'s `arbitrary_precision`
//! feature), so 64-bit extremes and long decimals survive a round trip.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde_json::de::IoRead;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use serde_json::{StreamDeserializer, Value};

use super::{Json, JsonError};

/// Output settings for [`Json::encode_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Indent nested values by two spaces, one entry per line.
    pub pretty: bool,
    /// Write `&`, `<` and `>` inside strings as `\u0026`, `\u003c`, `\u003e`.
    ///
    /// U+2028 and U+2029 are written as `\u2028` and `\u2029` either way.
    pub escape_html: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            escape_html: true,
        }
    }
}

impl EncodeOptions {
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }
}

impl Json {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, JsonError> {
        serde_json::from_slice(bytes)
            .map(Json::from_value)
            .map_err(JsonError::Decode)
    }

    /// Decodes a single document from `reader`.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, JsonError> {
        serde_json::from_reader(reader)
            .map(Json::from_value)
            .map_err(JsonError::Decode)
    }

    /// Reads and decodes the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, JsonError> {
        let contents = std::fs::read(path.as_ref())?;
        Self::from_slice(&contents)
    }

    /// Compact encoding with HTML escaping, the default output.
    pub fn encode(&self) -> Result<Vec<u8>, JsonError> {
        self.encode_with(EncodeOptions::default())
    }

    /// Two-space indented encoding with HTML escaping.
    pub fn encode_pretty(&self) -> Result<Vec<u8>, JsonError> {
        self.encode_with(EncodeOptions::default().pretty(true))
    }

    pub fn encode_with(&self, options: EncodeOptions) -> Result<Vec<u8>, JsonError> {
        let value = self.as_value();
        let html = options.escape_html;
        if options.pretty {
            write_with(value, Escaping::new(PrettyFormatter::with_indent(b"  "), html))
        } else {
            write_with(value, Escaping::new(CompactFormatter, html))
        }
    }
}

impl FromStr for Json {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map(Json::from_value)
            .map_err(JsonError::Decode)
    }
}

/// Compact text without any extra escaping.
impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_value(), f)
    }
}

fn write_with<F: Formatter>(value: &Value, formatter: F) -> Result<Vec<u8>, JsonError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).map_err(JsonError::Encode)?;
    Ok(buf)
}

/// Wraps another formatter and escapes the line and paragraph separators in
/// strings, plus HTML-significant characters when `html` is set.
struct Escaping<F> {
    inner: F,
    html: bool,
}

impl<F> Escaping<F> {
    fn new(inner: F, html: bool) -> Self {
        Self { inner, html }
    }
}

impl<F: Formatter> Formatter for Escaping<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped: &[u8] = match ch {
                '\u{2028}' => b"\\u2028",
                '\u{2029}' => b"\\u2029",
                '&' if self.html => b"\\u0026",
                '<' if self.html => b"\\u003c",
                '>' if self.html => b"\\u003e",
                _ => continue,
            };
            writer.write_all(&fragment.as_bytes()[start..i])?;
            writer.write_all(escaped)?;
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}

/// Decodes a stream of whitespace-separated documents, one per iteration.
///
/// ```
/// use dynjson::Decoder;
///
/// let mut docs = Decoder::new("1 \"two\" [3]".as_bytes());
/// assert_eq!(docs.next().unwrap()?.view().as_i64(), Some(1));
/// assert_eq!(docs.next().unwrap()?.view().as_str(), Some("two"));
/// assert_eq!(docs.next().unwrap()?.len(), 1);
/// assert!(docs.next().is_none());
/// # Ok::<(), dynjson::JsonError>(())
/// ```
pub struct Decoder<R: io::Read> {
    stream: StreamDeserializer<'static, IoRead<R>, Value>,
}

impl<R: io::Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            stream: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }

    /// Number of input bytes consumed so far.
    pub fn byte_offset(&self) -> usize {
        self.stream.byte_offset()
    }
}

impl<R: io::Read> Iterator for Decoder<R> {
    type Item = Result<Json, JsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream
            .next()
            .map(|item| item.map(Json::from_value).map_err(JsonError::Decode))
    }
}
