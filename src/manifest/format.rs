//! Manifest text serialisation and parsing.
//!
//! Output follows the JAR manifest layout the host reads: `name: value`
//! lines terminated by CRLF, no line longer than 72 bytes, overflow carried
//! on continuation lines that start with a single space, and sections
//! separated by an empty line. `Manifest-Version` always leads the main
//! section.

use super::error::{ManifestError, Result};
use super::{Attribute, MANIFEST_VERSION, Manifest, ManifestBuilder};

/// Maximum line length in bytes, excluding the line terminator.
const LINE_WIDTH: usize = 72;

/// Value emitted for `Manifest-Version` when the manifest does not set one.
const DEFAULT_VERSION: &str = "1.0";

const SECTION_NAME: &str = "Name";

/// Render `manifest` as manifest text.
///
/// # Examples
///
/// ```
/// use pluginpack::manifest::{ManifestBuilder, format};
///
/// let manifest = ManifestBuilder::new()
///     .attribute("Short-Name", "demo")
///     .build()
///     .unwrap();
/// assert_eq!(
///     format::to_manifest_string(&manifest),
///     "Manifest-Version: 1.0\r\nShort-Name: demo\r\n\r\n"
/// );
/// ```
#[must_use]
pub fn to_manifest_string(manifest: &Manifest) -> String {
    let mut out = String::new();

    let main = manifest.main();
    let version = main.get(MANIFEST_VERSION).unwrap_or(DEFAULT_VERSION);
    push_attribute(&mut out, MANIFEST_VERSION, version);
    for attribute in main.attributes() {
        if !attribute.name().eq_ignore_ascii_case(MANIFEST_VERSION) {
            push_attribute(&mut out, attribute.name(), attribute.value());
        }
    }
    out.push_str("\r\n");

    for section in manifest.sections() {
        push_attribute(&mut out, SECTION_NAME, section.name().unwrap_or_default());
        for attribute in section.attributes() {
            push_attribute(&mut out, attribute.name(), attribute.value());
        }
        out.push_str("\r\n");
    }
    out
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut width = LINE_WIDTH;
    loop {
        let cut = split_point(rest, width);
        let (head, tail) = rest.split_at(cut);
        out.push_str(head);
        out.push_str("\r\n");
        if tail.is_empty() {
            break;
        }
        out.push(' ');
        rest = tail;
        width = LINE_WIDTH - 1;
    }
}

/// Largest char boundary in `text` that is at most `width` bytes in.
///
/// Always advances by at least one character so a pathological width never
/// stalls the writer.
fn split_point(text: &str, width: usize) -> usize {
    if text.len() <= width {
        return text.len();
    }
    let mut cut = width;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    if cut == 0 {
        text.chars().next().map_or(text.len(), char::len_utf8)
    } else {
        cut
    }
}

/// Parse manifest text.
///
/// Accepts CRLF or LF line endings. The result passes the same validation
/// as [`ManifestBuilder::build`].
///
/// # Errors
///
/// Returns [`ManifestError::Malformed`] for lines that are not
/// `name: value` pairs or continuations in a valid position, and any
/// validation error from [`ManifestBuilder::build`].
pub fn parse(text: &str) -> Result<Manifest> {
    let mut parser = Parser::default();
    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        parser.line(index + 1, line)?;
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    builder: ManifestBuilder,
    main_done: bool,
    section: Option<String>,
    pending: Option<(usize, String)>,
    current: Vec<Attribute>,
}

impl Parser {
    fn line(&mut self, number: usize, line: &str) -> Result<()> {
        if let Some(continuation) = line.strip_prefix(' ') {
            return match self.pending.as_mut() {
                Some((_, logical)) => {
                    logical.push_str(continuation);
                    Ok(())
                }
                None => Err(malformed(number, "continuation line without an attribute")),
            };
        }
        self.flush_pending()?;
        if line.is_empty() {
            self.end_section();
        } else {
            self.pending = Some((number, line.to_owned()));
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        let Some((number, logical)) = self.pending.take() else {
            return Ok(());
        };
        let (name, value) = logical
            .split_once(": ")
            .ok_or_else(|| malformed(number, "expected \"name: value\""))?;

        if self.main_done && self.section.is_none() {
            if !name.eq_ignore_ascii_case(SECTION_NAME) {
                return Err(malformed(number, "section must start with a Name attribute"));
            }
            self.section = Some(value.to_owned());
            return Ok(());
        }
        self.current.push(Attribute::new(name, value));
        Ok(())
    }

    fn end_section(&mut self) {
        let attributes = std::mem::take(&mut self.current);
        let builder = std::mem::take(&mut self.builder);
        self.builder = if self.main_done {
            match self.section.take() {
                Some(name) => builder.section(name, attributes),
                None => builder,
            }
        } else {
            self.main_done = true;
            builder.attributes(attributes)
        };
    }

    fn finish(mut self) -> Result<Manifest> {
        self.flush_pending()?;
        self.end_section();
        self.builder.build()
    }
}

fn malformed(line: usize, reason: &str) -> ManifestError {
    ManifestError::Malformed {
        line,
        reason: reason.to_owned(),
    }
}
