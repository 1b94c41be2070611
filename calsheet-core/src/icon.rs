//! Icon lookup and SVG sanitization.
//!
//! Icons live in a local directory. SVG icons are rewritten so the page
//! stylesheet controls their color and size; raster icons are referenced by
//! path and never touched.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

use crate::error::{CalsheetError, CalsheetResult};
use crate::settings::{IconLookup, Settings};

/// Presentation attributes removed from the root `<svg>` element.
const STRIPPED_ROOT_ATTRIBUTES: [&[u8]; 4] = [b"fill", b"height", b"width", b"style"];

/// Outcome of an icon lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum IconResult {
    /// Sanitized SVG markup, ready to inline
    VectorMarkup(String),
    /// Path to a raster image
    RasterPath(PathBuf),
    /// No readable file for the identifier
    NotFound,
}

/// Resolves ICON cells against the icons directory.
#[derive(Debug, Clone)]
pub struct IconResolver {
    dir: PathBuf,
    lookup: IconLookup,
}

impl IconResolver {
    pub fn new(dir: PathBuf, lookup: IconLookup) -> Self {
        IconResolver { dir, lookup }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.icons_dir(), settings.icon.lookup)
    }

    /// Candidate file for an identifier.
    pub fn candidate_path(&self, identifier: &str) -> PathBuf {
        match self.lookup {
            IconLookup::Literal => self.dir.join(identifier),
            IconLookup::ImpliedSvg => self.dir.join(format!("{}.svg", identifier)),
        }
    }

    /// Look up an icon. A missing file, a directory or a file that cannot be
    /// opened is `NotFound`; read and markup errors on an existing SVG are
    /// returned as errors.
    pub fn resolve(&self, identifier: &str) -> CalsheetResult<IconResult> {
        let path = self.candidate_path(identifier);

        if !path.metadata().is_ok_and(|meta| meta.is_file()) {
            return Ok(IconResult::NotFound);
        }
        let Ok(mut file) = File::open(&path) else {
            return Ok(IconResult::NotFound);
        };

        if !is_svg(&path) {
            return Ok(IconResult::RasterPath(path));
        }

        let mut markup = String::new();
        file.read_to_string(&mut markup)?;

        let sanitized = sanitize_svg(&markup)
            .map_err(|e| CalsheetError::Icon(format!("{}: {}", path.display(), e)))?;

        Ok(IconResult::VectorMarkup(sanitized))
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Strip intrinsic styling from SVG markup.
///
/// - `fill`, `height`, `width` and `style` are removed from the root element
/// - `<style>` children of the root are dropped
/// - the first `<path>` child of the root gets `fill=""`
///
/// Everything else is written back as read, so the result is stable under a
/// second pass.
pub fn sanitize_svg(markup: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::new());

    let mut depth = 0usize;
    // Depth of the <style> subtree being skipped, if any
    let mut skipping: Option<usize> = None;
    let mut path_seen = false;

    loop {
        let event = reader.read_event()?;

        if let Some(skip_depth) = skipping {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == skip_depth {
                        skipping = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => {
                match depth {
                    0 => writer.write_event(Event::Start(strip_root(&e)?))?,
                    1 if e.name().as_ref() == b"style" => skipping = Some(depth),
                    1 if e.name().as_ref() == b"path" && !path_seen => {
                        path_seen = true;
                        writer.write_event(Event::Start(clear_fill(&e)?))?;
                    }
                    _ => writer.write_event(Event::Start(e))?,
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                0 => writer.write_event(Event::Empty(strip_root(&e)?))?,
                1 if e.name().as_ref() == b"style" => {}
                1 if e.name().as_ref() == b"path" && !path_seen => {
                    path_seen = true;
                    writer.write_event(Event::Empty(clear_fill(&e)?))?;
                }
                _ => writer.write_event(Event::Empty(e))?,
            },
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Copy of the root element without presentation attributes.
fn strip_root(start: &BytesStart<'_>) -> Result<BytesStart<'static>, quick_xml::Error> {
    let mut root = start.to_owned();
    root.clear_attributes();

    for attr in start.attributes() {
        let attr = attr?;
        if !STRIPPED_ROOT_ATTRIBUTES.contains(&attr.key.as_ref()) {
            root.push_attribute(requote(start, attr)?);
        }
    }

    Ok(root)
}

/// Copy of a path element with an empty `fill`, kept in its original position.
fn clear_fill(start: &BytesStart<'_>) -> Result<BytesStart<'static>, quick_xml::Error> {
    let mut path = start.to_owned();
    path.clear_attributes();

    let mut has_fill = false;
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"fill" {
            has_fill = true;
            path.push_attribute(("fill", ""));
        } else {
            path.push_attribute(requote(start, attr)?);
        }
    }

    if !has_fill {
        path.push_attribute(("fill", ""));
    }

    Ok(path)
}

/// Re-escape an attribute value for the double quotes the writer always uses.
fn requote<'a>(
    start: &BytesStart<'_>,
    attr: Attribute<'a>,
) -> Result<Attribute<'a>, quick_xml::Error> {
    let value = attr.decode_and_unescape_value(start.decoder())?;
    let escaped = escape(value).into_owned();

    Ok(Attribute {
        key: attr.key,
        value: Cow::Owned(escaped.into_bytes()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="#ff0000" style="color: red">
  <style>.a { fill: blue; }</style>
  <path d="M0 0h24v24H0z" fill="#00ff00"/>
  <path d="M12 2L2 22h20z" fill="#0000ff"/>
</svg>
"##;

    #[test]
    fn strips_root_presentation_attributes() {
        let out = sanitize_svg(ICON).unwrap();
        let root = out.lines().find(|l| l.starts_with("<svg")).unwrap();

        assert!(root.contains(r#"xmlns="http://www.w3.org/2000/svg""#), "{}", root);
        assert!(root.contains(r#"viewBox="0 0 24 24""#), "{}", root);
        assert!(!root.contains("width="), "{}", root);
        assert!(!root.contains("height="), "{}", root);
        assert!(!root.contains("fill="), "{}", root);
        assert!(!root.contains("style="), "{}", root);
    }

    #[test]
    fn drops_style_element() {
        let out = sanitize_svg(ICON).unwrap();
        assert!(!out.contains("<style"), "{}", out);
        assert!(!out.contains("fill: blue"), "{}", out);
    }

    #[test]
    fn clears_fill_on_first_path_only() {
        let out = sanitize_svg(ICON).unwrap();
        assert!(out.contains(r#"<path d="M0 0h24v24H0z" fill=""/>"#), "{}", out);
        assert!(out.contains(r##"<path d="M12 2L2 22h20z" fill="#0000ff"/>"##), "{}", out);
    }

    #[test]
    fn adds_empty_fill_when_path_has_none() {
        let out = sanitize_svg(r#"<svg viewBox="0 0 1 1"><path d="M0 0"/></svg>"#).unwrap();
        assert_eq!(out, r#"<svg viewBox="0 0 1 1"><path d="M0 0" fill=""/></svg>"#);
    }

    #[test]
    fn keeps_declaration_and_nested_content() {
        let markup = r#"<?xml version="1.0"?><svg width="2"><!-- note --><g><style>x</style><path d="M1 1" fill="red"/></g></svg>"#;
        let out = sanitize_svg(markup).unwrap();
        assert_eq!(
            out,
            r#"<?xml version="1.0"?><svg><!-- note --><g><style>x</style><path d="M1 1" fill="red"/></g></svg>"#
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize_svg(ICON).unwrap();
        let twice = sanitize_svg(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn single_quoted_attributes_survive_two_passes() {
        let markup = r#"<svg aria-label='say "hi"' width="4"><path d='M0 0' data-note='a "b"'/></svg>"#;
        let once = sanitize_svg(markup).unwrap();
        assert_eq!(
            once,
            r#"<svg aria-label="say &quot;hi&quot;"><path d="M0 0" data-note="a &quot;b&quot;" fill=""/></svg>"#
        );
        assert_eq!(sanitize_svg(&once).unwrap(), once);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert!(sanitize_svg("<svg><path></svg>").is_err());
    }

    fn resolver(dir: &Path, lookup: IconLookup) -> IconResolver {
        IconResolver::new(dir.to_path_buf(), lookup)
    }

    #[test]
    fn resolves_svg_to_sanitized_markup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sync.svg"), ICON).unwrap();

        let result = resolver(dir.path(), IconLookup::Literal).resolve("sync.svg").unwrap();
        match result {
            IconResult::VectorMarkup(markup) => assert_eq!(markup, sanitize_svg(ICON).unwrap()),
            other => panic!("expected markup, got {:?}", other),
        }
    }

    #[test]
    fn resolving_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sync.svg"), ICON).unwrap();
        let icons = resolver(dir.path(), IconLookup::Literal);

        assert_eq!(icons.resolve("sync.svg").unwrap(), icons.resolve("sync.svg").unwrap());
    }

    #[test]
    fn implied_extension_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sync.svg"), ICON).unwrap();

        let icons = resolver(dir.path(), IconLookup::ImpliedSvg);
        assert_eq!(icons.candidate_path("sync"), dir.path().join("sync.svg"));
        assert!(matches!(icons.resolve("sync").unwrap(), IconResult::VectorMarkup(_)));
    }

    #[test]
    fn raster_returns_path_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let result = resolver(dir.path(), IconLookup::Literal).resolve("logo.png").unwrap();
        assert_eq!(result, IconResult::RasterPath(path));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolver(dir.path(), IconLookup::Literal).resolve("nope.svg").unwrap();
        assert_eq!(result, IconResult::NotFound);
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let icons = resolver(dir.path(), IconLookup::Literal);

        assert_eq!(icons.resolve(".").unwrap(), IconResult::NotFound);
        assert_eq!(icons.resolve("nested").unwrap(), IconResult::NotFound);
    }

    #[test]
    fn broken_svg_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.svg"), "<svg><g></svg>").unwrap();

        let err = resolver(dir.path(), IconLookup::Literal).resolve("bad.svg").unwrap_err();
        assert!(matches!(err, CalsheetError::Icon(_)));
    }
}
