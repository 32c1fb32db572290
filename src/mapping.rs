//! A Parser for Proguard Mapping Files.
//!
//! The mapping file format is described
//! [here](https://www.guardsquare.com/en/products/proguard/manual/retrace).
//!
//! Parsing happens line-by-line and does not interpret any of the extracted
//! names. Turning records into lookup tables is the job of
//! [`ProguardMap`](crate::ProguardMap).

use std::fmt;
use std::str;

#[cfg(feature = "uuid")]
use uuid::Uuid;

use crate::line_range::ProguardLineRange;

const INVALID_RECORD: &str = "line is not a valid proguard record";
const MISSING_SEPARATOR: &str = "missing ` -> ` separator";
const MISSING_CLASS_COLON: &str = "class header is missing its trailing `:`";
const INVALID_CLASS: &str = "class names must be non-empty and must not contain whitespace";
const INVALID_FIELD: &str = "field must be `type name -> obfuscated`";
const INVALID_METHOD: &str =
    "method must be `[start:end:]type name(args)[:start[:end]] -> obfuscated`";
const INVALID_NUMBER: &str = "invalid line number";
const INVALID_OBFUSCATED: &str = "invalid obfuscated member name";
const EMPTY_LINE: &str = "line is empty";

/// Error when parsing a proguard mapping line.
///
/// Since the mapping parses proguard line-by-line, an error will also contain
/// the offending line and its 1-based line number.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParseError<'s> {
    line: &'s [u8],
    line_number: usize,
    kind: ParseErrorKind,
}

impl<'s> ParseError<'s> {
    /// The offending line that caused the error.
    pub fn line(&self) -> &'s [u8] {
        self.line
    }

    /// The 1-based number of the offending line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The specific parse Error.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.kind)
    }
}

impl std::error::Error for ParseError<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ParseErrorKind::Utf8Error(ref e) => Some(e),
            ParseErrorKind::ParseError(_) => None,
        }
    }
}

/// The specific parse Error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// The line failed utf-8 conversion.
    Utf8Error(str::Utf8Error),
    /// The line failed parsing.
    ParseError(&'static str),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Utf8Error(e) => write!(f, "{e}"),
            ParseErrorKind::ParseError(d) => f.write_str(d),
        }
    }
}

/// Summary of a mapping file.
pub struct MappingSummary<'s> {
    compiler: Option<&'s str>,
    compiler_version: Option<&'s str>,
    min_api: Option<u32>,
    class_count: usize,
    method_count: usize,
}

impl<'s> MappingSummary<'s> {
    fn new(mapping: &ProguardMapping<'s>) -> MappingSummary<'s> {
        let mut compiler = None;
        let mut compiler_version = None;
        let mut min_api = None;
        let mut class_count = 0;
        let mut method_count = 0;

        for record in mapping.iter() {
            match record {
                Ok(ProguardRecord::Header { key, value }) => match key {
                    "compiler" => {
                        compiler = value;
                    }
                    "compiler_version" => {
                        compiler_version = value;
                    }
                    "min_api" => {
                        min_api = value.and_then(|x| x.parse().ok());
                    }
                    _ => {}
                },
                Ok(ProguardRecord::Class { .. }) => class_count += 1,
                Ok(ProguardRecord::Method { .. }) => method_count += 1,
                _ => {}
            }
        }

        MappingSummary {
            compiler,
            compiler_version,
            min_api,
            class_count,
            method_count,
        }
    }

    /// Returns the name of the compiler that created the proguard mapping.
    pub fn compiler(&self) -> Option<&'s str> {
        self.compiler
    }

    /// Returns the version of the compiler.
    pub fn compiler_version(&self) -> Option<&'s str> {
        self.compiler_version
    }

    /// Returns the min-api value.
    pub fn min_api(&self) -> Option<u32> {
        self.min_api
    }

    /// Returns the number of classes in the mapping file.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Returns the number of methods in the mapping file.
    pub fn method_count(&self) -> usize {
        self.method_count
    }
}

/// A Proguard Mapping file.
#[derive(Clone, Copy, Default)]
pub struct ProguardMapping<'s> {
    source: &'s [u8],
}

impl fmt::Debug for ProguardMapping<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProguardMapping").finish()
    }
}

impl<'s> ProguardMapping<'s> {
    /// Create a new Proguard Mapping.
    pub fn new(source: &'s [u8]) -> Self {
        Self { source }
    }

    /// Whether the mapping file is indeed valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use proguard_map::ProguardMapping;
    ///
    /// let valid = ProguardMapping::new(b"a -> b:\n    void method() -> b");
    /// assert_eq!(valid.is_valid(), true);
    ///
    /// let invalid = ProguardMapping::new(
    ///     br#"
    /// # looks: like
    /// a -> proguard:
    ///   mapping but(is) not
    /// "#,
    /// );
    /// assert_eq!(invalid.is_valid(), false);
    /// ```
    pub fn is_valid(&self) -> bool {
        // In order to not parse the whole file, we look for a class followed by
        // a member in the first 50 lines, which is a good heuristic.
        let mut has_class_line = false;
        for record in self.iter().take(50) {
            match record {
                Ok(ProguardRecord::Class { .. }) => {
                    has_class_line = true;
                }
                Ok(ProguardRecord::Field { .. }) | Ok(ProguardRecord::Method { .. })
                    if has_class_line =>
                {
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    /// Returns a summary of the file.
    pub fn summary(&self) -> MappingSummary<'s> {
        MappingSummary::new(self)
    }

    /// Whether the mapping file contains line info.
    ///
    /// # Examples
    ///
    /// ```
    /// use proguard_map::ProguardMapping;
    ///
    /// let with = ProguardMapping::new(b"a -> b:\n    1:1:void method() -> a");
    /// assert_eq!(with.has_line_info(), true);
    ///
    /// let without = ProguardMapping::new(b"a -> b:\n    void method() -> b");
    /// assert_eq!(without.has_line_info(), false);
    /// ```
    pub fn has_line_info(&self) -> bool {
        self.iter().any(|record| {
            matches!(
                record,
                Ok(ProguardRecord::Method { line_range, .. }) if line_range.has_line_info()
            )
        })
    }

    /// Calculates the UUID of the mapping file.
    ///
    /// The UUID is generated from a file checksum.
    #[cfg(feature = "uuid")]
    pub fn uuid(&self) -> Uuid {
        crate::mapping_uuid(self.source)
    }

    /// Create an Iterator over [`ProguardRecord`]s.
    pub fn iter(&self) -> ProguardRecordIter<'s> {
        ProguardRecordIter {
            slice: self.source,
            line_number: 0,
        }
    }
}

/// An Iterator yielding [`ProguardRecord`]s, created by [`ProguardMapping::iter`].
///
/// Blank lines are skipped. Every other line yields exactly one item.
#[derive(Clone, Default)]
pub struct ProguardRecordIter<'s> {
    slice: &'s [u8],
    line_number: usize,
}

impl fmt::Debug for ProguardRecordIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProguardRecordIter")
            .field("line_number", &self.line_number)
            .finish()
    }
}

impl ProguardRecordIter<'_> {
    /// The 1-based line number of the most recently yielded item.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<'s> Iterator for ProguardRecordIter<'s> {
    type Item = Result<ProguardRecord<'s>, ParseError<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.slice.is_empty() {
            let (line, rest) = split_line(self.slice);
            self.slice = rest;
            self.line_number += 1;

            match parse_proguard_record(line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(kind) => {
                    return Some(Err(ParseError {
                        line,
                        line_number: self.line_number,
                        kind,
                    }))
                }
            }
        }
        None
    }
}

/// A Proguard Mapping Record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProguardRecord<'s> {
    /// A Proguard Header, or any other comment line.
    Header {
        /// The Key of the Header.
        key: &'s str,
        /// Optional value if the Header is a KV pair.
        value: Option<&'s str>,
    },
    /// A Class Mapping.
    Class {
        /// Original name of the class.
        original: &'s str,
        /// Obfuscated name of the class.
        obfuscated: &'s str,
    },
    /// A Field Mapping.
    Field {
        /// Type of the field
        ty: &'s str,
        /// Original name of the field.
        original: &'s str,
        /// Obfuscated name of the field.
        obfuscated: &'s str,
    },
    /// A Method Mapping.
    Method {
        /// Return Type of the method.
        ty: &'s str,
        /// Original name of the method.
        ///
        /// Methods inlined from another class keep that class as a dotted
        /// prefix, e.g. `com.example.Time.now`.
        original: &'s str,
        /// Obfuscated name of the method.
        obfuscated: &'s str,
        /// Arguments of the method as raw string.
        arguments: &'s str,
        /// Line range of the method, all zero if the line has none.
        line_range: ProguardLineRange,
    },
}

impl<'s> ProguardRecord<'s> {
    /// Parses a line from a proguard mapping file.
    ///
    /// # Examples
    ///
    /// ```
    /// use proguard_map::{ProguardLineRange, ProguardRecord};
    ///
    /// // Headers
    /// let parsed = ProguardRecord::try_parse(b"# compiler: R8");
    /// assert_eq!(
    ///     parsed,
    ///     Ok(ProguardRecord::Header {
    ///         key: "compiler",
    ///         value: Some("R8")
    ///     })
    /// );
    ///
    /// // Class Mappings
    /// let parsed =
    ///     ProguardRecord::try_parse(b"android.arch.core.executor.ArchTaskExecutor -> a.a.a.a.c:");
    /// assert_eq!(
    ///     parsed,
    ///     Ok(ProguardRecord::Class {
    ///         original: "android.arch.core.executor.ArchTaskExecutor",
    ///         obfuscated: "a.a.a.a.c"
    ///     })
    /// );
    ///
    /// // Inlined method from foreign class
    /// let parsed = ProguardRecord::try_parse(
    ///     b"    2:2:long com.whatsapp.core.Time.currentServerTimeMillis():66:66 -> k",
    /// );
    /// assert_eq!(
    ///     parsed,
    ///     Ok(ProguardRecord::Method {
    ///         ty: "long",
    ///         original: "com.whatsapp.core.Time.currentServerTimeMillis",
    ///         obfuscated: "k",
    ///         arguments: "",
    ///         line_range: ProguardLineRange::new(2, 2, 66, 66),
    ///     })
    /// );
    /// ```
    pub fn try_parse(line: &'s [u8]) -> Result<Self, ParseError<'s>> {
        let (first, rest) = split_line(line);
        let error = |kind| ParseError {
            line: first,
            line_number: 1,
            kind,
        };

        // Anything but trailing newlines after the first line is rejected.
        if rest.iter().any(|c| !is_newline(c)) {
            return Err(error(ParseErrorKind::ParseError(INVALID_RECORD)));
        }

        match parse_proguard_record(first) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(error(ParseErrorKind::ParseError(EMPTY_LINE))),
            Err(kind) => Err(error(kind)),
        }
    }
}

/// Parses a single line from a Proguard File.
///
/// Returns `Ok(None)` for blank lines.
fn parse_proguard_record(line: &[u8]) -> Result<Option<ProguardRecord<'_>>, ParseErrorKind> {
    let line = str::from_utf8(line)
        .map_err(ParseErrorKind::Utf8Error)?
        .trim_end();
    let member = line.trim_start();

    if member.is_empty() {
        Ok(None)
    } else if let Some(header) = member.strip_prefix('#') {
        Ok(Some(parse_proguard_header(header)))
    } else if member.len() != line.len() {
        parse_proguard_field_or_method(member).map(Some)
    } else {
        parse_proguard_class(line).map(Some)
    }
}

const SOURCE_FILE_PREFIX: &str = r#" {"id":"sourceFile","fileName":""#;

/// Parses a single Proguard Header from a Proguard File.
///
/// Comment lines never fail to parse.
fn parse_proguard_header(header: &str) -> ProguardRecord<'_> {
    if let Some(file_name) = header
        .strip_prefix(SOURCE_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(r#""}"#))
    {
        return ProguardRecord::Header {
            key: "sourceFile",
            value: Some(file_name),
        };
    }

    match header.split_once(':') {
        Some((key, value)) => ProguardRecord::Header {
            key: key.trim(),
            value: Some(value.trim()),
        },
        None => ProguardRecord::Header {
            key: header.trim(),
            value: None,
        },
    }
}

/// Parses a single Proguard Field or Method from a Proguard File.
fn parse_proguard_field_or_method(line: &str) -> Result<ProguardRecord<'_>, ParseErrorKind> {
    // field line or method line:
    // `originalfieldtype originalfieldname -> obfuscatedfieldname`
    // `[startline:[endline:]]originalreturntype [originalclassname.]originalmethodname(originalargumenttype,...)[:originalstartline[:originalendline]] -> obfuscatedmethodname`
    let (member, obfuscated) = line
        .rsplit_once(" -> ")
        .ok_or(ParseErrorKind::ParseError(MISSING_SEPARATOR))?;
    let obfuscated = obfuscated.trim();
    if !is_name(obfuscated) {
        return Err(ParseErrorKind::ParseError(INVALID_OBFUSCATED));
    }

    if member.contains('(') {
        parse_proguard_method(member, obfuscated)
    } else {
        parse_proguard_field(member, obfuscated)
    }
}

fn parse_proguard_field<'s>(
    member: &'s str,
    obfuscated: &'s str,
) -> Result<ProguardRecord<'s>, ParseErrorKind> {
    let (ty, original) = member
        .split_once(' ')
        .ok_or(ParseErrorKind::ParseError(INVALID_FIELD))?;
    if !is_name(ty) || !is_name(original) {
        return Err(ParseErrorKind::ParseError(INVALID_FIELD));
    }

    Ok(ProguardRecord::Field {
        ty,
        original,
        obfuscated,
    })
}

fn parse_proguard_method<'s>(
    member: &'s str,
    obfuscated: &'s str,
) -> Result<ProguardRecord<'s>, ParseErrorKind> {
    let invalid = ParseErrorKind::ParseError(INVALID_METHOD);
    let mut line_range = ProguardLineRange::default();
    let mut rest = member;

    // A lone `start:` prefix is tolerated, `end` then stays `0`.
    if let Some((startline, after)) = parse_u32(rest)? {
        line_range.obf_start = startline;
        rest = after.strip_prefix(':').ok_or(invalid)?;

        if let Some((endline, after)) = parse_u32(rest)? {
            line_range.obf_end = endline;
            rest = after.strip_prefix(':').ok_or(invalid)?;
        }
    }

    let (ty, rest) = rest.split_once(' ').ok_or(invalid)?;
    let (original, rest) = rest.split_once('(').ok_or(invalid)?;
    let (arguments, suffix) = rest.split_once(')').ok_or(invalid)?;

    if !is_name(ty)
        || ty.contains(':')
        || !is_name(original)
        || arguments.contains(char::is_whitespace)
    {
        return Err(invalid);
    }

    if !suffix.is_empty() {
        let suffix = suffix.strip_prefix(':').ok_or(invalid)?;
        match suffix.split_once(':') {
            Some((original_startline, original_endline)) => {
                line_range.orig_start = parse_number(original_startline)?;
                line_range.orig_end = parse_number(original_endline)?;
            }
            None => {
                line_range.orig_start = parse_number(suffix)?;
            }
        }
    }

    Ok(ProguardRecord::Method {
        ty,
        original,
        obfuscated,
        arguments,
        line_range,
    })
}

/// Parses a single Proguard Class from a Proguard File.
fn parse_proguard_class(line: &str) -> Result<ProguardRecord<'_>, ParseErrorKind> {
    // class line:
    // `originalclassname -> obfuscatedclassname:`
    let (original, rest) = line
        .split_once(" -> ")
        .ok_or(ParseErrorKind::ParseError(MISSING_SEPARATOR))?;

    let obfuscated = rest
        .strip_suffix(':')
        .ok_or(ParseErrorKind::ParseError(MISSING_CLASS_COLON))?;

    if !is_name(original) || !is_name(obfuscated) {
        return Err(ParseErrorKind::ParseError(INVALID_CLASS));
    }

    Ok(ProguardRecord::Class {
        original,
        obfuscated,
    })
}

/// Parses leading ascii digits, `None` if there are none.
fn parse_u32(s: &str) -> Result<Option<(u32, &str)>, ParseErrorKind> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return Ok(None);
    }

    let (digits, rest) = s.split_at(end);
    let value = digits
        .parse()
        .map_err(|_| ParseErrorKind::ParseError(INVALID_NUMBER))?;
    Ok(Some((value, rest)))
}

fn parse_number(s: &str) -> Result<u32, ParseErrorKind> {
    match parse_u32(s)? {
        Some((value, "")) => Ok(value),
        _ => Err(ParseErrorKind::ParseError(INVALID_NUMBER)),
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

/// Splits off the first line, without its `\n` or `\r\n` terminator.
fn split_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|c| *c == b'\n') {
        Some(pos) => (&bytes[..pos], &bytes[pos + 1..]),
        None => (bytes, &[] as &[u8]),
    };

    (line.strip_suffix(b"\r").unwrap_or(line), rest)
}

fn is_newline(byte: &u8) -> bool {
    *byte == b'\r' || *byte == b'\n'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error<'a>(
        line: &'a [u8],
        line_number: usize,
        reason: &'static str,
    ) -> ParseError<'a> {
        ParseError {
            line,
            line_number,
            kind: ParseErrorKind::ParseError(reason),
        }
    }

    #[test]
    fn try_parse_header_with_value() {
        let bytes = b"# compiler: R8";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Header {
                key: "compiler",
                value: Some("R8")
            })
        );
    }

    #[test]
    fn try_parse_header_without_value() {
        let bytes = b"# common_typos_disable";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Header {
                key: "common_typos_disable",
                value: None,
            })
        );
    }

    #[test]
    fn try_parse_indented_comment() {
        let bytes = b"    # a comment -> with an arrow";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Header {
                key: "a comment -> with an arrow",
                value: None,
            })
        );
    }

    #[test]
    fn try_parse_header_source_file() {
        let bytes = br#"# {"id":"sourceFile","fileName":"Foobar.kt"}"#;
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Header {
                key: "sourceFile",
                value: Some("Foobar.kt")
            })
        );
    }

    #[test]
    fn try_parse_class_consumes_trailing_newlines() {
        let bytes = b"android.support.v4.app.Fragment -> android.support.v4.app.Fragment:\r\n\r\n";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Class {
                original: "android.support.v4.app.Fragment",
                obfuscated: "android.support.v4.app.Fragment"
            })
        );
    }

    #[test]
    fn try_parse_field() {
        let bytes = b"    android.support.v4.util.SimpleArrayMap sClassMap -> sClassMap";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Field {
                ty: "android.support.v4.util.SimpleArrayMap",
                original: "sClassMap",
                obfuscated: "sClassMap",
            }),
        );
    }

    #[test]
    fn try_parse_field_with_tab_indent() {
        let bytes = b"\tint do1 -> a";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Field {
                ty: "int",
                original: "do1",
                obfuscated: "a",
            }),
        );
    }

    #[test]
    fn try_parse_method_simple() {
        let bytes = b"    java.io.File createTempFile() -> a";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Method {
                ty: "java.io.File",
                original: "createTempFile",
                obfuscated: "a",
                arguments: "",
                line_range: ProguardLineRange::default(),
            }),
        );
    }

    #[test]
    fn try_parse_method_with_start_end_lines() {
        let bytes = b"    1:10:com.foo.bar stuff(com.foo.bar,com.foo.bar) -> x";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Method {
                ty: "com.foo.bar",
                original: "stuff",
                obfuscated: "x",
                arguments: "com.foo.bar,com.foo.bar",
                line_range: ProguardLineRange::new(1, 10, 0, 0),
            }),
        );
    }

    #[test]
    fn try_parse_method_with_original_start_line() {
        let bytes = b"    1:1:boolean isRequirementsMet():275 -> k";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Method {
                ty: "boolean",
                original: "isRequirementsMet",
                obfuscated: "k",
                arguments: "",
                line_range: ProguardLineRange::new(1, 1, 275, 0),
            }),
        );
    }

    #[test]
    fn try_parse_method_with_all_lines() {
        let bytes = b"    356:368:com.facebook.react.bridge.WritableMap translateHeaders(com.instagram.common.api.base.Header[]):10:22 -> translateHeaders";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Method {
                ty: "com.facebook.react.bridge.WritableMap",
                original: "translateHeaders",
                obfuscated: "translateHeaders",
                arguments: "com.instagram.common.api.base.Header[]",
                line_range: ProguardLineRange::new(356, 368, 10, 22),
            }),
        );
    }

    #[test]
    fn try_parse_method_with_only_startline() {
        let bytes = b"    3:void stuff() -> b";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Method {
                ty: "void",
                original: "stuff",
                obfuscated: "b",
                arguments: "",
                line_range: ProguardLineRange::new(3, 0, 0, 0),
            }),
        );
    }

    #[test]
    fn try_parse_method_with_unicode_name() {
        let bytes = "    java.lang.String ƒKEY_FILTER -> ƒKEY_FILTER".as_bytes();
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(
            parsed,
            Ok(ProguardRecord::Field {
                ty: "java.lang.String",
                original: "ƒKEY_FILTER",
                obfuscated: "ƒKEY_FILTER",
            }),
        );
    }

    #[test]
    fn try_parse_class_with_bad_delimiter() {
        // intentionally removed the spaces from the delimiter
        let bytes = b"android.support.v4.app.Fragment->android.support.v4.app.Fragment:";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(bytes, 1, MISSING_SEPARATOR)));
    }

    #[test]
    fn try_parse_class_without_trailing_colon() {
        // intentionally removed trailing colon
        let bytes = b"android.support.v4.app.Fragment -> android.support.v4.app.Fragment";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(bytes, 1, MISSING_CLASS_COLON)));
    }

    #[test]
    fn try_parse_method_without_type() {
        let bytes = b"    14:15:androidx.appcompat.app.AppCompatDelegateImpl.setSupportActionBar(androidx.appcompat.widget.Toolbar) -> onCreate";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(bytes, 1, INVALID_METHOD)));
    }

    #[test]
    fn try_parse_method_with_broken_range() {
        let bytes = b"    1:x:void run() -> c";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(bytes, 1, INVALID_METHOD)));
    }

    #[test]
    fn try_parse_method_with_garbage_suffix() {
        let bytes = b"    1:1:void onRun():28x -> o";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(bytes, 1, INVALID_NUMBER)));
    }

    #[test]
    fn try_parse_member_with_invalid_obfuscated_name() {
        let bytes = b"    int do1 -> a b";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(bytes, 1, INVALID_OBFUSCATED)));
    }

    #[test]
    fn try_parse_invalid_utf8() {
        let bytes = b"com.foo.\xffbar -> A:";
        let parsed = ProguardRecord::try_parse(bytes);
        assert!(matches!(
            parsed.map_err(|e| e.kind()),
            Err(ParseErrorKind::Utf8Error(_))
        ));
    }

    #[test]
    fn try_parse_rejects_multiple_lines() {
        let bytes = b"a -> b:\n    int c -> d";
        let parsed = ProguardRecord::try_parse(bytes);
        assert_eq!(parsed, Err(parse_error(b"a -> b:", 1, INVALID_RECORD)));
    }

    #[test]
    fn try_parse_iter() {
        let bytes = b"\
# compiler: R8
# common_typos_disable

androidx.activity.OnBackPressedCallback->c.a.b:
androidx.activity.OnBackPressedCallback -> c.a.b:
    boolean mEnabled -> a
    java.util.ArrayDeque mOnBackPressedCallbacks -> b
    1:4:void onBackPressed():184:187 -> c
androidx.activity.OnBackPressedCallback
        ";

        let mapping: Vec<Result<ProguardRecord, ParseError>> =
            ProguardMapping::new(bytes).iter().collect();
        assert_eq!(
            mapping,
            vec![
                Ok(ProguardRecord::Header {
                    key: "compiler",
                    value: Some("R8"),
                }),
                Ok(ProguardRecord::Header {
                    key: "common_typos_disable",
                    value: None,
                }),
                Err(parse_error(
                    b"androidx.activity.OnBackPressedCallback->c.a.b:",
                    4,
                    MISSING_SEPARATOR
                )),
                Ok(ProguardRecord::Class {
                    original: "androidx.activity.OnBackPressedCallback",
                    obfuscated: "c.a.b",
                }),
                Ok(ProguardRecord::Field {
                    ty: "boolean",
                    original: "mEnabled",
                    obfuscated: "a",
                }),
                Ok(ProguardRecord::Field {
                    ty: "java.util.ArrayDeque",
                    original: "mOnBackPressedCallbacks",
                    obfuscated: "b",
                }),
                Ok(ProguardRecord::Method {
                    ty: "void",
                    original: "onBackPressed",
                    obfuscated: "c",
                    arguments: "",
                    line_range: ProguardLineRange::new(1, 4, 184, 187),
                }),
                Err(parse_error(
                    b"androidx.activity.OnBackPressedCallback",
                    9,
                    MISSING_SEPARATOR
                )),
            ],
        );
    }

    #[test]
    fn summary_reads_r8_headers() {
        let bytes = b"\
# compiler: R8
# compiler_version: 1.3.23
# min_api: 15
com.foo.bar -> A:
    int do1 -> a
    3:3:void <init>() -> <init>
";
        let summary = ProguardMapping::new(bytes).summary();
        assert_eq!(summary.compiler(), Some("R8"));
        assert_eq!(summary.compiler_version(), Some("1.3.23"));
        assert_eq!(summary.min_api(), Some(15));
        assert_eq!(summary.class_count(), 1);
        assert_eq!(summary.method_count(), 1);
    }
}
