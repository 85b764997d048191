use tracecop_core::trace::types::{AccessMode, ExecutionRecord};
/// Winnow-based parser for the line-oriented trace text format.
///
/// Grammar:
/// ```text
/// trace     = (comment | blank | record)*
/// comment   = WS? "//" REST_OF_LINE EOL
/// blank     = WS? EOL
/// record    = WS? pid WS start ".." end WS mode WS? resources WS? EOL
/// resources = "{" WS? (resource (WS resource)*)? WS? "}"
/// mode      = "r" | "w" | "n"
/// pid       = INTEGER
/// start     = INTEGER
/// end       = INTEGER
/// resource  = [A-Za-z0-9_./-]+
/// EOL       = NEWLINE | END_OF_INPUT
/// ```
///
/// [`tracecop_core::trace::format_trace`] writes exactly this format.
use winnow::ascii::{dec_uint, line_ending, till_line_ending};
use winnow::combinator::{alt, eof, separated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_while};
use winnow::ModalResult;

type Record = ExecutionRecord<String, u64>;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// A parse error with human-readable location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Parse a trace in text form into execution records, in file order.
///
/// Intervals are not validated here; a record whose end precedes its start
/// parses fine and is rejected later by the analysis.
///
/// # Errors
///
/// Returns a [`ParseError`] with line/column information when the input does
/// not conform to the grammar.
pub fn parse_trace(input: &str) -> Result<Vec<Record>, ParseError> {
    let original = input;
    let mut stream: &str = input;
    match trace_parser.parse_next(&mut stream) {
        Ok(records) => Ok(records),
        Err(e) => {
            let consumed = original.len().saturating_sub(stream.len());
            let (line, column) = offset_to_line_col(original, consumed);
            Err(ParseError {
                message: e.to_string(),
                line,
                column,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Line/column helper
// ---------------------------------------------------------------------------

/// Convert a byte offset into the original input to 1-based (line, column).
fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let prefix = &input[..offset.min(input.len())];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = prefix
        .rfind('\n')
        .map_or_else(|| prefix.len() + 1, |pos| prefix.len() - pos);
    (line, column)
}

// ---------------------------------------------------------------------------
// Whitespace helpers
// ---------------------------------------------------------------------------

const fn is_inline_ws(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(1.., is_inline_ws).void().parse_next(input)
}

fn opt_inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., is_inline_ws).void().parse_next(input)
}

/// A line ending, or the end of the input for an unterminated last line.
fn end_of_line(input: &mut &str) -> ModalResult<()> {
    alt((line_ending.void(), eof.void()))
        .context(StrContext::Expected(StrContextValue::Description(
            "end of line",
        )))
        .parse_next(input)
}

// ---------------------------------------------------------------------------
// Leaf parsers
// ---------------------------------------------------------------------------

fn process_id(input: &mut &str) -> ModalResult<u64> {
    dec_uint
        .context(StrContext::Label("process id"))
        .parse_next(input)
}

fn timestamp(input: &mut &str) -> ModalResult<u64> {
    dec_uint
        .context(StrContext::Label("timestamp"))
        .parse_next(input)
}

/// `start ".." end`
fn interval(input: &mut &str) -> ModalResult<(u64, u64)> {
    let start = timestamp.parse_next(input)?;
    literal("..")
        .context(StrContext::Expected(StrContextValue::StringLiteral("..")))
        .parse_next(input)?;
    let end = timestamp.parse_next(input)?;
    Ok((start, end))
}

fn mode(input: &mut &str) -> ModalResult<AccessMode> {
    alt((
        literal("r").value(AccessMode::Read),
        literal("w").value(AccessMode::Write),
        literal("n").value(AccessMode::None),
    ))
    .context(StrContext::Label("access mode"))
    .context(StrContext::Expected(StrContextValue::Description(
        "one of `r`, `w` or `n`",
    )))
    .parse_next(input)
}

fn resource(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')
    })
    .map(str::to_string)
    .context(StrContext::Label("resource"))
    .parse_next(input)
}

/// `"{" resource* "}"`, possibly empty.
fn resources(input: &mut &str) -> ModalResult<Vec<String>> {
    literal("{")
        .context(StrContext::Expected(StrContextValue::CharLiteral('{')))
        .parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    let names: Vec<String> = separated(0.., resource, inline_ws).parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    literal("}")
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(names)
}

// ---------------------------------------------------------------------------
// Line parsers
// ---------------------------------------------------------------------------

/// A comment line. Produces nothing.
fn comment_line(input: &mut &str) -> ModalResult<Option<Record>> {
    opt_inline_ws.parse_next(input)?;
    literal("//").parse_next(input)?;
    till_line_ending.parse_next(input)?;
    end_of_line.parse_next(input)?;
    Ok(None)
}

/// A line holding only whitespace. Produces nothing.
fn blank_line(input: &mut &str) -> ModalResult<Option<Record>> {
    opt_inline_ws.parse_next(input)?;
    line_ending.parse_next(input)?;
    Ok(None)
}

fn record_line(input: &mut &str) -> ModalResult<Option<Record>> {
    opt_inline_ws.parse_next(input)?;
    let pid = process_id.parse_next(input)?;
    inline_ws.parse_next(input)?;
    let (start, end) = interval.parse_next(input)?;
    inline_ws.parse_next(input)?;
    let mode = mode.parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    let resources = resources.parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    end_of_line.parse_next(input)?;
    Ok(Some(ExecutionRecord::new(pid, start, end, resources, mode)))
}

// ---------------------------------------------------------------------------
// Trace parser
// ---------------------------------------------------------------------------

/// Dispatch on the start of each line so that a record error is reported
/// where the record went wrong, not where the line began.
fn trace_parser(input: &mut &str) -> ModalResult<Vec<Record>> {
    let mut records = Vec::new();
    loop {
        let trimmed = input.trim_start_matches(is_inline_ws);
        if trimmed.is_empty() {
            opt_inline_ws.parse_next(input)?;
            break;
        }
        let item = if trimmed.starts_with("//") {
            comment_line.parse_next(input)?
        } else if trimmed.starts_with(['\n', '\r']) {
            blank_line.parse_next(input)?
        } else {
            record_line.parse_next(input)?
        };
        if let Some(record) = item {
            records.push(record);
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
