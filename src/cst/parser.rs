//! A hand-rolled, comment-preserving parser for the block/flow YAML subset
//! this crate's graph documents actually use: block mappings and sequences,
//! inline flow mappings/sequences (`{a: 1}`, `[1, 2]`), plain/quoted scalars,
//! and `#` comments. It deliberately does not support anchors, aliases,
//! multi-document streams, block scalars (`|`/`>`) or tags — none of which
//! appear in graph-type mapping/schema/data files, and each is rejected with
//! a [`YamlParseError`] rather than silently mis-parsed.
//!
//! Two passes produce parallel trees from the same source: [`YamlValue`] (the
//! plain data, used for validation/extraction) and [`CstNode`] (the same
//! shape plus byte ranges and comments, used for editing).

use memchr::memchr;

use crate::model::SourceRange;

use super::error::YamlParseError;
use super::node::{CstMapEntry, CstNode, CstSeqItem};
use super::value::YamlValue;

#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
}

pub(crate) fn split_lines(text: &str) -> Vec<Line> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    loop {
        match memchr(b'\n', &bytes[start..]) {
            Some(rel) => {
                let mut end = start + rel;
                if end > start && bytes[end - 1] == b'\r' {
                    end -= 1;
                }
                lines.push(Line { start, end });
                start += rel + 1;
            }
            None => {
                lines.push(Line { start, end: bytes.len() });
                break;
            }
        }
    }
    lines
}

fn line_no_for_offset(lines: &[Line], offset: usize) -> (usize, usize) {
    for (idx, line) in lines.iter().enumerate() {
        if offset >= line.start && offset <= line.end {
            return (idx + 1, offset - line.start + 1);
        }
    }
    (lines.len(), 1)
}

fn indent_of(text: &str, line: Line) -> Option<usize> {
    let slice = &text[line.start..line.end];
    if slice.contains('\t') {
        return None;
    }
    let trimmed = slice.trim_start_matches(' ');
    Some(slice.len() - trimmed.len())
}

fn is_blank_or_comment(text: &str, line: Line) -> Option<bool> {
    let indent = indent_of(text, line)?;
    let content = text[line.start + indent..line.end].trim_end();
    Some(content.is_empty() || content.starts_with('#'))
}

/// Splits `rest` into `(value_text, trailing_comment)` at the first `#` that
/// isn't inside a quoted string.
fn split_trailing_comment(rest: &str) -> (&str, Option<String>) {
    let bytes = rest.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' if !in_double => in_single = !in_single,
            b'"' if !in_single => in_double = !in_double,
            b'#' if !in_single && !in_double => {
                let before_is_boundary = i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t';
                if before_is_boundary {
                    let value = rest[..i].trim_end();
                    let comment = rest[i + 1..].trim();
                    return (value, Some(comment.to_owned()));
                }
            }
            _ => {}
        }
        i += 1;
    }
    (rest.trim_end(), None)
}

/// Finds the byte offset of the colon that introduces a mapping value, i.e.
/// one not inside quotes and followed by whitespace or end-of-text.
fn find_key_colon(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' if !in_double => in_single = !in_single,
            b'"' if !in_single => in_double = !in_double,
            b':' if !in_single && !in_double => {
                let next_ok = i + 1 == bytes.len() || bytes[i + 1] == b' ' || bytes[i + 1] == b'\t';
                if next_ok {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn unquote_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        if (bytes[0] == b'"' && bytes[trimmed.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[trimmed.len() - 1] == b'\'')
        {
            return trimmed[1..trimmed.len() - 1].to_owned();
        }
    }
    trimmed.to_owned()
}

fn parse_scalar_text(raw: &str) -> YamlValue {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        if bytes[0] == b'"' && bytes[trimmed.len() - 1] == b'"' {
            let inner = &trimmed[1..trimmed.len() - 1];
            return YamlValue::String(inner.replace("\\\"", "\"").replace("\\\\", "\\"));
        }
        if bytes[0] == b'\'' && bytes[trimmed.len() - 1] == b'\'' {
            let inner = &trimmed[1..trimmed.len() - 1];
            return YamlValue::String(inner.replace("''", "'"));
        }
    }
    match trimmed {
        "" | "~" | "null" | "Null" | "NULL" => YamlValue::Null,
        "true" | "True" | "TRUE" => YamlValue::Bool(true),
        "false" | "False" | "FALSE" => YamlValue::Bool(false),
        _ => {
            if let Ok(n) = trimmed.parse::<i64>() {
                YamlValue::Int(n)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                if trimmed.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) {
                    YamlValue::Float(f)
                } else {
                    YamlValue::String(trimmed.to_owned())
                }
            } else {
                YamlValue::String(trimmed.to_owned())
            }
        }
    }
}

/// Top-level entry point: parses `text` into parallel data/CST trees.
pub fn parse(text: &str) -> Result<(YamlValue, CstNode), YamlParseError> {
    let lines = split_lines(text);
    let mut idx = 0usize;
    let (value, node, next) = parse_block_auto(text, &lines, &mut idx, 0)?;
    idx = next;
    // Trailing content after the root block must be blank/comments only.
    while idx < lines.len() {
        let line = lines[idx];
        match is_blank_or_comment(text, line) {
            Some(true) => idx += 1,
            Some(false) => {
                let (l, c) = line_no_for_offset(&lines, line.start);
                return Err(YamlParseError::new(l, c, "unexpected content after root document"));
            }
            None => {
                let (l, c) = line_no_for_offset(&lines, line.start);
                return Err(YamlParseError::new(l, c, "tab characters are not allowed for indentation"));
            }
        }
    }
    Ok((value, node))
}

/// Skips blank/comment-only lines starting at `*idx`, returning any collected
/// comment text to attach as a leading comment, and the index of the first
/// significant line (or `lines.len()` at EOF).
fn skip_blank_and_comments(text: &str, lines: &[Line], idx: &mut usize) -> Option<String> {
    let mut comments: Vec<String> = Vec::new();
    while *idx < lines.len() {
        let line = lines[*idx];
        match is_blank_or_comment(text, line) {
            Some(true) => {
                let indent = indent_of(text, line).unwrap_or(0);
                let content = text[line.start + indent..line.end].trim_end();
                if let Some(comment) = content.strip_prefix('#') {
                    comments.push(comment.trim().to_owned());
                }
                *idx += 1;
            }
            _ => break,
        }
    }
    if comments.is_empty() {
        None
    } else {
        Some(comments.join("\n"))
    }
}

/// Parses a block starting at `*idx`, auto-detecting mapping vs. sequence vs.
/// scalar from the first significant line's shape. `min_indent` is the
/// minimum indentation a line must have to belong to this block (the caller
/// already consumed the parent's prefix).
fn parse_block_auto(
    text: &str,
    lines: &[Line],
    idx: &mut usize,
    min_indent: usize,
) -> Result<(YamlValue, CstNode, usize), YamlParseError> {
    let start_idx = *idx;
    skip_blank_and_comments(text, lines, idx);
    if *idx >= lines.len() {
        *idx = start_idx;
        let range = SourceRange::new(text.len(), text.len());
        return Ok((YamlValue::Null, CstNode::Scalar { range }, *idx));
    }
    let line = lines[*idx];
    let indent = match indent_of(text, line) {
        Some(i) => i,
        None => {
            let (l, c) = line_no_for_offset(lines, line.start);
            return Err(YamlParseError::new(l, c, "tab characters are not allowed for indentation"));
        }
    };
    if indent < min_indent {
        *idx = start_idx;
        let range = SourceRange::new(line.start, line.start);
        return Ok((YamlValue::Null, CstNode::Scalar { range }, *idx));
    }
    let content = &text[line.start + indent..line.end];
    *idx = start_idx;
    if content.starts_with("- ") || content == "-" {
        parse_sequence_block(text, lines, idx, indent)
    } else if find_key_colon(content).is_some() {
        parse_mapping_block(text, lines, idx, indent)
    } else {
        // Bare scalar line (no further nesting support for multi-line scalars).
        skip_blank_and_comments(text, lines, idx);
        let line = lines[*idx];
        let (value_text, _comment) = split_trailing_comment(&text[line.start + indent..line.end]);
        let value = parse_scalar_text(value_text);
        let range = SourceRange::new(line.start + indent, line.start + indent + value_text.len());
        *idx += 1;
        Ok((value, CstNode::Scalar { range }, *idx))
    }
}

fn parse_mapping_block(
    text: &str,
    lines: &[Line],
    idx: &mut usize,
    indent: usize,
) -> Result<(YamlValue, CstNode, usize), YamlParseError> {
    let mut data_entries: Vec<(String, YamlValue)> = Vec::new();
    let mut cst_entries: Vec<CstMapEntry> = Vec::new();
    let block_start = lines[*idx].start;
    let mut block_end = block_start;

    loop {
        let leading_comment = skip_blank_and_comments(text, lines, idx);
        if *idx >= lines.len() {
            break;
        }
        let line = lines[*idx];
        let cur_indent = match indent_of(text, line) {
            Some(i) => i,
            None => {
                let (l, c) = line_no_for_offset(lines, line.start);
                return Err(YamlParseError::new(l, c, "tab characters are not allowed for indentation"));
            }
        };
        if cur_indent < indent {
            break;
        }
        if cur_indent > indent {
            let (l, c) = line_no_for_offset(lines, line.start);
            return Err(YamlParseError::new(l, c, "unexpected indentation in mapping"));
        }
        let content = &text[line.start + cur_indent..line.end];
        let colon = match find_key_colon(content) {
            Some(c) => c,
            None => {
                let (l, c) = line_no_for_offset(lines, line.start);
                return Err(YamlParseError::new(l, c, "expected 'key: value' in mapping"));
            }
        };
        let key_raw = &content[..colon];
        let key = unquote_key(key_raw);
        let key_start = line.start + cur_indent;
        let key_range = SourceRange::new(key_start, key_start + colon);
        let rest = content[colon + 1..].trim_start();
        let rest_is_present = !content[colon + 1..].trim().is_empty();

        *idx += 1;
        let (value, value_node, trailing_comment) = if rest_is_present {
            let (value_text, trailing) = split_trailing_comment(rest);
            let pad = content[colon + 1..].len() - content[colon + 1..].trim_start().len();
            let value_abs_start = key_start + colon + 1 + pad;
            if value_text.starts_with('{') || value_text.starts_with('[') {
                let mut scanner = FlowScanner::new(text, value_abs_start);
                let (v, node) = scanner.parse_value()?;
                (v, node, trailing)
            } else {
                let v = parse_scalar_text(value_text);
                let range = SourceRange::new(value_abs_start, value_abs_start + value_text.len());
                (v, CstNode::Scalar { range }, trailing)
            }
        } else {
            let (v, node, next) = parse_block_auto(text, lines, idx, indent + 1)?;
            *idx = next;
            (v, node, None)
        };
        block_end = value_node.range().end_offset.max(block_end).max(key_range.end_offset);
        data_entries.push((key.clone(), value));
        cst_entries.push(CstMapEntry {
            key,
            key_range,
            value: value_node,
            leading_comment,
            trailing_comment,
        });
    }

    let range = SourceRange::new(block_start, block_end.max(block_start));
    Ok((
        YamlValue::Mapping(data_entries),
        CstNode::Mapping { range, entries: cst_entries },
        *idx,
    ))
}

fn parse_sequence_block(
    text: &str,
    lines: &[Line],
    idx: &mut usize,
    indent: usize,
) -> Result<(YamlValue, CstNode, usize), YamlParseError> {
    let mut data_items: Vec<YamlValue> = Vec::new();
    let mut cst_items: Vec<CstSeqItem> = Vec::new();
    let block_start = lines[*idx].start;
    let mut block_end = block_start;

    loop {
        let leading_comment = skip_blank_and_comments(text, lines, idx);
        if *idx >= lines.len() {
            break;
        }
        let line = lines[*idx];
        let cur_indent = match indent_of(text, line) {
            Some(i) => i,
            None => {
                let (l, c) = line_no_for_offset(lines, line.start);
                return Err(YamlParseError::new(l, c, "tab characters are not allowed for indentation"));
            }
        };
        if cur_indent < indent {
            break;
        }
        if cur_indent > indent {
            let (l, c) = line_no_for_offset(lines, line.start);
            return Err(YamlParseError::new(l, c, "unexpected indentation in sequence"));
        }
        let content = &text[line.start + cur_indent..line.end];
        if !(content.starts_with("- ") || content == "-") {
            break;
        }
        let dash_col = cur_indent;
        let after_dash = if content == "-" { "" } else { &content[2..] };
        let item_base_indent = dash_col + 2;

        *idx += 1;
        let (value, node, trailing_comment) = if after_dash.trim().is_empty() {
            let (v, node, next) = parse_block_auto(text, lines, idx, item_base_indent)?;
            *idx = next;
            (v, node, None)
        } else if find_key_colon(after_dash).is_some() {
            // `- key: value` starts an inline mapping whose later entries
            // continue at `item_base_indent` on following physical lines.
            let first_key_offset = line.start + cur_indent + 2;
            let (v, node) = parse_mapping_with_first_entry(
                text,
                lines,
                idx,
                item_base_indent,
                first_key_offset,
                after_dash,
            )?;
            (v, node, None)
        } else {
            let after_dash_trimmed = after_dash.trim_start();
            let pad = after_dash.len() - after_dash_trimmed.len();
            let (value_text, trailing) = split_trailing_comment(after_dash_trimmed);
            let value_abs_start = line.start + cur_indent + 2 + pad;
            if value_text.starts_with('{') || value_text.starts_with('[') {
                let mut scanner = FlowScanner::new(text, value_abs_start);
                let (v, node) = scanner.parse_value()?;
                (v, node, trailing)
            } else {
                let v = parse_scalar_text(value_text);
                let range = SourceRange::new(value_abs_start, value_abs_start + value_text.len());
                (v, CstNode::Scalar { range }, trailing)
            }
        };
        block_end = node.range().end_offset.max(block_end);
        data_items.push(value);
        cst_items.push(CstSeqItem {
            value: node,
            leading_comment,
            trailing_comment,
        });
    }

    let range = SourceRange::new(block_start, block_end.max(block_start));
    Ok((
        YamlValue::Sequence(data_items),
        CstNode::Sequence { range, items: cst_items },
        *idx,
    ))
}

/// Parses a mapping where the first entry's key/value already sit on the
/// current (sequence-dash) line, and subsequent entries follow as ordinary
/// `key: value` lines at `indent`.
fn parse_mapping_with_first_entry(
    text: &str,
    lines: &[Line],
    idx: &mut usize,
    indent: usize,
    first_key_offset: usize,
    first_entry_text: &str,
) -> Result<(YamlValue, CstNode), YamlParseError> {
    let colon = find_key_colon(first_entry_text).expect("caller checked this");
    let key = unquote_key(&first_entry_text[..colon]);
    let key_range = SourceRange::new(first_key_offset, first_key_offset + colon);
    let rest = first_entry_text[colon + 1..].trim_start();
    let rest_is_present = !first_entry_text[colon + 1..].trim().is_empty();

    let (first_value, first_node, first_trailing) = if rest_is_present {
        let (value_text, trailing) = split_trailing_comment(rest);
        let pad = first_entry_text[colon + 1..].len() - first_entry_text[colon + 1..].trim_start().len();
        let value_abs_start = first_key_offset + colon + 1 + pad;
        if value_text.starts_with('{') || value_text.starts_with('[') {
            let mut scanner = FlowScanner::new(text, value_abs_start);
            let (v, node) = scanner.parse_value()?;
            (v, node, trailing)
        } else {
            let v = parse_scalar_text(value_text);
            let range = SourceRange::new(value_abs_start, value_abs_start + value_text.len());
            (v, CstNode::Scalar { range }, trailing)
        }
    } else {
        let (v, node, next) = parse_block_auto(text, lines, idx, indent + 1)?;
        *idx = next;
        (v, node, None)
    };

    let mut data_entries = vec![(key.clone(), first_value)];
    let mut cst_entries = vec![CstMapEntry {
        key,
        key_range,
        value: first_node,
        leading_comment: None,
        trailing_comment: first_trailing,
    }];
    let mut block_end = cst_entries[0].value.range().end_offset.max(key_range.end_offset);

    loop {
        let save = *idx;
        let leading_comment = skip_blank_and_comments(text, lines, idx);
        if *idx >= lines.len() {
            break;
        }
        let line = lines[*idx];
        let cur_indent = match indent_of(text, line) {
            Some(i) => i,
            None => {
                *idx = save;
                break;
            }
        };
        if cur_indent != indent {
            *idx = save;
            break;
        }
        let content = &text[line.start + cur_indent..line.end];
        if content.starts_with("- ") || content == "-" {
            *idx = save;
            break;
        }
        let colon = match find_key_colon(content) {
            Some(c) => c,
            None => {
                *idx = save;
                break;
            }
        };
        let key = unquote_key(&content[..colon]);
        let key_start = line.start + cur_indent;
        let key_range = SourceRange::new(key_start, key_start + colon);
        let rest = content[colon + 1..].trim_start();
        let rest_is_present = !content[colon + 1..].trim().is_empty();
        *idx += 1;
        let (value, node, trailing) = if rest_is_present {
            let (value_text, trailing) = split_trailing_comment(rest);
            let pad = content[colon + 1..].len() - content[colon + 1..].trim_start().len();
            let value_abs_start = key_start + colon + 1 + pad;
            if value_text.starts_with('{') || value_text.starts_with('[') {
                let mut scanner = FlowScanner::new(text, value_abs_start);
                let (v, node) = scanner.parse_value()?;
                (v, node, trailing)
            } else {
                let v = parse_scalar_text(value_text);
                let range = SourceRange::new(value_abs_start, value_abs_start + value_text.len());
                (v, CstNode::Scalar { range }, trailing)
            }
        } else {
            let (v, node, next) = parse_block_auto(text, lines, idx, indent + 1)?;
            *idx = next;
            (v, node, None)
        };
        block_end = node.range().end_offset.max(block_end);
        data_entries.push((key.clone(), value));
        cst_entries.push(CstMapEntry {
            key,
            key_range,
            value: node,
            leading_comment,
            trailing_comment: trailing,
        });
    }
    let _ = first_trailing;

    let range = SourceRange::new(first_key_offset, block_end);
    Ok((YamlValue::Mapping(data_entries), CstNode::Mapping { range, entries: cst_entries }))
}

/// Recursive-descent parser for inline flow collections (`{...}`, `[...]`)
/// and the scalars inside them.
struct FlowScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> FlowScanner<'a> {
    fn new(text: &'a str, start: usize) -> Self {
        Self { text, pos: start }
    }

    fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn line_col(&self) -> (usize, usize) {
        let lines = split_lines(self.text);
        line_no_for_offset(&lines, self.pos)
    }

    fn err(&self, message: impl Into<String>) -> YamlParseError {
        let (l, c) = self.line_col();
        YamlParseError::new(l, c, message)
    }

    fn parse_value(&mut self) -> Result<(YamlValue, CstNode), YamlParseError> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => self.parse_flow_mapping(),
            Some(b'[') => self.parse_flow_sequence(),
            _ => self.parse_flow_scalar(),
        }
    }

    fn parse_flow_mapping(&mut self) -> Result<(YamlValue, CstNode), YamlParseError> {
        let start = self.pos;
        self.pos += 1; // '{'
        let mut data_entries = Vec::new();
        let mut cst_entries = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            let range = SourceRange::new(start, self.pos);
            return Ok((YamlValue::Mapping(data_entries), CstNode::Mapping { range, entries: cst_entries }));
        }
        loop {
            self.skip_ws();
            let key_start = self.pos;
            let key_raw = self.read_until(&[':']).ok_or_else(|| self.err("expected ':' in flow mapping entry"))?;
            let key = unquote_key(key_raw);
            let key_range = SourceRange::new(key_start, key_start + key_raw.trim_end().len());
            self.pos += 1; // ':'
            self.skip_ws();
            let (value, node) = self.parse_value()?;
            data_entries.push((key.clone(), value));
            cst_entries.push(CstMapEntry {
                key,
                key_range,
                value: node,
                leading_comment: None,
                trailing_comment: None,
            });
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    continue;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.err("expected ',' or '}' in flow mapping")),
            }
        }
        let range = SourceRange::new(start, self.pos);
        Ok((YamlValue::Mapping(data_entries), CstNode::Mapping { range, entries: cst_entries }))
    }

    fn parse_flow_sequence(&mut self) -> Result<(YamlValue, CstNode), YamlParseError> {
        let start = self.pos;
        self.pos += 1; // '['
        let mut data_items = Vec::new();
        let mut cst_items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            let range = SourceRange::new(start, self.pos);
            return Ok((YamlValue::Sequence(data_items), CstNode::Sequence { range, items: cst_items }));
        }
        loop {
            self.skip_ws();
            let (value, node) = self.parse_value()?;
            data_items.push(value);
            cst_items.push(CstSeqItem {
                value: node,
                leading_comment: None,
                trailing_comment: None,
            });
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    continue;
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.err("expected ',' or ']' in flow sequence")),
            }
        }
        let range = SourceRange::new(start, self.pos);
        Ok((YamlValue::Sequence(data_items), CstNode::Sequence { range, items: cst_items }))
    }

    fn parse_flow_scalar(&mut self) -> Result<(YamlValue, CstNode), YamlParseError> {
        let start = self.pos;
        if let Some(quote) = self.peek().filter(|b| *b == b'"' || *b == b'\'') {
            self.pos += 1;
            while let Some(b) = self.peek() {
                if b == quote {
                    self.pos += 1;
                    break;
                }
                if quote == b'"' && b == b'\\' {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
            }
            let raw = &self.text[start..self.pos];
            let range = SourceRange::new(start, self.pos);
            return Ok((parse_scalar_text(raw), CstNode::Scalar { range }));
        }
        let raw = self.read_until(&[',', ']', '}']).unwrap_or("");
        let trimmed = raw.trim_end();
        let value_start = start + (raw.len() - raw.trim_start().len());
        let range = SourceRange::new(value_start, start + trimmed.len());
        Ok((parse_scalar_text(trimmed), CstNode::Scalar { range }))
    }

    /// Reads up to (not including) the first unquoted occurrence of any byte
    /// in `stop`, advancing `pos` past the consumed text but not the stop byte.
    fn read_until(&mut self, stop: &[char]) -> Option<&'a str> {
        let start = self.pos;
        let bytes = self.bytes();
        let mut i = self.pos;
        let mut in_single = false;
        let mut in_double = false;
        while i < bytes.len() {
            let b = bytes[i];
            match b {
                b'\'' if !in_double => in_single = !in_single,
                b'"' if !in_single => in_double = !in_double,
                _ if !in_single && !in_double && stop.contains(&(b as char)) => break,
                _ => {}
            }
            i += 1;
        }
        if i == start && i >= bytes.len() {
            return None;
        }
        self.pos = i;
        Some(&self.text[start..i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_block_mapping() {
        let text = "meta:\n  graph-version: 1\nnodes:\n  start: {type: start, label: Begin}\n";
        let (value, _cst) = parse(text).expect("parse");
        assert_eq!(
            value.get_path("meta.graph-version").and_then(YamlValue::as_i64),
            Some(1)
        );
        assert_eq!(
            value.get_path("nodes.start.label").and_then(|v| v.as_str()),
            Some("Begin")
        );
    }

    #[test]
    fn parses_block_sequence_of_inline_mappings() {
        let text = "edges:\n  - from: a\n    to: b\n  - from: b\n    to: c\n";
        let (value, _cst) = parse(text).expect("parse");
        let edges = value.get("edges").and_then(YamlValue::as_sequence).expect("edges");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].get("to").and_then(|v| v.as_str()), Some("b"));
    }

    #[test]
    fn parses_flow_sequence_of_flow_mappings() {
        let text = "attributes: [{type: int, name: id, key: PK}, {type: string, name: email}]\n";
        let (value, _cst) = parse(text).expect("parse");
        let attrs = value.get("attributes").and_then(YamlValue::as_sequence).expect("attrs");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].get("name").and_then(|v| v.as_str()), Some("email"));
    }

    #[test]
    fn captures_leading_comment_on_mapping_entry() {
        let text = "nodes:\n  # keep me\n  start:\n    label: Begin\n";
        let (_value, cst) = parse(text).expect("parse");
        let nodes_entry = cst.find_entry("nodes").expect("nodes entry");
        let start_entry = nodes_entry.value.find_entry("start").expect("start entry");
        assert_eq!(start_entry.leading_comment.as_deref(), Some("keep me"));
    }

    #[test]
    fn rejects_tab_indentation() {
        let text = "nodes:\n\tstart: {}\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn ranges_slice_back_to_original_text() {
        let text = "nodes:\n  start: {label: Begin}\n";
        let (_value, cst) = parse(text).expect("parse");
        let nodes = cst.find_entry("nodes").expect("nodes");
        let start = nodes.value.find_entry("start").expect("start");
        let label = start.value.find_entry("label").expect("label");
        assert_eq!(label.value.range().slice(text), "Begin");
    }
}
