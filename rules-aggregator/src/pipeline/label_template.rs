/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Detection of label values that are evaluation-time templates.
//!
//! Values are scanned with the `{{ }}` delimiter rules of the rule engine's template
//! language: comments are dropped, trim markers (`{{- `, ` -}}`) eat adjacent
//! whitespace and empty text runs produce no node.

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";
const SPACE_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

#[derive(Debug, Eq, PartialEq)]
enum TemplateNode<'a> {
    Text(&'a str),
    Action(&'a str),
}

#[derive(Debug, Eq, PartialEq)]
enum TemplateError {
    UnclosedAction,
    UnclosedComment,
    CommentEndsBeforeDelimiter,
}

/// Returns `true` when `value` is a single static text node.
///
/// Empty values, values containing actions and values that fail to scan are not literal.
pub fn is_literal_label_value(value: &str) -> bool {
    match scan(value) {
        Ok(nodes) => matches!(nodes.as_slice(), [TemplateNode::Text(_)]),
        Err(_) => false,
    }
}

fn is_space(c: char) -> bool {
    SPACE_CHARS.contains(&c)
}

fn has_left_trim_marker(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('-') && chars.next().is_some_and(is_space)
}

/// Returns the length of a right delimiter at the start of `s` and whether it trims.
fn right_delim_at(s: &str) -> Option<(usize, bool)> {
    if s.starts_with(RIGHT_DELIM) {
        return Some((RIGHT_DELIM.len(), false));
    }
    let mut chars = s.chars();
    let first = chars.next()?;
    if is_space(first) && s[first.len_utf8()..].starts_with("-}}") {
        return Some((first.len_utf8() + 3, true));
    }
    None
}

fn scan(input: &str) -> Result<Vec<TemplateNode<'_>>, TemplateError> {
    let mut nodes = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let Some(offset) = input[pos..].find(LEFT_DELIM) else {
            nodes.push(TemplateNode::Text(&input[pos..]));
            break;
        };

        let delim_start = pos + offset;
        let mut after_delim = delim_start + LEFT_DELIM.len();
        let left_trim = has_left_trim_marker(&input[after_delim..]);

        let mut text = &input[pos..delim_start];
        if left_trim {
            text = text.trim_end_matches(SPACE_CHARS);
            after_delim += 2;
        }
        if !text.is_empty() {
            nodes.push(TemplateNode::Text(text));
        }

        let (end, right_trim) = if input[after_delim..].starts_with(LEFT_COMMENT) {
            scan_comment(input, after_delim)?
        } else {
            let (content_end, end, right_trim) = scan_action(input, after_delim)?;
            nodes.push(TemplateNode::Action(&input[after_delim..content_end]));
            (end, right_trim)
        };

        pos = end;
        if right_trim {
            let rest = &input[pos..];
            pos += rest.len() - rest.trim_start_matches(SPACE_CHARS).len();
        }
    }

    Ok(nodes)
}

fn scan_comment(input: &str, start: usize) -> Result<(usize, bool), TemplateError> {
    let body = start + LEFT_COMMENT.len();
    let close = input[body..]
        .find(RIGHT_COMMENT)
        .ok_or(TemplateError::UnclosedComment)?;
    let after_comment = body + close + RIGHT_COMMENT.len();

    let (len, trim) =
        right_delim_at(&input[after_comment..]).ok_or(TemplateError::CommentEndsBeforeDelimiter)?;
    Ok((after_comment + len, trim))
}

/// Scans to the closing delimiter, skipping over quoted strings inside the action.
fn scan_action(input: &str, start: usize) -> Result<(usize, usize, bool), TemplateError> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in input[start..].char_indices() {
        let at = start + offset;
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q != '`' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '`' | '\'' => quote = Some(c),
            _ => {
                if let Some((len, trim)) = right_delim_at(&input[at..]) {
                    return Ok((at, at + len, trim));
                }
            }
        }
    }

    Err(TemplateError::UnclosedAction)
}

#[cfg(test)]
mod tests {
    use super::{is_literal_label_value, scan, TemplateError, TemplateNode};

    #[test]
    fn plain_text_is_literal() {
        assert!(is_literal_label_value("critical"));
        assert!(is_literal_label_value("a } b { c"));
    }

    #[test]
    fn empty_value_is_not_literal() {
        assert!(!is_literal_label_value(""));
    }

    #[test]
    fn actions_are_not_literal() {
        assert!(!is_literal_label_value("{{ .Value }}"));
        assert!(!is_literal_label_value("instance {{ $labels.instance }} down"));
        assert!(!is_literal_label_value(r#"{{ "}}" }}"#));
    }

    #[test]
    fn scan_errors_are_not_literal() {
        assert_eq!(scan("value {{ .Value"), Err(TemplateError::UnclosedAction));
        assert_eq!(scan("{{/* open"), Err(TemplateError::UnclosedComment));
        assert_eq!(
            scan("{{/* c */ x}}"),
            Err(TemplateError::CommentEndsBeforeDelimiter)
        );
        assert!(!is_literal_label_value("value {{ .Value"));
    }

    #[test]
    fn comments_are_dropped() {
        assert!(is_literal_label_value("{{/* note */}}page"));
        assert!(!is_literal_label_value("a{{/* split */}}b"));
        assert!(!is_literal_label_value("{{/* only a comment */}}"));
    }

    #[test]
    fn trim_markers_consume_surrounding_whitespace() {
        assert_eq!(
            scan("a  {{- .X -}}  b").unwrap(),
            vec![
                TemplateNode::Text("a"),
                TemplateNode::Action(".X"),
                TemplateNode::Text("b"),
            ]
        );
        assert!(is_literal_label_value("  {{- /* c */ -}}  page"));
        assert!(!is_literal_label_value("x {{- /* c */ -}} y"));
    }
}
