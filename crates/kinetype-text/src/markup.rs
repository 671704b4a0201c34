//! HTML fragment projection for scramble frames.
//!
//! Scramble frames only ever render plain text plus line breaks. This module
//! converts between an element's inner markup and that reduced form:
//!
//! - [`extract_text`] projects markup to text content, turning every `<br>`
//!   into `\n` and discarding all other tags.
//! - [`serialize_to_markup`] escapes text and turns `\n` back into `<br>`.
//!
//! Rich inline formatting (`<em>`, `<span class=..>`) does not survive the
//! projection; callers keep the original markup and restore it when a
//! session ends.
//!
//! # Tokenizer
//!
//! [`Tokenizer`] is deliberately lenient, the way a browser's fragment parser
//! is: a `<` that does not open a tag is literal text, an unterminated tag is
//! literal text, and comments are skipped.
//!
//! # Example
//! ```
//! use kinetype_text::markup::{extract_text, serialize_to_markup};
//!
//! let text = extract_text("Build <em>faster</em><br>ship &amp; sleep");
//! assert_eq!(text, "Build faster\nship & sleep");
//! assert_eq!(serialize_to_markup(&text), "Build faster<br>ship &amp; sleep");
//! ```

use std::borrow::Cow;

/// Longest named/numeric character reference we try to decode.
const MAX_ENTITY_LEN: usize = 32;

/// One lexical unit of an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Raw text, character references not yet decoded.
    Text(&'a str),
    /// Opening tag. `name` is ASCII-lowercased.
    StartTag { name: String, self_closing: bool },
    /// Closing tag. `name` is ASCII-lowercased.
    EndTag { name: String },
    /// Comment or other `<!...>` declaration body.
    Comment(&'a str),
}

impl Token<'_> {
    /// Whether this token renders as a line break.
    #[must_use]
    pub fn is_line_break(&self) -> bool {
        matches!(self, Token::StartTag { name, .. } if name == "br")
    }
}

/// Iterator over the [`Token`]s of an HTML fragment.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Try to lex a tag or comment at the current `<`.
    ///
    /// Returns the token and its byte length, or `None` when the `<` is literal.
    fn lex_markup(&self) -> Option<(Token<'a>, usize)> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        debug_assert_eq!(bytes.first(), Some(&b'<'));

        if let Some(body) = rest.strip_prefix("<!--") {
            return Some(match body.find("-->") {
                Some(end) => (Token::Comment(&body[..end]), 4 + end + 3),
                None => (Token::Comment(body), rest.len()),
            });
        }

        match bytes.get(1) {
            Some(b'!') | Some(b'?') => {
                let end = rest.find('>')?;
                Some((Token::Comment(&rest[2..end]), end + 1))
            }
            Some(b'/') => {
                if !bytes.get(2).is_some_and(u8::is_ascii_alphabetic) {
                    return None;
                }
                let end = find_tag_end(rest, 2)?;
                let name = tag_name(&rest[2..end]);
                Some((Token::EndTag { name }, end + 1))
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let end = find_tag_end(rest, 1)?;
                let inner = &rest[1..end];
                let name = tag_name(inner);
                let self_closing = inner.trim_end().ends_with('/');
                Some((Token::StartTag { name, self_closing }, end + 1))
            }
            _ => None,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with('<') {
            if let Some((token, len)) = self.lex_markup() {
                self.pos += len;
                return Some(token);
            }
            // Literal '<': emit it alone, then continue scanning text.
            self.pos += 1;
            return Some(Token::Text(&rest[..1]));
        }

        let len = rest.find('<').unwrap_or(rest.len());
        self.pos += len;
        Some(Token::Text(&rest[..len]))
    }
}

/// Find the byte index of the `>` closing a tag, skipping quoted attribute values.
fn find_tag_end(s: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (idx, b) in s.bytes().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(idx),
            (None, _) => {}
        }
    }
    None
}

fn tag_name(inner: &str) -> String {
    inner
        .split(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Project markup onto its text content, with `<br>` rendered as `\n`.
///
/// Character references are decoded. Whitespace is kept exactly as written.
#[must_use]
pub fn extract_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    for token in Tokenizer::new(markup) {
        match token {
            Token::Text(raw) => out.push_str(&decode_entities(raw)),
            ref t if t.is_line_break() => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Serialize plain text to markup: escape `&`, `<`, `>` and turn `\n` into `<br>`.
///
/// Single pass, so an escaped `&` is never escaped twice.
#[must_use]
pub fn serialize_to_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}

/// Decode HTML character references in a text run.
///
/// Handles the common named references and decimal/hex numeric references.
/// Anything unrecognized is left verbatim.
#[must_use]
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semi = tail
            .char_indices()
            .take(MAX_ENTITY_LEN)
            .find(|(_, c)| *c == ';')
            .map(|(idx, _)| idx);

        match semi.and_then(|end| decode_reference(&tail[1..end]).map(|c| (c, end))) {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let value = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        // Browsers map NUL and invalid scalars to U+FFFD.
        return Some(match value {
            0 => char::REPLACEMENT_CHARACTER,
            v => char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER),
        });
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Tokenizer
    // =========================================================================

    #[test]
    fn tokenizes_tags_and_text() {
        let tokens: Vec<_> = Tokenizer::new("a<B class=\"x>y\">b</b><br/>").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text("a"),
                Token::StartTag {
                    name: "b".into(),
                    self_closing: false
                },
                Token::Text("b"),
                Token::EndTag { name: "b".into() },
                Token::StartTag {
                    name: "br".into(),
                    self_closing: true
                },
            ]
        );
    }

    #[test]
    fn literal_angle_brackets_are_text() {
        let text: String = Tokenizer::new("1 < 2 <3 </ x")
            .map(|t| match t {
                Token::Text(s) => s.to_string(),
                other => panic!("unexpected token {other:?}"),
            })
            .collect();
        assert_eq!(text, "1 < 2 <3 </ x");
    }

    #[test]
    fn unterminated_tag_is_text() {
        assert_eq!(extract_text("before <span class='a'"), "before <span class='a'");
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(extract_text("a<!-- <br> -->b<!DOCTYPE html>c"), "abc");
        assert_eq!(extract_text("x<!-- never closed"), "x");
    }

    // =========================================================================
    // Extraction
    // =========================================================================

    #[test]
    fn br_variants_become_newlines() {
        assert_eq!(extract_text("A<br>B<br/>C<BR >D<br />E"), "A\nB\nC\nD\nE");
    }

    #[test]
    fn inline_markup_is_discarded() {
        assert_eq!(
            extract_text("<span class=\"hl\">Design</span> <em>that</em><br>moves"),
            "Design that\nmoves"
        );
    }

    #[test]
    fn whitespace_is_preserved() {
        assert_eq!(extract_text("  two  spaces\t<br>\n"), "  two  spaces\t\n\n");
    }

    #[test]
    fn entities_decode_like_text_content() {
        assert_eq!(extract_text("R&amp;D &lt;3 &quot;q&quot; &#39;s&#x27;"), "R&D <3 \"q\" 's'");
        assert_eq!(extract_text("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn unknown_entities_pass_through() {
        assert_eq!(decode_entities("&bogus; & alone &#xZZ;"), "&bogus; & alone &#xZZ;");
        assert_eq!(decode_entities("&#0;"), "\u{fffd}");
    }

    #[test]
    fn decode_borrows_when_no_ampersand() {
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn serialize_escapes_ampersand_first() {
        assert_eq!(serialize_to_markup("a&lt;b"), "a&amp;lt;b");
        assert_eq!(serialize_to_markup("<x> & y"), "&lt;x&gt; &amp; y");
    }

    #[test]
    fn serialize_converts_newlines() {
        assert_eq!(serialize_to_markup("HELLO\nWORLD"), "HELLO<br>WORLD");
        assert_eq!(serialize_to_markup("\n\n"), "<br><br>");
    }

    #[test]
    fn serialize_keeps_multibyte_glyphs() {
        assert_eq!(serialize_to_markup("アイ\n的"), "アイ<br>的");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Text made of letters, spaces, the escaped characters and newlines.
    fn arb_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just('a'),
                Just('Z'),
                Just(' '),
                Just('\n'),
                Just('&'),
                Just('<'),
                Just('>'),
                Just('ア'),
            ],
            0..64,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn serialize_then_extract_is_identity(text in arb_text()) {
            prop_assert_eq!(extract_text(&serialize_to_markup(&text)), text);
        }

        #[test]
        fn line_break_structure_survives_round_trip(
            lines in proptest::collection::vec("[a-z ]{0,8}", 1..6)
        ) {
            let markup = lines.join("<br>");
            let round = serialize_to_markup(&extract_text(&markup));
            prop_assert_eq!(round.matches("<br>").count(), lines.len() - 1);
            prop_assert_eq!(round, markup);
        }

        #[test]
        fn serialized_markup_has_no_raw_specials(text in arb_text()) {
            let markup = serialize_to_markup(&text);
            let without_br = markup.replace("<br>", "");
            prop_assert!(!without_br.contains('<'));
            prop_assert!(!without_br.contains('>'));
            prop_assert!(!markup.contains('\n'));
        }
    }
}
