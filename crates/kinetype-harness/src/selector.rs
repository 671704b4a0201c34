//! A small CSS selector engine.
//!
//! Supported grammar:
//!
//! - selector lists separated by `,`
//! - descendant (` `) and child (`>`) combinators
//! - compound selectors made of an optional type (`a`, `*`) followed by any
//!   number of `.class`, `#id`, `[attr]` and `[attr=value]` / `[attr="value"]`
//!
//! Matching is delegated to a [`SelectorHost`] so the engine stays independent
//! of how elements are stored.

/// Errors that can occur while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Empty selector or empty list entry.
    Empty { position: usize },
    /// Unexpected character.
    Unexpected { ch: char, position: usize },
    /// `[` without a matching `]`.
    UnclosedAttribute { position: usize },
    /// Combinator with nothing on one side.
    DanglingCombinator { position: usize },
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { position } => write!(f, "empty selector at position {position}"),
            Self::Unexpected { ch, position } => {
                write!(f, "unexpected '{ch}' at position {position}")
            }
            Self::UnclosedAttribute { position } => {
                write!(f, "unclosed attribute selector opened at position {position}")
            }
            Self::DanglingCombinator { position } => {
                write!(f, "combinator without operand at position {position}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// Element access the matcher needs.
pub trait SelectorHost {
    type Handle: Copy;

    fn tag(&self, el: Self::Handle) -> &str;
    fn attr(&self, el: Self::Handle, name: &str) -> Option<&str>;
    fn parent(&self, el: Self::Handle) -> Option<Self::Handle>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrTest {
    Present(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// `None` for `*` or an omitted type.
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One complex selector, stored right-to-left: `parts[0]` is the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    /// `(combinator linking to the previous part, compound)`, walking leftwards.
    ancestors: Vec<(Combinator, Compound)>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut selectors = Vec::new();
        let mut offset = 0;
        for part in input.split(',') {
            selectors.push(parse_complex(part, offset)?);
            offset += part.len() + 1;
        }
        Ok(Self { selectors })
    }

    /// Whether `el` matches any selector in the list.
    pub fn matches<H: SelectorHost>(&self, host: &H, el: H::Handle) -> bool {
        self.selectors.iter().any(|sel| matches_complex(host, sel, el))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_complex(input: &str, offset: usize) -> Result<Complex, SelectorError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut idx = 0;
    let mut compounds: Vec<Compound> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut pending: Option<Combinator> = None;

    while idx < chars.len() {
        let (pos, c) = chars[idx];
        if c.is_whitespace() {
            if !compounds.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            idx += 1;
            continue;
        }
        if c == '>' {
            if compounds.is_empty() || pending == Some(Combinator::Child) {
                return Err(SelectorError::DanglingCombinator {
                    position: offset + pos,
                });
            }
            pending = Some(Combinator::Child);
            idx += 1;
            continue;
        }

        let (compound, next) = parse_compound(&chars, idx, offset)?;
        if let Some(comb) = pending.take() {
            combinators.push(comb);
        } else if !compounds.is_empty() {
            return Err(SelectorError::Unexpected {
                ch: c,
                position: offset + pos,
            });
        }
        compounds.push(compound);
        idx = next;
    }

    if pending == Some(Combinator::Child) {
        return Err(SelectorError::DanglingCombinator {
            position: offset + input.len(),
        });
    }
    let Some(subject) = compounds.pop() else {
        return Err(SelectorError::Empty { position: offset });
    };

    let ancestors = combinators
        .into_iter()
        .rev()
        .zip(compounds.into_iter().rev())
        .collect();
    Ok(Complex { subject, ancestors })
}

fn take_ident(chars: &[(usize, char)], mut idx: usize) -> (String, usize) {
    let mut out = String::new();
    while let Some(&(_, c)) = chars.get(idx) {
        if !is_ident_char(c) {
            break;
        }
        out.push(c);
        idx += 1;
    }
    (out, idx)
}

fn parse_compound(
    chars: &[(usize, char)],
    mut idx: usize,
    offset: usize,
) -> Result<(Compound, usize), SelectorError> {
    let mut compound = Compound::default();
    let start = idx;

    if let Some(&(_, '*')) = chars.get(idx) {
        idx += 1;
    } else {
        let (tag, next) = take_ident(chars, idx);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
            idx = next;
        }
    }

    while let Some(&(pos, c)) = chars.get(idx) {
        match c {
            '.' | '#' => {
                let (name, next) = take_ident(chars, idx + 1);
                if name.is_empty() {
                    return Err(SelectorError::Unexpected {
                        ch: c,
                        position: offset + pos,
                    });
                }
                if c == '.' {
                    compound.classes.push(name);
                } else {
                    compound.id = Some(name);
                }
                idx = next;
            }
            '[' => {
                let close = chars[idx..]
                    .iter()
                    .position(|&(_, ch)| ch == ']')
                    .map(|rel| idx + rel)
                    .ok_or(SelectorError::UnclosedAttribute {
                        position: offset + pos,
                    })?;
                let body: String = chars[idx + 1..close].iter().map(|&(_, ch)| ch).collect();
                compound.attrs.push(parse_attr(&body, offset + pos)?);
                idx = close + 1;
            }
            c if c.is_whitespace() || c == '>' => break,
            other => {
                return Err(SelectorError::Unexpected {
                    ch: other,
                    position: offset + pos,
                });
            }
        }
    }

    if idx == start {
        let (pos, ch) = chars[start];
        return Err(SelectorError::Unexpected {
            ch,
            position: offset + pos,
        });
    }
    Ok((compound, idx))
}

fn parse_attr(body: &str, position: usize) -> Result<AttrTest, SelectorError> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(SelectorError::Empty { position });
    }
    let name = name.to_ascii_lowercase();
    Ok(match value {
        None => AttrTest::Present(name),
        Some(raw) => {
            let unquoted = raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(raw);
            AttrTest::Equals(name, unquoted.to_string())
        }
    })
}

fn matches_compound<H: SelectorHost>(host: &H, compound: &Compound, el: H::Handle) -> bool {
    if let Some(tag) = &compound.tag
        && !host.tag(el).eq_ignore_ascii_case(tag)
    {
        return false;
    }
    if let Some(id) = &compound.id
        && host.attr(el, "id") != Some(id.as_str())
    {
        return false;
    }
    if !compound.classes.is_empty() {
        let class_attr = host.attr(el, "class").unwrap_or("");
        let has_all = compound
            .classes
            .iter()
            .all(|want| class_attr.split_ascii_whitespace().any(|c| c == want));
        if !has_all {
            return false;
        }
    }
    compound.attrs.iter().all(|test| match test {
        AttrTest::Present(name) => host.attr(el, name).is_some(),
        AttrTest::Equals(name, value) => host.attr(el, name) == Some(value.as_str()),
    })
}

fn matches_complex<H: SelectorHost>(host: &H, sel: &Complex, el: H::Handle) -> bool {
    if !matches_compound(host, &sel.subject, el) {
        return false;
    }
    matches_ancestors(host, &sel.ancestors, el)
}

/// Match the remaining ancestor chain starting from `el`'s parent.
///
/// Descendant combinators backtrack over every ancestor candidate.
fn matches_ancestors<H: SelectorHost>(
    host: &H,
    chain: &[(Combinator, Compound)],
    el: H::Handle,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let mut cursor = host.parent(el);
    while let Some(candidate) = cursor {
        if matches_compound(host, compound, candidate) && matches_ancestors(host, rest, candidate) {
            return true;
        }
        if *combinator == Combinator::Child {
            return false;
        }
        cursor = host.parent(candidate);
    }
    false
}
