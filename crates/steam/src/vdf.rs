//! Text VDF (Valve KeyValues) parser.
//!
//! Covers what Steam writes to `localconfig.vdf` and friends: quoted or bare
//! tokens, backslash escapes, nested `{}` objects, `//` comments. Platform
//! conditionals like `[$WIN32]` are skipped.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::SteamError;

/// A value in a KeyValues document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VdfValue {
    String(String),
    Object(VdfObject),
}

impl VdfValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VdfValue::String(s) => Some(s),
            VdfValue::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&VdfObject> {
        match self {
            VdfValue::Object(obj) => Some(obj),
            VdfValue::String(_) => None,
        }
    }
}

/// An ordered list of key/value pairs. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VdfObject {
    entries: Vec<(String, VdfValue)>,
}

impl VdfObject {
    /// Returns entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &VdfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup. When a key repeats, the last one wins.
    pub fn get(&self, key: &str) -> Option<&VdfValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Follows `path` through nested objects, case-insensitively.
    pub fn get_path(&self, path: &[&str]) -> Option<&VdfValue> {
        let (last, parents) = path.split_last()?;
        let mut obj = self;
        for key in parents {
            obj = obj.get(key)?.as_object()?;
        }
        obj.get(last)
    }

    /// Like [`get_path`](Self::get_path), for string leaves.
    pub fn get_str_path(&self, path: &[&str]) -> Option<&str> {
        self.get_path(path)?.as_str()
    }
}

/// Parses a text VDF document into its root object.
pub fn parse_text_vdf(text: &str) -> Result<VdfObject, SteamError> {
    let mut lexer = Lexer::new(text);
    parse_object(&mut lexer, true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Str(String),
}

struct Lexer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, SteamError> {
        loop {
            let Some(&(pos, c)) = self.chars.peek() else {
                return Ok(None);
            };

            match c {
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '/' if self.text[pos..].starts_with("//") => self.skip_line(),
                '[' => self.skip_conditional(pos)?,
                '{' => {
                    self.chars.next();
                    return Ok(Some(Token::Open));
                }
                '}' => {
                    self.chars.next();
                    return Ok(Some(Token::Close));
                }
                '"' => {
                    self.chars.next();
                    return self.quoted(pos).map(|s| Some(Token::Str(s)));
                }
                _ => return Ok(Some(Token::Str(self.bare()))),
            }
        }
    }

    fn skip_line(&mut self) {
        for (_, c) in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_conditional(&mut self, start: usize) -> Result<(), SteamError> {
        for (_, c) in self.chars.by_ref() {
            if c == ']' {
                return Ok(());
            }
        }
        Err(SteamError::Vdf(format!(
            "unterminated conditional starting at {start}"
        )))
    }

    fn quoted(&mut self, start: usize) -> Result<String, SteamError> {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(out),
                '\\' => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, '\\')) => out.push('\\'),
                    Some((_, '"')) => out.push('"'),
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                _ => out.push(c),
            }
        }
        Err(SteamError::Vdf(format!(
            "unterminated string starting at {start}"
        )))
    }

    fn bare(&mut self) -> String {
        let mut out = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '{' | '}' | '"') {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }
}

fn parse_object(lexer: &mut Lexer<'_>, root: bool) -> Result<VdfObject, SteamError> {
    let mut obj = VdfObject::default();

    loop {
        let key = match lexer.next_token()? {
            Some(Token::Str(key)) => key,
            Some(Token::Close) if !root => return Ok(obj),
            Some(Token::Close) => return Err(SteamError::Vdf("unexpected '}' at top level".into())),
            Some(Token::Open) => {
                return Err(SteamError::Vdf("expected key, found '{'".into()));
            }
            None if root => return Ok(obj),
            None => return Err(SteamError::Vdf("unexpected end of data in object".into())),
        };

        let value = match lexer.next_token()? {
            Some(Token::Str(value)) => VdfValue::String(value),
            Some(Token::Open) => VdfValue::Object(parse_object(lexer, false)?),
            Some(Token::Close) | None => {
                return Err(SteamError::Vdf(format!("missing value for key '{key}'")));
            }
        };

        obj.entries.push((key, value));
    }
}
