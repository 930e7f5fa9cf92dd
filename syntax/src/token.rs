use yap::{IntoTokens, Tokens, types::StrTokens};

use crate::TokenKind;

/// A single lexeme, before it is placed into the node tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Comment { text: String, multiline: bool },
    And,
    Or,
    Not,
    Group,
    GroupEnd,
    Block { name: String, params: Vec<String> },
    BlockEnd,
    Return,
    Import(String),
    Assignment(Vec<String>),
    Identifier(String),
    Bool(bool),
}

impl Token {
    pub(crate) fn kind(&self) -> TokenKind {
        match self {
            Token::Comment { multiline: true, .. } => TokenKind::MultiComment,
            Token::Comment { multiline: false, .. } => TokenKind::SingleComment,
            Token::And => TokenKind::And,
            Token::Or => TokenKind::Or,
            Token::Not => TokenKind::Not,
            Token::Group => TokenKind::Group,
            Token::GroupEnd => TokenKind::GroupEnd,
            Token::Block { .. } => TokenKind::Block,
            Token::BlockEnd => TokenKind::BlockEnd,
            Token::Return => TokenKind::Return,
            Token::Import(_) => TokenKind::Import,
            Token::Assignment(_) => TokenKind::Assignment,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Bool(_) => TokenKind::Bool,
        }
    }
}

type Scanner = fn(&mut StrTokens<'_>) -> Option<Token>;

/// Token definitions in match priority order. Keywords come before identifiers.
const TOKENS: [(TokenKind, Scanner); 14] = [
    (TokenKind::MultiComment, multi_comment),
    (TokenKind::SingleComment, single_comment),
    (TokenKind::And, and),
    (TokenKind::Or, or),
    (TokenKind::Not, not),
    (TokenKind::Group, group),
    (TokenKind::GroupEnd, group_end),
    (TokenKind::Block, block),
    (TokenKind::BlockEnd, block_end),
    (TokenKind::Return, block_return),
    (TokenKind::Import, import),
    (TokenKind::Assignment, assignment),
    (TokenKind::Identifier, bare_identifier),
    (TokenKind::Bool, boolean),
];

/// Matches the first token definition at the start of `input`, returning the token and its length in bytes.
pub(crate) fn scan(input: &str) -> Option<(Token, usize)> {
    for (kind, scanner) in TOKENS {
        let mut tokens = input.into_tokens();
        if let Some(token) = scanner(&mut tokens) {
            debug_assert_eq!(token.kind(), kind);
            return Some((token, tokens.offset()));
        }
    }
    None
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn literal(t: &mut StrTokens<'_>, text: &str) -> bool {
    text.chars().all(|c| t.next() == Some(c))
}

fn keyword(t: &mut StrTokens<'_>, word: &str) -> bool {
    literal(t, word) && !t.peek().is_some_and(is_ident_char)
}

/// Consumes characters while `pred` holds, returning how many were consumed.
fn skip(t: &mut StrTokens<'_>, pred: impl Fn(char) -> bool) -> usize {
    let mut count = 0;
    while t.peek().is_some_and(&pred) {
        t.next();
        count += 1;
    }
    count
}

fn take(t: &mut StrTokens<'_>, pred: impl Fn(char) -> bool, into: &mut String) {
    while let Some(c) = t.peek().filter(|&c| pred(c)) {
        into.push(c);
        t.next();
    }
}

fn identifier(t: &mut StrTokens<'_>) -> Option<String> {
    let first = t.next().filter(|&c| is_ident_start(c))?;
    let mut name = String::from(first);
    take(t, is_ident_char, &mut name);
    Some(name)
}

/// Drops a single whitespace character from each end.
fn trim_once(text: &str) -> String {
    let text = text.strip_prefix(char::is_whitespace).unwrap_or(text);
    let text = text.strip_suffix(char::is_whitespace).unwrap_or(text);
    text.to_owned()
}

fn and(t: &mut StrTokens<'_>) -> Option<Token> {
    keyword(t, "and").then_some(Token::And)
}

fn or(t: &mut StrTokens<'_>) -> Option<Token> {
    keyword(t, "or").then_some(Token::Or)
}

fn not(t: &mut StrTokens<'_>) -> Option<Token> {
    keyword(t, "not").then_some(Token::Not)
}

fn group(t: &mut StrTokens<'_>) -> Option<Token> {
    literal(t, "(").then_some(Token::Group)
}

fn group_end(t: &mut StrTokens<'_>) -> Option<Token> {
    literal(t, ")").then_some(Token::GroupEnd)
}

fn block_end(t: &mut StrTokens<'_>) -> Option<Token> {
    literal(t, "}").then_some(Token::BlockEnd)
}

fn block_return(t: &mut StrTokens<'_>) -> Option<Token> {
    keyword(t, "return").then_some(Token::Return)
}

fn bare_identifier(t: &mut StrTokens<'_>) -> Option<Token> {
    identifier(t).map(Token::Identifier)
}

fn multi_comment(t: &mut StrTokens<'_>) -> Option<Token> {
    if !literal(t, "/*") {
        return None;
    }
    let mut text = String::new();
    while let Some(c) = t.next() {
        text.push(c);
        if text.ends_with("*/") {
            text.truncate(text.len() - 2);
            return Some(Token::Comment { text: trim_once(&text), multiline: true });
        }
    }
    None
}

fn single_comment(t: &mut StrTokens<'_>) -> Option<Token> {
    if !literal(t, "//") {
        return None;
    }
    let mut text = String::new();
    take(t, |c| c != '\n', &mut text);
    Some(Token::Comment { text: trim_once(&text), multiline: false })
}

/// `block NAME(PARAM PARAM[N] ...) {`
fn block(t: &mut StrTokens<'_>) -> Option<Token> {
    if !literal(t, "block") {
        return None;
    }
    skip(t, char::is_whitespace);
    let name = identifier(t)?;
    skip(t, char::is_whitespace);
    if !literal(t, "(") {
        return None;
    }
    let mut params = Vec::new();
    loop {
        skip(t, char::is_whitespace);
        if t.peek() == Some(')') {
            t.next();
            break;
        }
        let param = identifier(t)?;
        if t.peek() == Some('[') {
            t.next();
            let mut digits = String::new();
            take(t, |c| c.is_ascii_digit(), &mut digits);
            let width: usize = digits.parse().ok()?;
            if !literal(t, "]") {
                return None;
            }
            params.extend((0..width).map(|index| format!("{param}{index}")));
        } else {
            params.push(param);
        }
    }
    skip(t, char::is_whitespace);
    literal(t, "{").then_some(Token::Block { name, params })
}

/// `import NAME`, taking the rest of the line as the path.
fn import(t: &mut StrTokens<'_>) -> Option<Token> {
    if !literal(t, "import") || skip(t, char::is_whitespace) == 0 {
        return None;
    }
    let mut path = String::new();
    take(t, |c| c != '\n', &mut path);
    let path = path.trim_end();
    (!path.is_empty()).then(|| Token::Import(path.to_owned()))
}

/// `let NAME NAME ... =`
fn assignment(t: &mut StrTokens<'_>) -> Option<Token> {
    let is_space = |c: char| c == ' ';
    if !literal(t, "let") || skip(t, is_space) == 0 {
        return None;
    }
    let mut names = vec![identifier(t)?];
    loop {
        let spaces = skip(t, is_space);
        match t.peek() {
            Some(c) if spaces > 0 && is_ident_start(c) => names.push(identifier(t)?),
            _ => break,
        }
    }
    if !literal(t, "=") {
        return None;
    }
    skip(t, is_space);
    Some(Token::Assignment(names))
}

fn boolean(t: &mut StrTokens<'_>) -> Option<Token> {
    match t.next()? {
        '1' => Some(Token::Bool(true)),
        '0' => Some(Token::Bool(false)),
        _ => None,
    }
}
