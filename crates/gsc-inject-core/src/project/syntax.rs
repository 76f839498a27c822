//! Syntax checking contract and the built-in structural checker.

/// A single problem found in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Checks one source text in isolation.
///
/// Diagnostics are returned in source order; an empty list means the text is clean.
pub trait SyntaxChecker {
    fn check(&self, source: &str) -> Vec<Diagnostic>;
}

/// Structural checker for GSC sources.
///
/// Verifies that `()`, `[]`, `{}` and developer blocks (`/# ... #/`) are
/// balanced, and that string literals and block comments are terminated.
/// Delimiters inside strings and comments are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralChecker;

#[derive(Clone, Copy)]
enum State {
    Code,
    LineComment,
    BlockComment { start: usize },
    String { start: usize },
}

/// Opening token tracked on the delimiter stack
#[derive(Clone, Copy)]
struct Open {
    token: &'static str,
    close: &'static str,
    line: usize,
}

impl StructuralChecker {
    fn open(c: char, line: usize) -> Option<Open> {
        let (token, close) = match c {
            '(' => ("(", ")"),
            '[' => ("[", "]"),
            '{' => ("{", "}"),
            _ => return None,
        };
        Some(Open { token, close, line })
    }

    fn close_token(c: char) -> Option<&'static str> {
        match c {
            ')' => Some(")"),
            ']' => Some("]"),
            '}' => Some("}"),
            _ => None,
        }
    }

    fn on_close(stack: &mut Vec<Open>, close: &str, line: usize, out: &mut Vec<Diagnostic>) {
        match stack.pop() {
            Some(open) if open.close == close => {}
            Some(open) => out.push(Diagnostic::new(
                line,
                format!(
                    "mismatched '{}', expected '{}' to close '{}' from line {}",
                    close, open.close, open.token, open.line
                ),
            )),
            None => out.push(Diagnostic::new(line, format!("unexpected '{}'", close))),
        }
    }
}

impl SyntaxChecker for StructuralChecker {
    fn check(&self, source: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut state = State::Code;
        let mut line = 1;
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\n' {
                line += 1;
            }

            match state {
                State::Code => match c {
                    '/' => match chars.peek() {
                        Some('/') => {
                            chars.next();
                            state = State::LineComment;
                        }
                        Some('*') => {
                            chars.next();
                            state = State::BlockComment { start: line };
                        }
                        Some('#') => {
                            chars.next();
                            stack.push(Open {
                                token: "/#",
                                close: "#/",
                                line,
                            });
                        }
                        _ => {}
                    },
                    '#' if chars.peek() == Some(&'/') => {
                        chars.next();
                        Self::on_close(&mut stack, "#/", line, &mut diagnostics);
                    }
                    '"' => state = State::String { start: line },
                    _ => {
                        if let Some(open) = Self::open(c, line) {
                            stack.push(open);
                        } else if let Some(close) = Self::close_token(c) {
                            Self::on_close(&mut stack, close, line, &mut diagnostics);
                        }
                    }
                },
                State::LineComment => {
                    if c == '\n' {
                        state = State::Code;
                    }
                }
                State::BlockComment { .. } => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        state = State::Code;
                    }
                }
                State::String { .. } => match c {
                    '\\' => {
                        if chars.next() == Some('\n') {
                            line += 1;
                        }
                    }
                    '"' => state = State::Code,
                    _ => {}
                },
            }
        }

        match state {
            State::String { start } => {
                diagnostics.push(Diagnostic::new(start, "unterminated string literal"))
            }
            State::BlockComment { start } => {
                diagnostics.push(Diagnostic::new(start, "unterminated block comment"))
            }
            State::Code | State::LineComment => {}
        }

        for open in stack {
            diagnostics.push(Diagnostic::new(
                open.line,
                format!("'{}' is never closed", open.token),
            ));
        }

        diagnostics
    }
}
