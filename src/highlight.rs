//! Lexical token classification for syntax highlighting.
//!
//! [`Highlighter::tokenizer_for`] looks up a [`Tokenizer`] by language token
//! (an extension such as `rs`, or a file name such as `Makefile`). Languages
//! syntect doesn't know get the plain tokenizer, which yields one
//! default-category token per line. Scopes are collapsed into a handful of
//! [`TokenCategory`]s so the PDF can colour them without a theme.

use crate::error::RenderError;
use syntect::easy::ScopeRangeIterator;
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Keyword,
    String,
    Comment,
    Literal,
    Default,
}

/// A run of text within a single line
pub type Token = (String, TokenCategory);

/// Scope prefixes for each category, checked innermost scope first
struct ScopeClasses {
    rules: Vec<(Scope, TokenCategory)>,
}

impl ScopeClasses {
    fn new() -> Result<ScopeClasses, RenderError> {
        let table = [
            ("comment", TokenCategory::Comment),
            ("string", TokenCategory::String),
            ("constant.numeric", TokenCategory::Literal),
            ("constant.language", TokenCategory::Literal),
            ("constant.character", TokenCategory::Literal),
            ("keyword", TokenCategory::Keyword),
            ("storage", TokenCategory::Keyword),
        ];
        let rules = table
            .into_iter()
            .map(|(name, category)| {
                Scope::new(name)
                    .map(|scope| (scope, category))
                    .map_err(|e| RenderError::Highlighter(format!("bad scope `{name}`: {e:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScopeClasses { rules })
    }

    fn classify(&self, stack: &ScopeStack) -> TokenCategory {
        for scope in stack.as_slice().iter().rev() {
            for (prefix, category) in self.rules.iter() {
                if prefix.is_prefix_of(*scope) {
                    return *category;
                }
            }
        }
        TokenCategory::Default
    }
}

pub struct Highlighter {
    syntaxes: SyntaxSet,
    classes: ScopeClasses,
}

/// A tokenizing capability for one language
pub enum Tokenizer<'h> {
    Syntax {
        syntax: &'h SyntaxReference,
        highlighter: &'h Highlighter,
    },
    Plain,
}

impl Highlighter {
    pub fn new() -> Result<Highlighter, RenderError> {
        Ok(Highlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            classes: ScopeClasses::new()?,
        })
    }

    pub fn tokenizer_for(&self, language: &str) -> Tokenizer<'_> {
        match self.syntaxes.find_syntax_by_token(language) {
            Some(syntax) => Tokenizer::Syntax {
                syntax,
                highlighter: self,
            },
            None => {
                log::debug!("no syntax for `{language}`, rendering as plain text");
                Tokenizer::Plain
            }
        }
    }
}

impl Tokenizer<'_> {
    pub fn name(&self) -> &str {
        match self {
            Tokenizer::Syntax { syntax, .. } => syntax.name.as_str(),
            Tokenizer::Plain => "Plain Text",
        }
    }

    /// Split `text` into lines of classified tokens.
    ///
    /// Always produces the same number of lines as [`str::lines`]; if the
    /// syntax fails to parse, the whole text falls back to plain tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Vec<Token>> {
        match self {
            Tokenizer::Plain => plain(text),
            Tokenizer::Syntax {
                syntax,
                highlighter,
            } => match highlight(text, syntax, highlighter) {
                Ok(lines) => lines,
                Err(e) => {
                    log::warn!("failed to highlight {} source, using plain text: {e}", syntax.name);
                    plain(text)
                }
            },
        }
    }
}

fn plain(text: &str) -> Vec<Vec<Token>> {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                Vec::new()
            } else {
                vec![(line.to_string(), TokenCategory::Default)]
            }
        })
        .collect()
}

fn strip_newline(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

fn highlight(
    text: &str,
    syntax: &SyntaxReference,
    highlighter: &Highlighter,
) -> Result<Vec<Vec<Token>>, String> {
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut lines: Vec<Vec<Token>> = Vec::default();

    for line in LinesWithEndings::from(text) {
        let ops = state
            .parse_line(line, &highlighter.syntaxes)
            .map_err(|e| e.to_string())?;

        let mut tokens: Vec<Token> = Vec::default();
        for (range, op) in ScopeRangeIterator::new(&ops, line) {
            stack.apply(op).map_err(|e| format!("{e:?}"))?;
            let piece = strip_newline(&line[range]);
            if piece.is_empty() {
                continue;
            }
            let category = highlighter.classes.classify(&stack);
            // merge neighbours of the same colour
            match tokens.last_mut() {
                Some((last, last_category)) if *last_category == category => last.push_str(piece),
                _ => tokens.push((piece.to_string(), category)),
            }
        }
        lines.push(tokens);
    }

    Ok(lines)
}
