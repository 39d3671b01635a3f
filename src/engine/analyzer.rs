//! Morphological analyzer seam.
//!
//! The engine never tokenizes on its own. It hands normalized batch text to
//! a [`MorphAnalyzer`] and histograms whatever tokens come back, so the
//! quality of keywords is entirely the analyzer's business.

use std::collections::HashSet;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::types::{AnalyzerError, KwError, KwResult};

/// A capability that turns text into noun-like tokens.
pub trait MorphAnalyzer {
    /// Stable identifier, mixed into cache fingerprints.
    fn id(&self) -> &str;

    /// Tokenize `text`, returning tokens in the order they occur.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError>;
}

impl<A: MorphAnalyzer + ?Sized> MorphAnalyzer for &A {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        (**self).tokenize(text)
    }
}

impl<A: MorphAnalyzer + ?Sized> MorphAnalyzer for Box<A> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        (**self).tokenize(text)
    }
}

/// Splits on whitespace. Case is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceAnalyzer;

impl MorphAnalyzer for WhitespaceAnalyzer {
    fn id(&self) -> &str {
        "whitespace"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

/// English stop words excluded by [`StopWordAnalyzer`].
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "shall", "can",
    "need", "must", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into",
    "about", "but", "not", "or", "and", "if", "it", "its", "this", "that", "which", "who", "what",
    "when", "where", "how", "all", "each", "both", "few", "more", "most", "other", "some", "such",
    "no", "than", "too", "very", "just", "also", "i", "my", "me", "we", "you", "they", "so",
];

/// Whitespace split minus common English stop words.
///
/// Stop words are matched case-insensitively but surviving tokens keep
/// their original case, since aggregation matches keywords case-sensitively
/// against raw content.
pub struct StopWordAnalyzer {
    stop_words: HashSet<&'static str>,
}

impl StopWordAnalyzer {
    /// Create an analyzer with the default stop word list.
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token.to_lowercase().as_str())
    }
}

impl Default for StopWordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphAnalyzer for StopWordAnalyzer {
    fn id(&self) -> &str {
        "stop-words-en"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        Ok(text
            .split_whitespace()
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect())
    }
}

/// Adapts a closure into an analyzer. Handy for stubs in tests.
pub struct FnAnalyzer<F> {
    id: String,
    f: F,
}

impl<F> FnAnalyzer<F>
where
    F: Fn(&str) -> Result<Vec<String>, AnalyzerError>,
{
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self { id: id.into(), f }
    }
}

impl<F> MorphAnalyzer for FnAnalyzer<F>
where
    F: Fn(&str) -> Result<Vec<String>, AnalyzerError>,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        (self.f)(text)
    }
}

/// Runs an external program once per batch.
///
/// The batch text is written to the child's stdin; every non-empty stdout
/// line is one token. A spawn failure or non-zero exit is an analyzer error.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    id: String,
    program: String,
    args: Vec<String>,
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let id = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: format!("cmd:{}", id),
            program,
            args,
        }
    }

    /// Split a shell-like command line on whitespace. No quoting support.
    ///
    /// A blank line names no program and fails with `InvalidAnalyzerCommand`.
    pub fn from_command_line(line: &str) -> KwResult<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| KwError::InvalidAnalyzerCommand {
                command: line.to_string(),
            })?;
        Ok(Self::new(program, parts.collect()))
    }
}

impl MorphAnalyzer for CommandAnalyzer {
    fn id(&self) -> &str {
        &self.id
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from a separate thread so a chatty child cannot
        // deadlock on a full stdout pipe.
        let mut stdin = child.stdin.take().ok_or("analyzer stdin unavailable")?;
        let input = text.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| "analyzer stdin writer panicked")?;

        if !output.status.success() {
            return Err(format!(
                "analyzer `{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )
            .into());
        }
        // A child may legitimately exit before reading all of its input.
        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
