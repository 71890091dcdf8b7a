use crate::error::{Error, Result};
use std::{borrow::Cow, fmt, str::FromStr};

/// Line-ending policy applied to content written into the repository.
///
/// Local files always receive repository bytes verbatim, so the policy only
/// matters in the repo direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LineEnding {
    /// Leave content untouched.
    #[default]
    None,
    /// Normalize every line terminator to `\n`.
    Lf,
    /// Normalize every line terminator to `\r\n`.
    Crlf,
}

impl LineEnding {
    pub const ALL: [LineEnding; 3] = [LineEnding::None, LineEnding::Lf, LineEnding::Crlf];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::None => "none",
            LineEnding::Lf => "lf",
            LineEnding::Crlf => "crlf",
        }
    }

    fn terminator(&self) -> Option<&'static [u8]> {
        match self {
            LineEnding::None => None,
            LineEnding::Lf => Some(b"\n"),
            LineEnding::Crlf => Some(b"\r\n"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        LineEnding::ALL
            .into_iter()
            .find(|ending| ending.as_str() == value)
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown line ending '{value}', expected one of: none, lf, crlf"
                ))
            })
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite the line terminators of `content` according to `policy`.
///
/// A terminator is a `\n` together with any run of `\r` bytes directly in
/// front of it; each one is replaced by the policy's terminator. Carriage
/// returns that never reach a `\n` are kept as they are. The transform works
/// on raw bytes and never decodes text.
pub fn normalize(content: &[u8], policy: LineEnding) -> Cow<'_, [u8]> {
    let Some(terminator) = policy.terminator() else {
        return Cow::Borrowed(content);
    };

    let mut normalized = Vec::with_capacity(content.len() + content.len() / 16);
    let mut pending_cr = 0usize;

    for &byte in content {
        match byte {
            b'\r' => pending_cr += 1,
            b'\n' => {
                pending_cr = 0;
                normalized.extend_from_slice(terminator);
            }
            _ => {
                normalized.resize(normalized.len() + pending_cr, b'\r');
                pending_cr = 0;
                normalized.push(byte);
            }
        }
    }
    normalized.resize(normalized.len() + pending_cr, b'\r');

    if normalized == content {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(normalized)
    }
}
