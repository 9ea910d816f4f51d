//! Commit-header detection strategies.

/// How commit header lines are told apart from message body lines.
///
/// Two rules exist in the wild. Older logs named revisions numerically
/// (`0.86-0.1`), so a header was any line whose first character is a digit.
/// Newer logs also use symbolic revisions (`tip-1`), so a header is any
/// non-empty line that is not whitespace-indented. The rules are genuinely
/// different: under [`HeaderStyle::DigitPrefixed`] a message body line that
/// happens to start with a digit is indistinguishable from a header and will
/// terminate the message early. That ambiguity is inherent to the log format
/// and is not papered over here; the style is picked per run instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    /// A header line starts with an ASCII digit.
    DigitPrefixed,

    /// A header line starts with any non-whitespace character.
    #[default]
    AnyNonWhitespace,
}

impl HeaderStyle {
    /// Returns true if `line` is a commit header under this style.
    #[must_use]
    pub fn is_header(self, line: &str) -> bool {
        match self {
            Self::DigitPrefixed => line.chars().next().is_some_and(|c| c.is_ascii_digit()),
            Self::AnyNonWhitespace => line.chars().next().is_some_and(|c| !c.is_whitespace()),
        }
    }
}
