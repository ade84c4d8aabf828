use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Source location of a raise or guard, with its condition or message text.
///
/// Sites are created by the raising macros with [`file!`], [`line!`] and
/// either [`stringify!`] of the guarded condition or the message literal.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Site {
  file: &'static str,
  line: u32,
  text: &'static str,
}

impl Site {
  /// Creates a new `Site`.
  #[inline]
  pub const fn new(file: &'static str, line: u32, text: &'static str) -> Self {
    Self { file, line, text }
  }

  /// Returns the source file.
  #[inline]
  pub const fn file(&self) -> &'static str {
    self.file
  }

  /// Returns the source line.
  #[inline]
  pub const fn line(&self) -> u32 {
    self.line
  }

  /// Returns the condition or message text.
  #[inline]
  pub const fn text(&self) -> &'static str {
    self.text
  }
}

impl Display for Site {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}:{}: {}", self.file, self.line, self.text)
  }
}
