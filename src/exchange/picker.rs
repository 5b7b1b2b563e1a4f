//! Document pickers - where an imported snapshot comes from

use std::path::PathBuf;

/// Lets the user choose a snapshot file.
///
/// `Ok(None)` means the user declined to pick anything. That is a valid
/// outcome, not an error.
pub trait DocumentPicker {
    fn pick(&self) -> std::io::Result<Option<PathBuf>>;
}

/// A picker whose answer was decided up front (command-line flag, request body)
#[derive(Debug, Clone, Default)]
pub struct PresetPicker {
    choice: Option<PathBuf>,
}

impl PresetPicker {
    pub fn new(choice: Option<PathBuf>) -> Self {
        Self { choice }
    }

    pub fn cancelled() -> Self {
        Self::default()
    }
}

impl DocumentPicker for PresetPicker {
    fn pick(&self) -> std::io::Result<Option<PathBuf>> {
        Ok(self.choice.clone())
    }
}

/// Asks for a path on the terminal; an empty answer cancels
pub struct PromptPicker {
    term: console::Term,
}

impl PromptPicker {
    pub fn new() -> Self {
        Self {
            term: console::Term::stderr(),
        }
    }
}

impl Default for PromptPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentPicker for PromptPicker {
    fn pick(&self) -> std::io::Result<Option<PathBuf>> {
        self.term
            .write_str("Snapshot file to import (leave empty to cancel): ")?;
        let answer = self.term.read_line()?;
        Ok(parse_answer(&answer))
    }
}

fn parse_answer(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_cancels() {
        assert_eq!(parse_answer("   \n"), None);
        assert_eq!(parse_answer(" backup.db\n"), Some(PathBuf::from("backup.db")));
    }

    #[test]
    fn test_preset_picker() {
        assert_eq!(PresetPicker::cancelled().pick().unwrap(), None);
        let picker = PresetPicker::new(Some(PathBuf::from("a.db")));
        assert_eq!(picker.pick().unwrap(), Some(PathBuf::from("a.db")));
    }
}
