//! Submitted command lines and the up/down recall cursor.

/// Append-only list of submitted lines plus a recall position.
///
/// `cursor` is `None` while the user is not browsing history. Moving back
/// from `None` starts at the newest entry and stops at the oldest; moving
/// forward past the newest returns to `None`.
#[derive(Clone, Debug, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line and reset the recall position.
    ///
    /// Every line is kept, including blank ones and repeats.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.cursor = None;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entries submitted before the newest one.
    pub fn before_last(&self) -> &[String] {
        &self.entries[..self.entries.len().saturating_sub(1)]
    }

    pub fn older(&mut self) -> Option<String> {
        self.navigate(-1)
    }

    pub fn newer(&mut self) -> Option<String> {
        self.navigate(1)
    }

    fn navigate(&mut self, direction: i32) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        let new_index = match self.cursor {
            None if direction < 0 => Some(last),
            Some(i) if direction < 0 => Some(i.saturating_sub(1)),
            Some(i) if direction > 0 && i < last => Some(i + 1),
            Some(_) if direction > 0 => None,
            current => current,
        };

        self.cursor = new_index;
        new_index.map(|i| self.entries[i].clone())
    }
}
