/// Text typed into the entry field of a `text` screen.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextEntry {
    value: String,
}

impl TextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// Hand out the typed text and leave the field empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_deleting() {
        let mut e = TextEntry::new();
        for c in "Rinn".chars() {
            e.push(c);
        }
        e.backspace();
        e.push('\u{7}');
        assert_eq!(e.value(), "Rin");
        assert_eq!(e.take(), "Rin");
        assert_eq!(e.value(), "");
        e.backspace();
        assert_eq!(e.value(), "");
    }
}
