use crate::error::Result;

/// A free-text question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub prompt: String,
    pub placeholder: String,
    pub default: String,
}

/// One entry of a multiple-choice picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceItem {
    pub label: String,
    pub description: String,
    /// Selecting this item hands back whatever text the user typed.
    pub accepts_text: bool,
}

impl ChoiceItem {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            accepts_text: false,
        }
    }

    pub fn with_text_entry(mut self) -> Self {
        self.accepts_text = true;
        self
    }
}

/// The item the user accepted, by position, plus any typed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePick {
    pub index: usize,
    pub text: String,
}

impl ChoicePick {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Asks the user things. Every call may block until the user answers;
/// `Ok(None)` means the prompt was dismissed.
pub trait PromptService {
    fn ask_text(&self, request: &TextPrompt) -> Result<Option<String>>;

    fn ask_choice(&self, items: &[ChoiceItem]) -> Result<Option<ChoicePick>>;
}

impl<P: PromptService + ?Sized> PromptService for &P {
    fn ask_text(&self, request: &TextPrompt) -> Result<Option<String>> {
        (**self).ask_text(request)
    }

    fn ask_choice(&self, items: &[ChoiceItem]) -> Result<Option<ChoicePick>> {
        (**self).ask_choice(items)
    }
}
