//! Modal prompts
//!
//! The host shows the dialog; the editor only sees the answer. `None` means
//! the user cancelled, `Some("")` means they confirmed an empty field.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    /// Prefilled field value
    pub initial: Option<String>,
    /// Mask the input
    pub secret: bool,
}

impl PromptRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            initial: None,
            secret: false,
        }
    }

    pub fn password(message: impl Into<String>) -> Self {
        Self {
            secret: true,
            ..Self::text(message)
        }
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }
}

pub trait Prompter {
    fn prompt(&mut self, request: &PromptRequest) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn prompt(&mut self, request: &PromptRequest) -> Option<String> {
        (**self).prompt(request)
    }

    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Answers from prepared queues
///
/// An exhausted queue cancels prompts and declines confirmations.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    asked: Vec<PromptRequest>,
    confirms_asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&mut self, text: impl Into<String>) -> &mut Self {
        self.answers.push_back(Some(text.into()));
        self
    }

    pub fn cancel(&mut self) -> &mut Self {
        self.answers.push_back(None);
        self
    }

    pub fn confirm_next(&mut self, yes: bool) -> &mut Self {
        self.confirmations.push_back(yes);
        self
    }

    /// Prompts shown so far
    pub fn asked(&self) -> &[PromptRequest] {
        &self.asked
    }

    pub fn confirmations_asked(&self) -> &[String] {
        &self.confirms_asked
    }

    pub fn pending(&self) -> usize {
        self.answers.len() + self.confirmations.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, request: &PromptRequest) -> Option<String> {
        self.asked.push(request.clone());
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms_asked.push(message.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let mut prompter = ScriptedPrompter::new();
        prompter.answer("one").cancel().answer("");

        let request = PromptRequest::text("Name?");
        assert_eq!(prompter.prompt(&request), Some("one".to_string()));
        assert_eq!(prompter.prompt(&request), None);
        assert_eq!(prompter.prompt(&request), Some(String::new()));
        assert_eq!(prompter.prompt(&request), None);
        assert_eq!(prompter.asked().len(), 4);
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        let mut prompter = ScriptedPrompter::new();
        prompter.confirm_next(true);
        assert!(prompter.confirm("Delete?"));
        assert!(!prompter.confirm("Delete?"));
        assert_eq!(prompter.confirmations_asked(), ["Delete?", "Delete?"]);
    }

    #[test]
    fn test_request_builders() {
        let request = PromptRequest::password("Password");
        assert!(request.secret);
        let request = PromptRequest::text("Edit").with_initial("old");
        assert_eq!(request.initial.as_deref(), Some("old"));
        assert!(!request.secret);
    }
}
