//! Text forms for the login and signup screens

use crossterm::event::KeyCode;

use crate::auth::{Credentials, SignupForm};
use crate::error::ValidationError;

pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl Field {
    fn new(label: &'static str, secret: bool) -> Self {
        Self {
            label,
            value: String::new(),
            secret,
        }
    }

    /// Value as shown on screen
    pub fn display(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// What a key press did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<ValidationError>,
}

impl Form {
    pub fn login() -> Self {
        Self::with_fields(vec![Field::new("Username", false), Field::new("Password", true)])
    }

    pub fn signup() -> Self {
        Self::with_fields(vec![
            Field::new("Email", false),
            Field::new("Username", false),
            Field::new("Password", true),
            Field::new("Confirm Password", true),
        ])
    }

    fn with_fields(fields: Vec<Field>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormAction {
        match code {
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len()
            }
            KeyCode::Backspace => {
                self.fields[self.focus].value.pop();
            }
            KeyCode::Char(c) => self.fields[self.focus].value.push(c),
            _ => {}
        }
        FormAction::None
    }

    fn value(&self, i: usize) -> String {
        self.fields.get(i).map(|f| f.value.clone()).unwrap_or_default()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.value(0), self.value(1))
    }

    pub fn signup_form(&self) -> SignupForm {
        SignupForm {
            email: self.value(0),
            username: self.value(1),
            password: self.value(2),
            confirm_password: self.value(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut form = Form::login();
        type_text(&mut form, "test");
        form.handle_key(KeyCode::Tab);
        type_text(&mut form, "12345");
        form.handle_key(KeyCode::Backspace);

        assert_eq!(form.credentials(), Credentials::new("test", "1234"));
        assert_eq!(form.fields[1].display(), "****");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = Form::signup();
        form.handle_key(KeyCode::BackTab);
        assert_eq!(form.focus, 3);
        form.handle_key(KeyCode::Tab);
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_enter_submits() {
        let mut form = Form::login();
        assert_eq!(form.handle_key(KeyCode::Enter), FormAction::Submit);
        assert_eq!(form.handle_key(KeyCode::Esc), FormAction::Cancel);
    }
}
