use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Single-letter badge shown in the dashboard header.
    pub fn badge(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }

    fn next(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Other,
            Gender::Other => Gender::Male,
        }
    }
}

/// Profile collected at Auth, immutable for the rest of the session.
///
/// Only the phone number is required; the rest enriches the analysis
/// prompt when present. Serialized camelCase for the remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub phone_number: String,
}

impl UserProfile {
    /// First name for greetings, falling back to a generic label.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or("User")
    }

    /// Last four digits of the phone number, shown as the session ID.
    pub fn id_suffix(&self) -> &str {
        let digits_from_end = self
            .phone_number
            .char_indices()
            .rev()
            .take(4)
            .last()
            .map_or(self.phone_number.len(), |(idx, _)| idx);
        &self.phone_number[digits_from_end..]
    }
}

/// Single-line text editor for one form field.
#[derive(Debug, Default)]
pub struct FieldInput {
    text: String,
    cursor: usize,
}

impl FieldInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.text.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let before = self.text.chars().take(self.cursor - 1);
        let after = self.text.chars().skip(self.cursor);
        self.text = before.chain(after).collect();
        self.move_cursor_left();
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self
            .cursor
            .saturating_add(1)
            .min(self.text.chars().count());
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.text.len())
    }

    fn trimmed(&self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Which form field currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileField {
    #[default]
    Name,
    Age,
    Gender,
    Phone,
}

impl ProfileField {
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Age => "Age",
            ProfileField::Gender => "Gender",
            ProfileField::Phone => "Phone number",
        }
    }

    fn next(self) -> Self {
        match self {
            ProfileField::Name => ProfileField::Age,
            ProfileField::Age => ProfileField::Gender,
            ProfileField::Gender => ProfileField::Phone,
            ProfileField::Phone => ProfileField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            ProfileField::Name => ProfileField::Phone,
            ProfileField::Age => ProfileField::Name,
            ProfileField::Gender => ProfileField::Age,
            ProfileField::Phone => ProfileField::Gender,
        }
    }
}

/// In-progress state of the Auth screen.
///
/// Validation is presence-only: submission requires a phone number and
/// nothing else. Stricter format checks are deliberately not imposed.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub name: FieldInput,
    pub age: FieldInput,
    pub phone: FieldInput,
    pub gender: Option<Gender>,
    focus: ProfileField,
}

impl ProfileForm {
    pub fn focus(&self) -> ProfileField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Route a typed character to the focused field. The gender field is a
    /// selector, not a text field; any character cycles it. Age accepts
    /// digits only.
    pub fn enter_char(&mut self, ch: char) {
        match self.focus {
            ProfileField::Name => self.name.enter_char(ch),
            ProfileField::Age => {
                if ch.is_ascii_digit() {
                    self.age.enter_char(ch);
                }
            }
            ProfileField::Gender => self.cycle_gender(),
            ProfileField::Phone => {
                if ch.is_ascii_digit() || matches!(ch, '+' | '-' | ' ' | '(' | ')') {
                    self.phone.enter_char(ch);
                }
            }
        }
    }

    pub fn delete_char(&mut self) {
        match self.focus {
            ProfileField::Name => self.name.delete_char(),
            ProfileField::Age => self.age.delete_char(),
            ProfileField::Gender => self.gender = None,
            ProfileField::Phone => self.phone.delete_char(),
        }
    }

    pub fn cycle_gender(&mut self) {
        self.gender = Some(self.gender.map_or(Gender::Male, Gender::next));
    }

    pub fn is_complete(&self) -> bool {
        !self.phone.text().trim().is_empty()
    }

    /// Produce the session profile, or `None` while the required field is
    /// still empty.
    pub fn submit(&self) -> Option<UserProfile> {
        let phone_number = self.phone.trimmed()?;
        Some(UserProfile {
            name: self.name.trimmed(),
            age: self.age.trimmed(),
            gender: self.gender,
            phone_number,
        })
    }
}
