use focus_client::NewTask;

use super::state::{FormField, TextInput};
use crate::session::SessionError;

/// The new-task form on the main screen.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub name: TextInput,
    pub description: TextInput,
    pub duration: TextInput,
    pub focused: FormField,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            name: TextInput::new(),
            description: TextInput::new(),
            duration: TextInput::new(),
            focused: FormField::Name,
        }
    }
}

impl TaskForm {
    pub fn input(&self, field: FormField) -> &TextInput {
        match field {
            FormField::Name => &self.name,
            FormField::Description => &self.description,
            FormField::Duration => &self.duration,
        }
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInput {
        match self.focused {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::Duration => &mut self.duration,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn previous_field(&mut self) {
        self.focused = self.focused.previous();
    }

    /// Validate the form into a create request. The form is cleared on success
    /// and left untouched on failure.
    pub fn submit(&mut self) -> Result<NewTask, SessionError> {
        let name = self.name.value.trim();
        if name.is_empty() {
            return Err(SessionError::validation("Task name is required"));
        }
        let duration = match self.duration.value.trim().parse::<i64>() {
            Ok(minutes) if minutes > 0 => u32::try_from(minutes)
                .map_err(|_| SessionError::validation("Duration is too large"))?,
            _ => {
                return Err(SessionError::validation(
                    "Duration must be a whole number of minutes greater than zero",
                ))
            }
        };
        let description = Some(self.description.value.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let task = NewTask {
            name: name.to_string(),
            description,
            duration,
        };
        *self = Self::default();
        Ok(task)
    }
}
