//! Interactive editing on top of `sitedeck_core::Editor`.
//!
//! `$EDITOR` drives the raw JSON view; dialoguer prompts drive the form
//! view, one prompt per field kind.

use dialoguer::{Confirm, Input, Select};
use serde_json::Value;

use sitedeck_core::{CoreError, Editable, Editor, FieldKind, FormField};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Edit the JSON text in `$EDITOR` until it parses or the operator gives
/// up. Returns `false` if the editor was closed without saving.
pub fn edit_in_editor<T: Editable>(
    editor: &mut Editor<T>,
    global: &GlobalOpts,
) -> Result<bool, CliError> {
    loop {
        let edited = dialoguer::Editor::new()
            .extension(".json")
            .edit(editor.text())
            .map_err(prompt_err)?;
        let Some(text) = edited else {
            return Ok(false);
        };

        match editor.edit_text(text) {
            Ok(()) => return Ok(true),
            Err(e) => {
                // The buffer keeps the rejected text, so reopening resumes it.
                output::failure(global, &e.to_string());
                let again = Confirm::new()
                    .with_prompt("Re-open the editor?")
                    .default(true)
                    .interact()
                    .map_err(prompt_err)?;
                if !again {
                    return Err(e.into());
                }
            }
        }
    }
}

/// Prompt for every editable field in form order.
pub fn prompt_form<T: Editable>(
    editor: &mut Editor<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let fields: Vec<FormField> = editor
        .form()
        .fields()
        .iter()
        .filter(|field| !field.read_only)
        .cloned()
        .collect();

    for field in &fields {
        if let Some(ref description) = field.description {
            output::note(global, description);
        }
        loop {
            let current = editor.field_value(&field.name).unwrap_or(Value::Null);
            let Some(raw) = prompt_field(field, &current)? else {
                break;
            };
            match editor.set_field(&field.name, &raw) {
                Ok(()) => break,
                Err(CoreError::Validation { message }) => output::failure(global, &message),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

/// Ask for one field. `None` keeps the current value.
fn prompt_field(field: &FormField, current: &Value) -> Result<Option<String>, CliError> {
    match &field.kind {
        FieldKind::Boolean => {
            let answer = Confirm::new()
                .with_prompt(&field.title)
                .default(current.as_bool().unwrap_or(false))
                .interact()
                .map_err(prompt_err)?;
            Ok(Some(answer.to_string()))
        }
        FieldKind::Enum(values) => {
            let selected = current.as_str().unwrap_or_default();
            let index = values.iter().position(|v| v == selected).unwrap_or(0);
            let choice = Select::new()
                .with_prompt(&field.title)
                .items(values)
                .default(index)
                .interact()
                .map_err(prompt_err)?;
            Ok(values.get(choice).cloned())
        }
        FieldKind::SecretString => {
            let has_value = current.as_str().is_some_and(|s| !s.is_empty());
            let prompt = if has_value {
                format!("{} (blank keeps current): ", field.title)
            } else {
                format!("{}: ", field.title)
            };
            let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
            if secret.is_empty() && has_value {
                Ok(None)
            } else {
                Ok(Some(secret))
            }
        }
        FieldKind::String | FieldKind::NullableString | FieldKind::Integer { .. } => {
            let validator = field.clone();
            let text: String = Input::new()
                .with_prompt(&field.title)
                .with_initial_text(field.display_value(current, true))
                .allow_empty(true)
                .validate_with(move |input: &String| validator.parse_input(input).map(|_| ()))
                .interact_text()
                .map_err(prompt_err)?;
            Ok(Some(text))
        }
    }
}
