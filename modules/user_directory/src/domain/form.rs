//! Form state for the user profile form, driven by a single transition function.

use std::collections::BTreeSet;

use crate::domain::postal::PostalAddress;
use crate::domain::validation::{validate_field, validate_form, FieldErrors, FormField, UserForm};

/// Everything a form instance tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: UserForm,
    pub errors: FieldErrors,
    pub touched: BTreeSet<FormField>,
    /// Set by a `Submit` that passed validation.
    pub submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Change { field: FormField, value: String },
    Blur { field: FormField },
    Submit,
    ApplyPostalAddress(PostalAddress),
    Reset,
}

impl FormState {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Replaces (or clears) the error of one field from its current value.
    fn revalidate(&mut self, field: FormField) {
        match validate_field(field, self.values.get(field)) {
            Some(msg) => {
                self.errors.insert(field, msg);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn set_value(&mut self, field: FormField, value: String) {
        self.values.set(field, value);
        self.submitted = false;
        if self.touched.contains(&field) {
            self.revalidate(field);
        }
    }
}

/// Applies one action and returns the next state.
pub fn reduce(mut state: FormState, action: FormAction) -> FormState {
    match action {
        FormAction::Change { field, value } => state.set_value(field, value),
        FormAction::Blur { field } => {
            state.touched.insert(field);
            state.revalidate(field);
        }
        FormAction::Submit => {
            state.touched.extend(FormField::ALL);
            state.errors = validate_form(&state.values).into_errors();
            state.submitted = state.errors.is_empty();
        }
        FormAction::ApplyPostalAddress(address) => {
            if !address.state.trim().is_empty() {
                state.set_value(FormField::State, address.state.trim().to_string());
            }
            let line = address.address_line();
            if !line.is_empty() {
                state.set_value(FormField::Address, line);
            }
        }
        FormAction::Reset => state = FormState::default(),
    }
    state
}
