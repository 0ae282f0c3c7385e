//! Form-field state for the checkout page.

use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Validator shared by all checkout fields: takes the raw text, returns the
/// normalized value or a message for the user.
pub type FieldValidator = Rc<dyn Fn(&str) -> Result<String, String>>;

/// Holds the state and callbacks for one validated form field.
#[derive(Clone)]
pub struct ValidatedField {
    pub text: UseStateHandle<String>,
    pub error: UseStateHandle<Option<String>>,
    /// Default `oninput`: mirror the keystroke into the text state. Fields
    /// that reformat as the user types (phone) install their own handler
    /// over `text` instead.
    pub oninput: Callback<InputEvent>,
    validator: FieldValidator,
}

impl ValidatedField {
    /// Validate the current text, record the outcome, and return the
    /// normalized value when it passes.
    pub fn commit(&self) -> Option<String> {
        match (self.validator)(&self.text) {
            Ok(value) => {
                if *self.text != value {
                    self.text.set(value.clone());
                }
                self.error.set(None);
                Some(value)
            }
            Err(message) => {
                self.error.set(Some(message));
                None
            }
        }
    }

    pub fn class(&self) -> &'static str {
        if self.error.is_some() {
            "invalid"
        } else {
            ""
        }
    }
}

#[hook]
pub fn use_validated_field(initial: String, validator: FieldValidator) -> ValidatedField {
    let text = use_state(move || initial);
    let error = use_state(|| None::<String>);

    let oninput = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    ValidatedField {
        text,
        error,
        oninput,
        validator,
    }
}
