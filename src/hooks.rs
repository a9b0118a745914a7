use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the text and callbacks for one numeric form field.
#[derive(Clone, PartialEq)]
pub struct FormField {
    /// The current text content of the input field.
    pub text: String,
    /// Callback for the input's `oninput` event. Updates the text state.
    pub on_input: Callback<InputEvent>,
    /// Callback to empty the field after a submission.
    pub clear: Callback<()>,
    /// Reference to the `<input>`, used to move focus into it.
    pub node: NodeRef,
}

impl FormField {
    /// Put the caret into this field.
    pub fn focus(&self) {
        if let Some(input) = self.node.cast::<HtmlInputElement>() {
            let _ = input.focus();
        }
    }
}

/// Custom hook to manage the text state of a form field.
///
/// Parsing is deferred to submission, where all fields are validated together.
#[hook]
pub fn use_form_field() -> FormField {
    let text_state_handle: UseStateHandle<String> = use_state(String::new);
    let node = use_node_ref();

    let on_input = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let clear = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |_: ()| text_setter.set(String::new()))
    };

    FormField {
        text: (*text_state_handle).clone(),
        on_input,
        clear,
        node,
    }
}
