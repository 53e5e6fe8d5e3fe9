//! Pure Yew view components for the accessibility panel.
//!
//! Stateless components that render based on props; the widget root in
//! `main.rs` owns all state and hands callbacks down.

use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Labeled on/off switch for one feature flag.
#[derive(Properties, PartialEq)]
pub struct ToggleSwitchProps {
    pub id: &'static str,
    pub label: &'static str,
    pub checked: bool,
    pub onchange: Callback<bool>,
}

#[function_component(ToggleSwitch)]
pub fn toggle_switch(props: &ToggleSwitchProps) -> Html {
    let onchange = {
        let cb = props.onchange.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(input.checked());
        })
    };

    html! {
        <div class="a11y-feature-row">
            <label for={props.id}>{ props.label }</label>
            <label class="a11y-switch">
                <input type="checkbox"
                    id={props.id}
                    checked={props.checked}
                    onchange={onchange}
                />
                <span class="a11y-slider"></span>
            </label>
        </div>
    }
}

/// Stepper showing the current font scale with one button per direction.
#[derive(Properties, PartialEq)]
pub struct FontSizeControlProps {
    pub percent: u32,
    pub on_decrease: Callback<MouseEvent>,
    pub on_increase: Callback<MouseEvent>,
}

#[function_component(FontSizeControl)]
pub fn font_size_control(props: &FontSizeControlProps) -> Html {
    html! {
        <div class="a11y-section">
            <h3>{ "גודל טקסט" }</h3>
            <div class="a11y-font-controls">
                <button id="a11y-font-decrease"
                    aria-label="הקטנת טקסט"
                    onclick={props.on_decrease.clone()}>
                    { "א-" }
                </button>
                <span class="a11y-font-size">{ format!("{}%", props.percent) }</span>
                <button id="a11y-font-increase"
                    aria-label="הגדלת טקסט"
                    onclick={props.on_increase.clone()}>
                    { "א+" }
                </button>
            </div>
        </div>
    }
}

/// The accessibility-person glyph on the floating toggle button.
pub fn render_toggle_icon() -> Html {
    html! {
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"
            width="28" height="28" fill="currentColor" aria-hidden="true">
            <circle cx="12" cy="4" r="2"/>
            <path d="M19 13v-2c-1.54.02-3.09-.75-4.07-1.83l-1.29-1.43c-.17-.19-.38-.34-.61-.45-.01 0-.01-.01-.02-.01H13c-.35-.2-.75-.3-1.19-.26C10.76 7.11 10 8.04 10 9.09V15c0 1.1.9 2 2 2h5v5h2v-5.5c0-1.1-.9-2-2-2h-3v-3.45c1.29 1.07 3.25 1.94 5 1.95zm-6.17 5c-.41 1.16-1.52 2-2.83 2-1.66 0-3-1.34-3-3 0-1.31.84-2.41 2-2.83V12.1c-2.28.46-4 2.48-4 4.9 0 2.76 2.24 5 5 5 2.42 0 4.44-1.72 4.9-4h-2.07z"/>
        </svg>
    }
}
