//! Widget entry point: mounts the Yew root into the host page and wires UI
//! events into the settings store, document applier, and speech controller.

use hebrew_a11y::applier::apply_to_document;
use hebrew_a11y::config::{WIDGET_ID, WIDGET_ROOT_ID};
use hebrew_a11y::store::{LocalStorage, SettingsStore};
use hebrew_a11y::tts::{enable_with_fallback, TtsController};
use hebrew_a11y::{Position, Settings, Toggle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent};
use yew::prelude::*;

mod components;

use components::{render_toggle_icon, FontSizeControl, ToggleSwitch};

#[derive(Properties, PartialEq)]
pub struct WidgetProps {
    pub position: Position,
}

#[function_component(Widget)]
fn widget(props: &WidgetProps) -> Html {
    let store = use_mut_ref({
        let position = props.position;
        move || {
            let mut store = SettingsStore::new(LocalStorage, position);
            store.load();
            store
        }
    });
    let tts = use_mut_ref(TtsController::new);
    let settings = use_state(|| store.borrow().get().clone());
    let is_open = use_state(|| false);

    // First render: project the hydrated record onto the document, and bring
    // text-to-speech up if it was stored as enabled.
    {
        let store = store.clone();
        let tts = tts.clone();
        let settings = settings.clone();
        use_effect_with((), move |_| {
            apply_to_document(store.borrow().get());
            if store.borrow().get().tts {
                let activation = tts.borrow_mut().activate();
                enable_with_fallback(activation, &mut *store.borrow_mut(), notify_user);
            }
            settings.set(store.borrow().get().clone());
        });
    }

    // Escape and clicks outside the widget close the panel.
    {
        let is_open = is_open.clone();
        use_effect_with((), move |_| {
            let document = gloo_utils::document();
            let on_key = {
                let is_open = is_open.clone();
                Closure::wrap(Box::new(move |event: Event| {
                    if let Ok(key_event) = event.dyn_into::<KeyboardEvent>() {
                        if key_event.key() == "Escape" {
                            is_open.set(false);
                        }
                    }
                }) as Box<dyn FnMut(Event)>)
            };
            let on_click = Closure::wrap(Box::new(move |event: Event| {
                let inside = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(&format!("#{}", WIDGET_ID)).ok().flatten())
                    .is_some();
                if !inside {
                    is_open.set(false);
                }
            }) as Box<dyn FnMut(Event)>);

            let _ = document
                .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
            let _ = document
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());

            move || {
                let document = gloo_utils::document();
                let _ = document
                    .remove_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
                let _ = document
                    .remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            }
        });
    }

    let make_toggle = |toggle: Toggle| {
        let store = store.clone();
        let settings = settings.clone();
        Callback::from(move |checked: bool| {
            let mut store = store.borrow_mut();
            store.set_flag(toggle, checked);
            apply_to_document(store.get());
            settings.set(store.get().clone());
        })
    };

    let on_tts = {
        let store = store.clone();
        let tts = tts.clone();
        let settings = settings.clone();
        Callback::from(move |checked: bool| {
            if checked {
                let activation = tts.borrow_mut().activate();
                enable_with_fallback(activation, &mut *store.borrow_mut(), notify_user);
            } else {
                tts.borrow_mut().deactivate();
                store.borrow_mut().set_flag(Toggle::Tts, false);
            }
            settings.set(store.borrow().get().clone());
        })
    };

    let on_font_decrease = {
        let store = store.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let mut store = store.borrow_mut();
            if store.decrease_font() {
                apply_to_document(store.get());
                settings.set(store.get().clone());
            }
        })
    };

    let on_font_increase = {
        let store = store.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let mut store = store.borrow_mut();
            if store.increase_font() {
                apply_to_document(store.get());
                settings.set(store.get().clone());
            }
        })
    };

    let on_reset = {
        let store = store.clone();
        let tts = tts.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            tts.borrow_mut().deactivate();
            let mut store = store.borrow_mut();
            store.reset();
            apply_to_document(store.get());
            settings.set(store.get().clone());
        })
    };

    let on_toggle_open = {
        let is_open = is_open.clone();
        Callback::from(move |_: MouseEvent| is_open.set(!*is_open))
    };

    let current: &Settings = &settings;

    html! {
        <div id={WIDGET_ID}
            class={classes!("a11y-widget", props.position.as_css_class())}
            data-state={if *is_open { "open" } else { "closed" }}
            dir="rtl">
            <button class="a11y-toggle-button"
                aria-label="תפריט נגישות"
                aria-expanded={(*is_open).to_string()}
                onclick={on_toggle_open}>
                { render_toggle_icon() }
            </button>
            if *is_open {
                <div class="a11y-panel" role="dialog" aria-label="הגדרות נגישות">
                    <div class="a11y-panel-header">
                        <h2>{ "הגדרות נגישות" }</h2>
                        <p>{ "בהתאם לתקנה 5568" }</p>
                    </div>

                    <FontSizeControl
                        percent={current.font_size}
                        on_decrease={on_font_decrease}
                        on_increase={on_font_increase}
                    />

                    <div class="a11y-section">
                        <h3>{ "תצוגה" }</h3>
                        <ToggleSwitch id="a11y-contrast" label="ניגודיות גבוהה"
                            checked={current.high_contrast}
                            onchange={make_toggle(Toggle::HighContrast)} />
                        <ToggleSwitch id="a11y-grayscale" label="מצב שחור-לבן"
                            checked={current.grayscale}
                            onchange={make_toggle(Toggle::Grayscale)} />
                        <ToggleSwitch id="a11y-links" label="הדגשת קישורים"
                            checked={current.link_highlight}
                            onchange={make_toggle(Toggle::LinkHighlight)} />
                    </div>

                    <div class="a11y-section">
                        <h3>{ "ניווט" }</h3>
                        <ToggleSwitch id="a11y-keyboard" label="ניווט מקלדת"
                            checked={current.keyboard_nav}
                            onchange={make_toggle(Toggle::KeyboardNav)} />
                        <ToggleSwitch id="a11y-cursor" label="סמן מוגדל"
                            checked={current.big_cursor}
                            onchange={make_toggle(Toggle::BigCursor)} />
                    </div>

                    <div class="a11y-section">
                        <h3>{ "תוכן" }</h3>
                        <ToggleSwitch id="a11y-animations" label="עצירת אנימציות"
                            checked={current.no_animations}
                            onchange={make_toggle(Toggle::NoAnimations)} />
                        <ToggleSwitch id="a11y-tts" label="הקראת טקסט"
                            checked={current.tts}
                            onchange={on_tts} />
                    </div>

                    <button class="a11y-reset-button" onclick={on_reset}>
                        { "איפוס הגדרות" }
                    </button>
                </div>
            }
        </div>
    }
}

fn notify_user(message: &str) {
    let _ = gloo_utils::window().alert_with_message(message);
}

/// Reads the widget corner off the embedding script tag; unknown or missing
/// values fall back to the default corner.
fn detect_position() -> Position {
    gloo_utils::document()
        .query_selector(&hebrew_a11y::embed::position_script_selector())
        .ok()
        .flatten()
        .and_then(|script| script.get_attribute("data-position"))
        .and_then(|value| Position::from_attr(&value))
        .unwrap_or_default()
}

/// Injects the widget stylesheet into the host page head.
fn inject_styles() {
    let document = gloo_utils::document();
    match document.create_element("style") {
        Ok(style) => {
            style.set_text_content(Some(include_str!("widget.css")));
            if let Some(head) = document.head() {
                if let Err(e) = head.append_child(&style) {
                    log::warn!("failed to inject widget styles: {:?}", e);
                }
            }
        }
        Err(e) => log::warn!("failed to create style element: {:?}", e),
    }
}

/// Finds or creates the dedicated mount node so the widget never renders
/// into host page content.
fn mount_root() -> Option<Element> {
    let document = gloo_utils::document();
    if let Ok(Some(existing)) = document.query_selector(&format!("#{}", WIDGET_ROOT_ID)) {
        return Some(existing);
    }
    let root = document.create_element("div").ok()?;
    root.set_id(WIDGET_ROOT_ID);
    document.body()?.append_child(&root).ok()?;
    Some(root)
}

fn main() {
    console_error_panic_hook::set_once();

    let Some(root) = mount_root() else {
        log::error!("no document body to mount the accessibility widget into");
        return;
    };

    let position = detect_position();
    inject_styles();
    log::info!("mounting accessibility widget at {}", position);

    yew::Renderer::<Widget>::with_root_and_props(root, WidgetProps { position }).render();
}
