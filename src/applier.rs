//! Projection of the settings record onto the live document.
//!
//! `document_ops` is the pure half: a settings snapshot maps to a fixed op
//! list, so the same snapshot always yields the same document state and a
//! second application changes nothing. `apply_to_document` is the thin
//! web-sys adapter that executes the ops.

use crate::config::{
    BIG_CURSOR_CLASS, GRAYSCALE_CLASS, HIGH_CONTRAST_CLASS, KEYBOARD_NAV_CLASS,
    LINK_HIGHLIGHT_CLASS, NO_ANIMATIONS_CLASS,
};
use crate::Settings;
use log::{debug, warn};
use wasm_bindgen::JsCast;

/// A single observable document mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocOp {
    /// Root font size, in percent of the page base size.
    FontScale(u32),
    /// Body class present (`true`) or absent (`false`).
    BodyClass(&'static str, bool),
}

/// Settings snapshot to document mutations. One font-scale op plus exactly
/// one op per feature class.
pub fn document_ops(settings: &Settings) -> Vec<DocOp> {
    vec![
        DocOp::FontScale(settings.font_size),
        DocOp::BodyClass(HIGH_CONTRAST_CLASS, settings.high_contrast),
        DocOp::BodyClass(GRAYSCALE_CLASS, settings.grayscale),
        DocOp::BodyClass(LINK_HIGHLIGHT_CLASS, settings.link_highlight),
        DocOp::BodyClass(KEYBOARD_NAV_CLASS, settings.keyboard_nav),
        DocOp::BodyClass(BIG_CURSOR_CLASS, settings.big_cursor),
        DocOp::BodyClass(NO_ANIMATIONS_CLASS, settings.no_animations),
    ]
}

/// Executes the projection against the live document.
pub fn apply_to_document(settings: &Settings) {
    let document = gloo_utils::document();
    for op in document_ops(settings) {
        match op {
            DocOp::FontScale(percent) => {
                let root = document
                    .document_element()
                    .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
                if let Some(root) = root {
                    if let Err(e) = root
                        .style()
                        .set_property("font-size", &format!("{}%", percent))
                    {
                        warn!("failed to set root font size: {:?}", e);
                    }
                }
            }
            DocOp::BodyClass(class, on) => {
                if let Some(body) = document.body() {
                    let result = if on {
                        body.class_list().add_1(class)
                    } else {
                        body.class_list().remove_1(class)
                    };
                    if let Err(e) = result {
                        warn!("failed to toggle body class {}: {:?}", class, e);
                    }
                }
            }
        }
    }
    debug!("applied accessibility settings, font {}%", settings.font_size);
}
