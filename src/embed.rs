//! Integration surface for host pages.
//!
//! A host page adopts the widget with a single script tag; everything here
//! describes that contract. The docs payload is also exported to JavaScript
//! so an embedding page can render its own integration help.

use crate::Position;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Path of the bundled loader script relative to the serving origin.
pub const SCRIPT_PATH: &str = "/dist/hebrew-a11y.min.js";

/// Selector for the widget's own script tag carrying a position override.
/// Pinned to the loader path so a `data-position` attribute on an unrelated
/// script never picks the corner.
pub fn position_script_selector() -> String {
    format!("script[src*=\"{}\"][data-position]", SCRIPT_PATH)
}

#[derive(Debug, Serialize)]
pub struct IntegrationSnippets {
    pub basic: String,
    pub advanced: String,
}

/// Everything a host page needs to know to embed the widget.
#[derive(Debug, Serialize)]
pub struct IntegrationDocs {
    pub title: &'static str,
    pub integration: IntegrationSnippets,
    pub features: Vec<&'static str>,
    pub positions: Vec<&'static str>,
}

/// Script tag a host page pastes to embed the widget. With a position the
/// tag carries a `data-position` attribute; without one the widget falls
/// back to the default corner.
pub fn integration_snippet(origin: &str, position: Option<Position>) -> String {
    let origin = origin.trim_end_matches('/');
    match position {
        Some(position) => format!(
            "<script src=\"{}{}\" data-position=\"{}\" defer></script>",
            origin, SCRIPT_PATH, position
        ),
        None => format!("<script src=\"{}{}\" defer></script>", origin, SCRIPT_PATH),
    }
}

pub fn integration_docs(origin: &str) -> IntegrationDocs {
    IntegrationDocs {
        title: "Hebrew Accessibility Widget Documentation",
        integration: IntegrationSnippets {
            basic: integration_snippet(origin, None),
            advanced: integration_snippet(origin, Some(Position::BottomRight)),
        },
        features: vec![
            "Font size adjustment",
            "High contrast mode",
            "Grayscale mode",
            "Link highlighting",
            "Keyboard navigation",
            "Big cursor",
            "Animation control",
            "Text-to-speech (Hebrew)",
        ],
        positions: vec![
            "bottom-right (default)",
            "bottom-left",
            "top-right",
            "top-left",
        ],
    }
}

/// JavaScript-facing docs payload, as a plain object.
#[wasm_bindgen(js_name = integrationDocs)]
pub fn integration_docs_js(origin: String) -> JsValue {
    serde_wasm_bindgen::to_value(&integration_docs(&origin)).unwrap_or(JsValue::NULL)
}
