//! Application-level constants for the widget.

// Persistent storage
pub const STORAGE_KEY: &str = "a11y-preferences";

// Document classes toggled by the applier
pub const HIGH_CONTRAST_CLASS: &str = "a11y-high-contrast";
pub const GRAYSCALE_CLASS: &str = "a11y-grayscale";
pub const LINK_HIGHLIGHT_CLASS: &str = "a11y-link-highlight";
pub const KEYBOARD_NAV_CLASS: &str = "a11y-keyboard-nav";
pub const BIG_CURSOR_CLASS: &str = "a11y-big-cursor";
pub const NO_ANIMATIONS_CLASS: &str = "a11y-no-animations";

// Text-to-speech
pub const TTS_TEXT_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li, a, button, label, span";
pub const TTS_MARK_ATTR: &str = "data-a11y-tts";
pub const TTS_FOCUS_CLASS: &str = "a11y-tts-focus";
pub const TTS_LANG: &str = "he-IL";
pub const TTS_UNSUPPORTED_NOTICE: &str = "הדפדפן שלך אינו תומך בהקראת טקסט";

// Widget chrome
pub const WIDGET_ID: &str = "a11y-widget";
pub const WIDGET_ROOT_ID: &str = "hebrew-a11y-root";
