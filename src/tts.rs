//! Hebrew text-to-speech side channel.
//!
//! Two states: inactive and active. Activation wires click/focus/blur
//! listeners onto every text-bearing element and is rejected when the
//! platform offers no speech synthesis. While active, at most one utterance
//! is in flight and exactly one element may carry the transient highlight
//! class; deactivation cancels speech and unwires everything.

use crate::config::{TTS_FOCUS_CLASS, TTS_LANG, TTS_MARK_ATTR, TTS_TEXT_SELECTOR};
use crate::store::{PreferenceStorage, SettingsStore};
use crate::Toggle;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

#[derive(Debug)]
pub enum TtsError {
    /// The platform exposes no speech synthesis at all.
    Unsupported,
    Backend(String),
}

impl fmt::Display for TtsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtsError::Unsupported => write!(f, "speech synthesis is not available"),
            TtsError::Backend(detail) => write!(f, "speech request failed: {}", detail),
        }
    }
}

impl std::error::Error for TtsError {}

/// Seam to the platform speech capability.
pub trait SpeechSynth {
    fn speak(&mut self, text: &str) -> Result<(), TtsError>;
    fn cancel(&mut self);
    fn is_speaking(&self) -> bool;
}

/// `window.speechSynthesis` backend. Speaks Hebrew, falling back to the
/// platform default voice when no `he-IL` voice is installed.
pub struct WebSpeech {
    synth: web_sys::SpeechSynthesis,
    current: Option<web_sys::SpeechSynthesisUtterance>,
    speaking: Rc<Cell<bool>>,
    on_start: Closure<dyn FnMut(Event)>,
    on_done: Closure<dyn FnMut(Event)>,
}

impl WebSpeech {
    /// Errors with [`TtsError::Unsupported`] when the platform offers no
    /// speech synthesis.
    pub fn new() -> Result<Self, TtsError> {
        let synth = web_sys::window()
            .ok_or(TtsError::Unsupported)?
            .speech_synthesis()
            .map_err(|_| TtsError::Unsupported)?;

        let speaking = Rc::new(Cell::new(false));
        let on_start = {
            let speaking = speaking.clone();
            Closure::wrap(Box::new(move |_: Event| speaking.set(true)) as Box<dyn FnMut(Event)>)
        };
        let on_done = {
            let speaking = speaking.clone();
            Closure::wrap(Box::new(move |_: Event| speaking.set(false)) as Box<dyn FnMut(Event)>)
        };

        // Chrome only populates the voice list after a getVoices round-trip.
        synth.get_voices();

        Ok(WebSpeech {
            synth,
            current: None,
            speaking,
            on_start,
            on_done,
        })
    }

    /// A canceled utterance still emits its `end`/`error` event
    /// asynchronously, possibly after this backend is gone. Unhook the
    /// handlers before the utterance is abandoned so the platform never
    /// dispatches into a dropped closure.
    fn detach_current(&mut self) {
        if let Some(utterance) = self.current.take() {
            utterance.set_onstart(None);
            utterance.set_onend(None);
            utterance.set_onerror(None);
        }
    }

    fn hebrew_voice(&self) -> Option<web_sys::SpeechSynthesisVoice> {
        self.synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<web_sys::SpeechSynthesisVoice>().ok())
            .find(|voice| voice.lang() == TTS_LANG)
    }
}

impl SpeechSynth for WebSpeech {
    fn speak(&mut self, text: &str) -> Result<(), TtsError> {
        self.detach_current();
        let utterance = web_sys::SpeechSynthesisUtterance::new_with_text(text)
            .map_err(|e| TtsError::Backend(format!("{:?}", e)))?;
        utterance.set_lang(TTS_LANG);
        if let Some(voice) = self.hebrew_voice() {
            utterance.set_voice(Some(&voice));
        }
        utterance.set_onstart(Some(self.on_start.as_ref().unchecked_ref()));
        utterance.set_onend(Some(self.on_done.as_ref().unchecked_ref()));
        utterance.set_onerror(Some(self.on_done.as_ref().unchecked_ref()));
        self.synth.speak(&utterance);
        self.current = Some(utterance);
        Ok(())
    }

    fn cancel(&mut self) {
        self.detach_current();
        self.synth.cancel();
        self.speaking.set(false);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.get()
    }
}

impl Drop for WebSpeech {
    fn drop(&mut self) {
        self.detach_current();
    }
}

/// Keeps at most one utterance in flight; a new request cancels the
/// previous one.
pub struct Narrator<S: SpeechSynth> {
    synth: S,
}

impl<S: SpeechSynth> Narrator<S> {
    pub fn new(synth: S) -> Self {
        Narrator { synth }
    }

    pub fn speak(&mut self, text: &str) {
        if self.synth.is_speaking() {
            self.synth.cancel();
        }
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.synth.speak(text) {
            warn!("{}", e);
        }
    }

    pub fn stop(&mut self) {
        self.synth.cancel();
    }
}

/// Ownership of the transient highlight: at most one element holds it.
pub struct HighlightTracker<K: PartialEq> {
    current: Option<K>,
}

impl<K: PartialEq> HighlightTracker<K> {
    pub fn new() -> Self {
        HighlightTracker { current: None }
    }

    /// Moves the highlight to `key`; returns the key that lost it, if any.
    pub fn focus(&mut self, key: K) -> Option<K> {
        if self.current.as_ref() == Some(&key) {
            return None;
        }
        self.current.replace(key)
    }

    /// Clears only when the blurred key still owns the highlight, so a blur
    /// arriving after the highlight already moved on is a no-op.
    pub fn blur(&mut self, key: &K) {
        if self.current.as_ref() == Some(key) {
            self.current = None;
        }
    }

    pub fn clear(&mut self) -> Option<K> {
        self.current.take()
    }
}

impl<K: PartialEq> Default for HighlightTracker<K> {
    fn default() -> Self {
        HighlightTracker::new()
    }
}

/// DOM-free core of the active state: narration plus highlight handoff,
/// keyed by whatever the caller uses to identify elements.
pub struct TtsSession<S: SpeechSynth, K: PartialEq> {
    narrator: Narrator<S>,
    highlight: HighlightTracker<K>,
}

impl<S: SpeechSynth, K: PartialEq> TtsSession<S, K> {
    pub fn new(synth: S) -> Self {
        TtsSession {
            narrator: Narrator::new(synth),
            highlight: HighlightTracker::new(),
        }
    }

    /// Click or focus on an element: speak its text and take the highlight.
    /// Returns the key that lost the highlight, if any.
    pub fn element_spoken(&mut self, key: K, text: &str) -> Option<K> {
        let displaced = self.highlight.focus(key);
        self.narrator.speak(text);
        displaced
    }

    pub fn element_blurred(&mut self, key: &K) {
        self.highlight.blur(key);
    }

    /// Cancels in-flight speech; returns the key still highlighted, if any.
    pub fn shutdown(&mut self) -> Option<K> {
        self.narrator.stop();
        self.highlight.clear()
    }
}

/// Event-adapter policy for an enable request: a rejected activation forces
/// the flag back off and hands the user-facing notice to `notify`.
pub fn enable_with_fallback<S, N>(
    activation: Result<(), TtsError>,
    store: &mut SettingsStore<S>,
    mut notify: N,
) -> bool
where
    S: PreferenceStorage,
    N: FnMut(&str),
{
    match activation {
        Ok(()) => {
            store.set_flag(Toggle::Tts, true);
            true
        }
        Err(e) => {
            warn!("text-to-speech unavailable: {}", e);
            notify(crate::config::TTS_UNSUPPORTED_NOTICE);
            store.set_flag(Toggle::Tts, false);
            false
        }
    }
}

type WebSession = TtsSession<WebSpeech, Element>;

struct ActiveTts {
    elements: Vec<Element>,
    on_click: Closure<dyn FnMut(Event)>,
    on_focus: Closure<dyn FnMut(Event)>,
    on_blur: Closure<dyn FnMut(Event)>,
    session: Rc<RefCell<WebSession>>,
}

/// Listener wiring for the live document. Inactive until [`activate`],
/// inactive again after [`deactivate`].
///
/// [`activate`]: TtsController::activate
/// [`deactivate`]: TtsController::deactivate
#[derive(Default)]
pub struct TtsController {
    active: Option<ActiveTts>,
}

impl TtsController {
    pub fn new() -> Self {
        TtsController::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Wires click/focus/blur listeners onto every text-bearing element.
    /// Already-active controllers stay as they are.
    pub fn activate(&mut self) -> Result<(), TtsError> {
        if self.active.is_some() {
            return Ok(());
        }

        let session = Rc::new(RefCell::new(TtsSession::new(WebSpeech::new()?)));

        let on_click = {
            let session = session.clone();
            Closure::wrap(
                Box::new(move |event: Event| speak_target(&session, &event))
                    as Box<dyn FnMut(Event)>,
            )
        };
        let on_focus = {
            let session = session.clone();
            Closure::wrap(
                Box::new(move |event: Event| speak_target(&session, &event))
                    as Box<dyn FnMut(Event)>,
            )
        };
        let on_blur = {
            let session = session.clone();
            Closure::wrap(Box::new(move |event: Event| {
                if let Some(element) = event_element(&event) {
                    let _ = element.class_list().remove_1(TTS_FOCUS_CLASS);
                    session.borrow_mut().element_blurred(&element);
                }
            }) as Box<dyn FnMut(Event)>)
        };

        let nodes = gloo_utils::document()
            .query_selector_all(TTS_TEXT_SELECTOR)
            .map_err(|e| TtsError::Backend(format!("{:?}", e)))?;

        let mut elements = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let _ = element.set_attribute(TTS_MARK_ATTR, "true");
            let _ = element
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            let _ = element
                .add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
            let _ =
                element.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref());
            elements.push(element);
        }

        debug!("text-to-speech active on {} elements", elements.len());
        self.active = Some(ActiveTts {
            elements,
            on_click,
            on_focus,
            on_blur,
            session,
        });
        Ok(())
    }

    /// Cancels in-flight speech, detaches all listeners, and strips marker
    /// attributes and highlight classes.
    pub fn deactivate(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(highlighted) = active.session.borrow_mut().shutdown() {
            let _ = highlighted.class_list().remove_1(TTS_FOCUS_CLASS);
        }
        for element in &active.elements {
            let _ = element.remove_attribute(TTS_MARK_ATTR);
            let _ = element.remove_event_listener_with_callback(
                "click",
                active.on_click.as_ref().unchecked_ref(),
            );
            let _ = element.remove_event_listener_with_callback(
                "focus",
                active.on_focus.as_ref().unchecked_ref(),
            );
            let _ = element.remove_event_listener_with_callback(
                "blur",
                active.on_blur.as_ref().unchecked_ref(),
            );
            let _ = element.class_list().remove_1(TTS_FOCUS_CLASS);
        }
        debug!("text-to-speech deactivated");
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.current_target()?.dyn_into::<Element>().ok()
}

fn speak_target(session: &Rc<RefCell<WebSession>>, event: &Event) {
    let Some(element) = event_element(event) else {
        return;
    };
    let text = element.text_content().unwrap_or_default();
    let mut session = session.borrow_mut();
    if let Some(previous) = session.element_spoken(element.clone(), &text) {
        let _ = previous.class_list().remove_1(TTS_FOCUS_CLASS);
    }
    let _ = element.class_list().add_1(TTS_FOCUS_CLASS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TTS_UNSUPPORTED_NOTICE;
    use crate::Position;

    #[derive(Clone, Default)]
    struct FakeSynth {
        spoken: Rc<RefCell<Vec<String>>>,
        cancels: Rc<Cell<usize>>,
        speaking: Rc<Cell<bool>>,
    }

    impl SpeechSynth for FakeSynth {
        fn speak(&mut self, text: &str) -> Result<(), TtsError> {
            self.spoken.borrow_mut().push(text.to_string());
            self.speaking.set(true);
            Ok(())
        }

        fn cancel(&mut self) {
            self.cancels.set(self.cancels.get() + 1);
            self.speaking.set(false);
        }

        fn is_speaking(&self) -> bool {
            self.speaking.get()
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStorage(Rc<RefCell<Option<String>>>);

    impl PreferenceStorage for MemoryStorage {
        fn read(&self) -> Option<String> {
            self.0.borrow().clone()
        }

        fn write(&self, payload: &str) -> Result<(), crate::store::StorageError> {
            *self.0.borrow_mut() = Some(payload.to_string());
            Ok(())
        }
    }

    #[test]
    fn new_utterance_supersedes_the_one_in_flight() {
        let synth = FakeSynth::default();
        let mut narrator = Narrator::new(synth.clone());
        narrator.speak("שלום");
        narrator.speak("עולם");
        assert_eq!(synth.cancels.get(), 1);
        assert_eq!(
            *synth.spoken.borrow(),
            vec!["שלום".to_string(), "עולם".to_string()]
        );
    }

    #[test]
    fn blank_text_is_not_spoken() {
        let synth = FakeSynth::default();
        let mut narrator = Narrator::new(synth.clone());
        narrator.speak("   ");
        assert!(synth.spoken.borrow().is_empty());
    }

    #[test]
    fn blank_text_still_stops_speech_in_flight() {
        let synth = FakeSynth::default();
        let mut narrator = Narrator::new(synth.clone());
        narrator.speak("שלום");
        narrator.speak("   ");
        assert_eq!(synth.cancels.get(), 1);
        assert_eq!(*synth.spoken.borrow(), vec!["שלום".to_string()]);
    }

    // Teardown relies on stop() always reaching the backend: that is where
    // a pending utterance gets its handlers unhooked, so the cancel must
    // happen even when the last utterance already finished.
    #[test]
    fn stop_reaches_the_backend_even_when_idle() {
        let synth = FakeSynth::default();
        let mut narrator = Narrator::new(synth.clone());
        narrator.stop();
        assert_eq!(synth.cancels.get(), 1);

        narrator.speak("שלום");
        synth.speaking.set(false);
        narrator.stop();
        assert_eq!(synth.cancels.get(), 2);
    }

    #[test]
    fn highlight_moves_from_previous_to_clicked_element() {
        let synth = FakeSynth::default();
        let mut session: TtsSession<_, &str> = TtsSession::new(synth.clone());

        assert_eq!(session.element_spoken("p1", "פסקה ראשונה"), None);
        assert_eq!(session.element_spoken("p2", "פסקה שנייה"), Some("p1"));
        assert_eq!(
            *synth.spoken.borrow(),
            vec!["פסקה ראשונה".to_string(), "פסקה שנייה".to_string()]
        );
    }

    #[test]
    fn reclicking_the_highlighted_element_displaces_nothing() {
        let mut session: TtsSession<_, &str> = TtsSession::new(FakeSynth::default());
        session.element_spoken("p1", "טקסט");
        assert_eq!(session.element_spoken("p1", "טקסט"), None);
    }

    #[test]
    fn blur_clears_only_the_current_owner() {
        let mut tracker: HighlightTracker<&str> = HighlightTracker::new();
        tracker.focus("a");
        tracker.blur(&"b");
        assert_eq!(tracker.clear(), Some("a"));

        tracker.focus("a");
        tracker.blur(&"a");
        assert_eq!(tracker.clear(), None);
    }

    #[test]
    fn shutdown_cancels_speech_and_reports_the_highlighted_key() {
        let synth = FakeSynth::default();
        let mut session: TtsSession<_, &str> = TtsSession::new(synth.clone());
        session.element_spoken("p1", "טקסט");
        assert_eq!(session.shutdown(), Some("p1"));
        assert!(synth.cancels.get() >= 1);
        assert!(!synth.is_speaking());
    }

    #[test]
    fn rejected_activation_forces_the_flag_off_and_notifies() {
        let mut store = SettingsStore::new(MemoryStorage::default(), Position::default());
        store.set_flag(Toggle::Tts, true);

        let mut notices = Vec::new();
        let enabled = enable_with_fallback(Err(TtsError::Unsupported), &mut store, |msg| {
            notices.push(msg.to_string())
        });

        assert!(!enabled);
        assert!(!store.get().tts);
        assert_eq!(notices, vec![TTS_UNSUPPORTED_NOTICE.to_string()]);
    }

    #[test]
    fn successful_activation_sets_the_flag() {
        let mut store = SettingsStore::new(MemoryStorage::default(), Position::default());
        let enabled = enable_with_fallback(Ok(()), &mut store, |_| {
            panic!("no notice expected on success")
        });
        assert!(enabled);
        assert!(store.get().tts);
    }
}
