use std::collections::{BTreeSet, HashMap};

/// Elements of the student view the controller reads or mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// parent of the answer textarea, carries the status class
    AnswerContainer,
    /// optional overall feedback region, mirrors the status class
    FeedbackStatus,
    SubmitButton,
    SaveButton,
    HintButton,
    UsedAttemptsFeedback,
    ProblemProgress,
    SubmittedMessage,
    UserAlert,
    HintText,
    /// "responses-box" wrapping the peer list
    PeerPanel,
    PeerList,
    PeerToggleShow,
    PeerToggleHide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub class: String,
    pub text: String,
}

impl ListItem {
    pub fn new(class: &str, text: &str) -> Self {
        Self {
            class: class.to_string(),
            text: text.to_string(),
        }
    }
}

/// The DOM handles of one mounted widget.
///
/// Implementations own their elements exclusively; a view is never shared
/// between widget instances.
pub trait WidgetView {
    /// Whether the mounted markup contains `element` at all.
    fn has_element(&self, element: Element) -> bool;

    fn answer_text(&self) -> String;
    fn set_answer_text(&mut self, text: &str);

    /// State of the "share my answer" checkbox, false when the markup has none.
    fn peer_opt_in(&self) -> bool;

    fn text(&self, element: Element) -> String;
    fn set_text(&mut self, element: Element, text: &str);

    fn has_class(&self, element: Element, class: &str) -> bool;
    fn add_class(&mut self, element: Element, class: &str);
    fn remove_class(&mut self, element: Element, class: &str);

    fn set_disabled(&mut self, element: Element, disabled: bool);

    /// Inline visibility, independent of any class.
    fn is_visible(&self, element: Element) -> bool;
    fn set_visible(&mut self, element: Element, visible: bool);

    fn set_items(&mut self, element: Element, items: Vec<ListItem>);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub text: String,
    pub classes: BTreeSet<String>,
    pub disabled: bool,
    pub hidden: bool,
    pub items: Vec<ListItem>,
}

/// Headless view keeping element state in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    answer: String,
    peer_opt_in: Option<bool>,
    elements: HashMap<Element, ElementState>,
}

impl MemoryView {
    /// The full student markup: every element present, the peer panel
    /// collapsed and the "show" label of the toggle hidden.
    pub fn student_markup(default_answer: &str) -> Self {
        use Element::*;
        let mut view = Self::default().with_answer(default_answer);
        for element in [
            AnswerContainer,
            FeedbackStatus,
            SubmitButton,
            SaveButton,
            HintButton,
            UsedAttemptsFeedback,
            ProblemProgress,
            SubmittedMessage,
            UserAlert,
            HintText,
            PeerPanel,
            PeerList,
            PeerToggleShow,
            PeerToggleHide,
        ] {
            view.elements.insert(element, ElementState::default());
        }
        view.peer_opt_in = Some(false);
        view.state_mut(PeerToggleShow).hidden = true;
        view.state_mut(PeerPanel).classes.insert("hidden".to_string());
        view
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.entry(element).or_default();
        self
    }

    pub fn without_element(mut self, element: Element) -> Self {
        self.elements.remove(&element);
        self
    }

    pub fn with_text(mut self, element: Element, text: &str) -> Self {
        self.state_mut(element).text = text.to_string();
        self
    }

    pub fn set_peer_opt_in(&mut self, checked: bool) {
        self.peer_opt_in = Some(checked);
    }

    pub fn state(&self, element: Element) -> Option<&ElementState> {
        self.elements.get(&element)
    }

    pub fn items(&self, element: Element) -> &[ListItem] {
        self.elements
            .get(&element)
            .map(|s| s.items.as_slice())
            .unwrap_or_default()
    }

    pub fn is_disabled(&self, element: Element) -> bool {
        self.elements.get(&element).is_some_and(|s| s.disabled)
    }

    fn state_mut(&mut self, element: Element) -> &mut ElementState {
        self.elements.entry(element).or_default()
    }
}

impl WidgetView for MemoryView {
    fn has_element(&self, element: Element) -> bool {
        self.elements.contains_key(&element)
    }

    fn answer_text(&self) -> String {
        self.answer.clone()
    }

    fn set_answer_text(&mut self, text: &str) {
        self.answer = text.to_string();
    }

    fn peer_opt_in(&self) -> bool {
        self.peer_opt_in.unwrap_or(false)
    }

    fn text(&self, element: Element) -> String {
        self.elements
            .get(&element)
            .map(|s| s.text.clone())
            .unwrap_or_default()
    }

    // missing elements are silently skipped, like an empty jQuery selection
    fn set_text(&mut self, element: Element, text: &str) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.text = text.to_string();
        }
    }

    fn has_class(&self, element: Element, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|s| s.classes.contains(class))
    }

    fn add_class(&mut self, element: Element, class: &str) {
        if class.is_empty() {
            return;
        }
        if let Some(state) = self.elements.get_mut(&element) {
            state.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: Element, class: &str) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.classes.remove(class);
        }
    }

    fn set_disabled(&mut self, element: Element, disabled: bool) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.disabled = disabled;
        }
    }

    fn is_visible(&self, element: Element) -> bool {
        self.elements.get(&element).is_some_and(|s| !s.hidden)
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.hidden = !visible;
        }
    }

    fn set_items(&mut self, element: Element, items: Vec<ListItem>) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.items = items;
        }
    }
}
