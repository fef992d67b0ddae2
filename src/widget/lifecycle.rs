use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::cache::ResponseStore;
use super::contract::{
    CacheEntry, HintRequest, HintResponse, SaveRequest, SaveResponse, SubmitRequest,
    SubmitResponse,
};
use super::host::{Host, Notification};
use super::indicator::{IndicatorStateMachine, IndicatorStatus};
use super::peers::PeerResponseRenderer;
use super::transport::{RequestError, Transport};
use super::view::{Element, WidgetView};

/// The three learner-triggered network actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    Save,
    Hint,
}

impl Action {
    pub fn control(self) -> Element {
        match self {
            Action::Submit => Element::SubmitButton,
            Action::Save => Element::SaveButton,
            Action::Hint => Element::HintButton,
        }
    }

    /// Server handler the request is posted to.
    pub fn handler(self) -> &'static str {
        match self {
            Action::Submit => "submit",
            Action::Save => "save_response",
            // the only grading server with hints registers this spelling
            Action::Hint => "hint_reponse",
        }
    }

    /// Event name used for start/end notifications.
    pub fn event(self) -> &'static str {
        match self {
            Action::Submit => "submit",
            Action::Save => "save",
            Action::Hint => "hint",
        }
    }

    fn busy_message(self) -> &'static str {
        match self {
            Action::Submit => "Submitting...",
            Action::Save => "Saving...",
            Action::Hint => "Loading hint...",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLabels {
    pub idle: String,
    pub busy: String,
}

impl ControlLabels {
    pub fn new(idle: &str, busy: &str) -> Self {
        Self {
            idle: idle.to_string(),
            busy: busy.to_string(),
        }
    }
}

/// Host-provided strings, the `data-value`/`data-checking` attributes of the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetLabels {
    pub submit: ControlLabels,
    pub save: ControlLabels,
    pub hint: ControlLabels,
    pub no_responses: String,
}

impl Default for WidgetLabels {
    fn default() -> Self {
        Self {
            submit: ControlLabels::new("Submit", "Checking..."),
            save: ControlLabels::new("Save", "Saving..."),
            hint: ControlLabels::new("Hint", "Loading..."),
            no_responses: "No responses to show at this time".to_string(),
        }
    }
}

impl WidgetLabels {
    fn for_action(&self, action: Action) -> &ControlLabels {
        match action {
            Action::Submit => &self.submit,
            Action::Save => &self.save,
            Action::Hint => &self.hint,
        }
    }

    fn for_action_mut(&mut self, action: Action) -> &mut ControlLabels {
        match action {
            Action::Submit => &mut self.submit,
            Action::Save => &mut self.save,
            Action::Hint => &mut self.hint,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MountOptions {
    /// fallbacks for labels the host markup leaves empty
    pub labels: WidgetLabels,
}

/// A dispatched request waiting for its response.
#[derive(Debug)]
pub struct PendingRequest {
    action: Action,
    url: String,
    body: Value,
}

impl PendingRequest {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// One mounted question: drives submit, save and hint and keeps the view,
/// the indicator and the shared cache consistent with the server's answers.
pub struct AnswerWidget<V: WidgetView> {
    instance_id: String,
    view: V,
    host: Host,
    transport: Box<dyn Transport>,
    cache: Rc<dyn ResponseStore>,
    indicator: IndicatorStateMachine,
    peers: PeerResponseRenderer,
    labels: WidgetLabels,
    in_flight: [bool; 3],
}

impl<V: WidgetView> AnswerWidget<V> {
    pub fn mount(
        instance_id: &str,
        mut view: V,
        host: Host,
        transport: Box<dyn Transport>,
        cache: Rc<dyn ResponseStore>,
        options: MountOptions,
    ) -> Self {
        match cache.get(instance_id) {
            Some(entry) => {
                debug!(instance_id, "restoring cached response state");
                view.set_answer_text(&entry.answer_text);
                view.set_text(Element::ProblemProgress, &entry.problem_progress);
                view.set_text(Element::UsedAttemptsFeedback, &entry.used_attempts_feedback);
            }
            None => debug!(instance_id, "no cached state, keeping host markup"),
        }

        let indicator = IndicatorStateMachine::from_view(&mut view);

        // the host's rendered control text is the localized idle label
        let mut labels = options.labels;
        for action in [Action::Submit, Action::Save, Action::Hint] {
            let shown = view.text(action.control());
            if !shown.trim().is_empty() {
                labels.for_action_mut(action).idle = shown;
            }
        }

        Self {
            instance_id: instance_id.to_string(),
            view,
            host,
            transport,
            cache,
            indicator,
            peers: PeerResponseRenderer::new(&labels.no_responses),
            labels,
            in_flight: [false; 3],
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn status(&self) -> IndicatorStatus {
        self.indicator.status()
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight[action.slot()]
    }

    pub fn on_submit(&mut self) {
        self.run(Action::Submit);
    }

    pub fn on_save(&mut self) {
        self.run(Action::Save);
    }

    pub fn on_hint(&mut self) {
        self.run(Action::Hint);
    }

    /// The learner changed the answer: whatever was graded no longer applies.
    pub fn on_answer_edited(&mut self) {
        self.view.set_text(Element::SubmittedMessage, "");
        self.view.set_text(Element::UserAlert, "");
        self.indicator.on_edited(&mut self.view);
    }

    pub fn toggle_peer_responses(&mut self) {
        self.peers.toggle(&mut self.view);
    }

    fn run(&mut self, action: Action) {
        if let Some(pending) = self.begin(action) {
            let result = self.transport.post_json(&pending.url, &pending.body);
            self.complete(pending, result);
        }
    }

    /// Marks `action` busy, notifies the host and builds its request.
    ///
    /// Returns `None` while the same action is still in flight or when the
    /// markup has no control for it.
    pub fn begin(&mut self, action: Action) -> Option<PendingRequest> {
        if self.is_busy(action) {
            debug!(instance_id = %self.instance_id, ?action, "action already in flight, ignoring");
            return None;
        }
        if !self.view.has_element(action.control()) {
            debug!(instance_id = %self.instance_id, ?action, "no control for action, ignoring");
            return None;
        }

        // built first so a failure leaves the control untouched
        let body = match self.request_body(action) {
            Ok(body) => body,
            Err(e) => {
                warn!(instance_id = %self.instance_id, ?action, error = %e, "could not build request");
                self.host.notify("error", &Notification::empty());
                return None;
            }
        };

        self.in_flight[action.slot()] = true;
        let control = action.control();
        self.view.set_disabled(control, true);
        self.view
            .set_text(control, &self.labels.for_action(action).busy);
        self.host
            .notify(action.event(), &Notification::start(action.busy_message()));

        Some(PendingRequest {
            action,
            url: self.host.handler_url(action.handler()),
            body,
        })
    }

    fn request_body(&self, action: Action) -> Result<Value, RequestError> {
        let body = match action {
            Action::Submit => serde_json::to_value(SubmitRequest {
                student_answer: self.view.answer_text(),
                can_record_response: self.view.peer_opt_in(),
            })?,
            Action::Save => serde_json::to_value(SaveRequest {
                student_answer: self.view.answer_text(),
            })?,
            Action::Hint => serde_json::to_value(HintRequest {})?,
        };
        Ok(body)
    }

    /// Applies the outcome of a request started with [`AnswerWidget::begin`].
    ///
    /// The response is fully decoded before anything is touched, so a
    /// malformed body leaves the view and the cache as they were.
    pub fn complete(&mut self, pending: PendingRequest, result: Result<Value, RequestError>) {
        let action = pending.action;
        self.in_flight[action.slot()] = false;
        self.view.set_disabled(action.control(), false);

        let outcome = result.and_then(|value| match action {
            Action::Submit => decode::<SubmitResponse>(value).map(|r| self.apply_submit(r)),
            Action::Save => decode::<SaveResponse>(value).map(|r| self.apply_save(r)),
            Action::Hint => decode::<HintResponse>(value).map(|r| self.apply_hint(r)),
        });

        self.view
            .set_text(action.control(), &self.labels.for_action(action).idle);

        match outcome {
            Ok(()) => {
                debug!(instance_id = %self.instance_id, ?action, "request completed");
                self.host.notify(action.event(), &Notification::end());
            }
            Err(e) => {
                warn!(instance_id = %self.instance_id, ?action, error = %e, "request failed");
                self.host.notify("error", &Notification::empty());
            }
        }
    }

    fn apply_submit(&mut self, response: SubmitResponse) {
        self.apply_feedback(
            &response.used_attempts_feedback,
            &response.problem_progress,
            &response.submitted_message,
            &response.user_alert,
        );
        self.indicator
            .on_graded(&mut self.view, response.indicator_class);
        self.hide_controls(&response.nodisplay_class);
        self.view.set_text(Element::HintText, "");
        self.peers.render(
            &mut self.view,
            response.display_other_responses,
            &response.other_responses,
        );
        self.write_cache(&response.problem_progress, &response.used_attempts_feedback);
    }

    fn apply_save(&mut self, response: SaveResponse) {
        self.hide_controls(&response.nodisplay_class);
        self.apply_feedback(
            &response.used_attempts_feedback,
            &response.problem_progress,
            &response.submitted_message,
            &response.user_alert,
        );
        self.write_cache(&response.problem_progress, &response.used_attempts_feedback);
    }

    fn apply_hint(&mut self, response: HintResponse) {
        self.view.set_text(Element::HintText, &response.hint_text);
    }

    fn apply_feedback(&mut self, attempts: &str, progress: &str, submitted: &str, alert: &str) {
        self.view.set_text(Element::UsedAttemptsFeedback, attempts);
        self.view.set_text(Element::ProblemProgress, progress);
        self.view.set_text(Element::SubmittedMessage, submitted);
        self.view.set_text(Element::UserAlert, alert);
    }

    fn hide_controls(&mut self, marker: &str) {
        self.view.add_class(Element::SubmitButton, marker);
        self.view.add_class(Element::SaveButton, marker);
    }

    // reads the answer from the view after the response has been applied
    fn write_cache(&self, problem_progress: &str, used_attempts_feedback: &str) {
        self.cache.put(
            &self.instance_id,
            CacheEntry {
                answer_text: self.view.answer_text(),
                problem_progress: problem_progress.to_string(),
                used_attempts_feedback: used_attempts_feedback.to_string(),
            },
        );
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RequestError> {
    Ok(serde_json::from_value(value)?)
}
