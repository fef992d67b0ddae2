use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use freetext::widget::{
    AnswerWidget, BaseUrlHandlers, CacheEntry, Element, Host, IndicatorStatus, ListItem,
    MemoryView, MountOptions, Notification, Notifier, RequestError, ResponseStore, SequenceCache,
    Transport, WidgetView, HIDDEN_CLASS, PEER_ITEM_CLASS, PLACEHOLDER_CLASS,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Server {
    replies: Rc<RefCell<VecDeque<Result<Value, RequestError>>>>,
    requests: Rc<RefCell<Vec<(String, Value)>>>,
}

impl Server {
    fn reply(&self, reply: Value) {
        self.replies.borrow_mut().push_back(Ok(reply));
    }

    fn fail(&self) {
        self.replies
            .borrow_mut()
            .push_back(Err(RequestError::ServerError { status: 500 }));
    }
}

impl Transport for Server {
    fn post_json(&self, url: &str, body: &Value) -> Result<Value, RequestError> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), body.clone()));
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("no reply queued")
    }
}

#[derive(Clone, Default)]
struct Events(Rc<RefCell<Vec<(String, Notification)>>>);

impl Notifier for Events {
    fn notify(&self, event: &str, notification: &Notification) {
        self.0
            .borrow_mut()
            .push((event.to_string(), notification.clone()));
    }
}

impl Events {
    fn names(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(e, _)| e.clone()).collect()
    }
}

fn mount(
    id: &str,
    view: MemoryView,
    server: &Server,
    events: &Events,
    cache: Rc<SequenceCache>,
) -> AnswerWidget<MemoryView> {
    let host = Host::new(
        Box::new(BaseUrlHandlers::new("https://lms.example.org", id)),
        Some(Box::new(events.clone())),
    );
    AnswerWidget::mount(
        id,
        view,
        host,
        Box::new(server.clone()),
        cache,
        MountOptions::default(),
    )
}

fn paris_response() -> Value {
    json!({
        "status": "success",
        "indicator_class": "correct",
        "problem_progress": "1/1 points",
        "used_attempts_feedback": "1 of 3 attempts used",
        "submitted_message": "Your submission has been received",
        "user_alert": "",
        "nodisplay_class": "",
        "display_other_responses": true,
        "other_responses": []
    })
}

fn save_response(answer_alert: &str) -> Value {
    json!({
        "status": "success",
        "problem_progress": "(1 point possible)",
        "used_attempts_feedback": "You have used 0 of 3 submissions",
        "nodisplay_class": "",
        "submitted_message": "",
        "user_alert": answer_alert,
        "visibility_class": ""
    })
}

#[test]
fn initial_mount_without_cache_keeps_host_markup() {
    let server = Server::default();
    let events = Events::default();
    let view = MemoryView::student_markup("Type your answer here")
        .with_text(Element::ProblemProgress, "(1 point possible)");

    let widget = mount("q1", view, &server, &events, Rc::new(SequenceCache::new()));

    assert_eq!(widget.view().answer_text(), "Type your answer here");
    assert_eq!(widget.view().text(Element::ProblemProgress), "(1 point possible)");
    assert_eq!(widget.status(), IndicatorStatus::Unanswered);
    assert!(widget.view().has_class(Element::AnswerContainer, "unanswered"));
    assert!(events.0.borrow().is_empty());
}

#[test]
fn correct_submit_updates_view_and_cache() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );
    server.reply(paris_response());

    widget.on_submit();

    let view = widget.view();
    assert_eq!(widget.status(), IndicatorStatus::Correct);
    assert!(view.has_class(Element::AnswerContainer, "correct"));
    assert!(!view.has_class(Element::AnswerContainer, "unanswered"));
    assert_eq!(view.text(Element::ProblemProgress), "1/1 points");
    assert_eq!(view.text(Element::UsedAttemptsFeedback), "1 of 3 attempts used");
    assert_eq!(
        cache.get("q1"),
        Some(CacheEntry {
            answer_text: "Paris".to_string(),
            problem_progress: "1/1 points".to_string(),
            used_attempts_feedback: "1 of 3 attempts used".to_string(),
        })
    );
    assert_eq!(
        server.requests.borrow()[0].1,
        json!({"student_answer": "Paris", "can_record_response": false})
    );
    assert_eq!(events.names(), vec!["submit", "submit"]);
}

#[test]
fn empty_peer_list_shows_single_placeholder() {
    let server = Server::default();
    let events = Events::default();
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        Rc::new(SequenceCache::new()),
    );
    server.reply(paris_response());

    widget.on_submit();

    assert!(!widget.view().has_class(Element::PeerPanel, HIDDEN_CLASS));
    assert_eq!(
        widget.view().items(Element::PeerList),
        &[ListItem::new(
            PLACEHOLDER_CLASS,
            "No responses to show at this time"
        )]
    );
}

#[test]
fn peer_answers_render_in_order() {
    let server = Server::default();
    let events = Events::default();
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        Rc::new(SequenceCache::new()),
    );
    let mut response = paris_response();
    response["other_responses"] = json!([{"answer": "Paris"}, {"answer": "It is Paris"}]);
    server.reply(response);

    widget.on_submit();

    assert_eq!(
        widget.view().items(Element::PeerList),
        &[
            ListItem::new(PEER_ITEM_CLASS, "Paris"),
            ListItem::new(PEER_ITEM_CLASS, "It is Paris"),
        ]
    );
}

#[test]
fn hint_changes_only_hint_text() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );
    server.reply(paris_response());
    widget.on_submit();
    let before = widget.view().clone();
    server.reply(json!({"hint_text": "Think about rivers"}));

    widget.on_hint();

    let after = widget.view();
    assert_eq!(after.text(Element::HintText), "Think about rivers");
    for element in [
        Element::ProblemProgress,
        Element::UsedAttemptsFeedback,
        Element::SubmittedMessage,
        Element::UserAlert,
        Element::AnswerContainer,
        Element::SubmitButton,
        Element::SaveButton,
        Element::PeerPanel,
        Element::PeerList,
    ] {
        assert_eq!(after.state(element), before.state(element), "{:?}", element);
    }
    assert_eq!(cache.get("q1").unwrap().answer_text, "Paris");
    assert_eq!(server.requests.borrow()[1].1, json!({}));
    assert!(server.requests.borrow()[1].0.ends_with("/handler/hint_reponse"));
}

#[test]
fn failed_submit_leaves_everything_unchanged() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );
    server.reply(paris_response());
    widget.on_submit();
    let cached = cache.get("q1");
    let before = widget.view().clone();

    widget.view_mut().set_answer_text("Lyon");
    server.fail();
    widget.on_submit();

    let after = widget.view();
    for element in [
        Element::ProblemProgress,
        Element::UsedAttemptsFeedback,
        Element::AnswerContainer,
        Element::FeedbackStatus,
        Element::SubmitButton,
        Element::SaveButton,
        Element::PeerPanel,
    ] {
        assert_eq!(after.state(element), before.state(element), "{:?}", element);
    }
    assert_eq!(cache.get("q1"), cached);
    let errors = events.names().iter().filter(|e| *e == "error").count();
    assert_eq!(errors, 1);
}

#[test]
fn failed_save_leaves_everything_unchanged() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );
    let mut saved = save_response("Your answers have been saved but not graded.");
    saved["nodisplay_class"] = json!("nodisplay");
    server.reply(saved);
    widget.on_save();
    let cached = cache.get("q1");
    let before = widget.view().clone();

    widget.view_mut().set_answer_text("Paris, France");
    server.fail();
    widget.on_save();

    let after = widget.view();
    for element in [
        Element::ProblemProgress,
        Element::UsedAttemptsFeedback,
        Element::UserAlert,
        Element::SubmitButton,
        Element::SaveButton,
        Element::AnswerContainer,
    ] {
        assert_eq!(after.state(element), before.state(element), "{:?}", element);
    }
    assert!(after.has_class(Element::SaveButton, "nodisplay"));
    assert_eq!(after.text(Element::ProblemProgress), "(1 point possible)");
    assert_eq!(cache.get("q1"), cached);
    assert_eq!(cache.get("q1").unwrap().answer_text, "Paris");
    assert_eq!(events.names(), vec!["save", "save", "save", "error"]);
}

#[test]
fn saving_twice_is_idempotent() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );

    server.reply(save_response("Your answers have been saved but not graded."));
    widget.on_save();
    let once_view = widget.view().clone();
    let once_cache = cache.get("q1");

    server.reply(save_response("Your answers have been saved but not graded."));
    widget.on_save();

    for element in [
        Element::ProblemProgress,
        Element::UsedAttemptsFeedback,
        Element::UserAlert,
        Element::SaveButton,
        Element::SubmitButton,
        Element::AnswerContainer,
    ] {
        assert_eq!(widget.view().state(element), once_view.state(element));
    }
    assert_eq!(cache.get("q1"), once_cache);
    assert_eq!(widget.status(), IndicatorStatus::Unanswered);
}

#[test]
fn remount_restores_cached_state() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup(""),
        &server,
        &events,
        cache.clone(),
    );
    widget.view_mut().set_answer_text("Paris");
    server.reply(paris_response());
    widget.on_submit();
    drop(widget);

    let widget = mount(
        "q1",
        MemoryView::student_markup(""),
        &server,
        &events,
        cache.clone(),
    );

    assert_eq!(widget.view().answer_text(), "Paris");
    assert_eq!(widget.view().text(Element::ProblemProgress), "1/1 points");
    assert_eq!(
        widget.view().text(Element::UsedAttemptsFeedback),
        "1 of 3 attempts used"
    );
    assert_eq!(server.requests.borrow().len(), 1);
}

#[test]
fn instances_on_one_page_keep_separate_entries() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut first = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );
    let mut second = mount(
        "q2",
        MemoryView::student_markup("Seine"),
        &server,
        &events,
        cache.clone(),
    );

    server.reply(paris_response());
    first.on_submit();
    server.reply(save_response(""));
    second.on_save();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("q1").unwrap().answer_text, "Paris");
    assert_eq!(cache.get("q2").unwrap().answer_text, "Seine");
    assert_eq!(second.status(), IndicatorStatus::Unanswered);
    assert!(server.requests.borrow()[1].0.contains("/xblock/q2/handler/save_response"));
}

#[test]
fn later_response_wins_for_overlapping_submits() {
    let server = Server::default();
    let events = Events::default();
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        cache.clone(),
    );

    let submit = widget.begin(freetext::widget::Action::Submit).unwrap();
    let save = widget.begin(freetext::widget::Action::Save).unwrap();
    widget.complete(submit, Ok(paris_response()));
    widget.complete(save, Ok(save_response("")));

    assert_eq!(
        cache.get("q1").unwrap().problem_progress,
        "(1 point possible)"
    );
    assert_eq!(widget.status(), IndicatorStatus::Correct);
}

#[test]
fn edit_after_submit_is_unanswered() {
    let server = Server::default();
    let events = Events::default();
    let mut widget = mount(
        "q1",
        MemoryView::student_markup("Paris"),
        &server,
        &events,
        Rc::new(SequenceCache::new()),
    );
    let mut response = paris_response();
    response["indicator_class"] = json!("incorrect");
    server.reply(response);
    widget.on_submit();

    widget.view_mut().set_answer_text("Paris!");
    widget.on_answer_edited();

    for element in [Element::AnswerContainer, Element::FeedbackStatus] {
        let active: Vec<_> = ["correct", "incorrect", "unanswered"]
            .into_iter()
            .filter(|class| widget.view().has_class(element, class))
            .collect();
        assert_eq!(active, vec!["unanswered"]);
    }
}
