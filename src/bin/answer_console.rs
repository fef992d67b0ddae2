use std::io::{self, BufRead, Write};
use std::rc::Rc;

use anyhow::Context;
use freetext::config::ConsoleConfig;
use freetext::widget::{
    AnswerWidget, BaseUrlHandlers, Element, Host, MemoryView, MountOptions, SequenceCache,
    UreqTransport, WidgetView,
};
use tracing_subscriber::EnvFilter;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const HELP: &str = "commands: type <answer> | check <true|false> | submit | save | hint | toggle | show | remount | quit";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ConsoleConfig::from_env().context("failed to read configuration")?;
    // one page-wide cache shared by every mount of the question
    let cache = Rc::new(SequenceCache::new());
    let mut widget = mount(&config, cache.clone());

    println!("{}", HELP);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        let (command, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));

        match command {
            "type" => {
                widget.view_mut().set_answer_text(rest);
                widget.on_answer_edited();
            }
            "check" => widget.view_mut().set_peer_opt_in(rest == "true"),
            "submit" => widget.on_submit(),
            "save" => widget.on_save(),
            "hint" => widget.on_hint(),
            "toggle" => widget.toggle_peer_responses(),
            "show" => {}
            "remount" => widget = mount(&config, cache.clone()),
            "quit" => break,
            "" => continue,
            other => {
                eprintln!("unknown command '{}'\n{}", other, HELP);
                continue;
            }
        }
        print_widget(&widget)?;
    }

    Ok(())
}

fn mount(config: &ConsoleConfig, cache: Rc<SequenceCache>) -> AnswerWidget<MemoryView> {
    let host = Host::new(
        Box::new(BaseUrlHandlers::new(&config.base_url, &config.usage_id)),
        None,
    );
    AnswerWidget::mount(
        &config.usage_id,
        MemoryView::student_markup(""),
        host,
        Box::new(UreqTransport::new()),
        cache,
        MountOptions {
            labels: config.labels.clone(),
        },
    )
}

fn print_widget(widget: &AnswerWidget<MemoryView>) -> anyhow::Result<()> {
    let view = widget.view();
    let mut out = io::stdout().lock();

    writeln!(out, "---")?;
    writeln!(out, "answer:    {BOLD}{}{RESET}", view.answer_text())?;
    writeln!(out, "status:    {BOLD}{}{RESET}", widget.status().class_name())?;
    for (label, element) in [
        ("progress", Element::ProblemProgress),
        ("attempts", Element::UsedAttemptsFeedback),
        ("submitted", Element::SubmittedMessage),
        ("alert", Element::UserAlert),
        ("hint", Element::HintText),
    ] {
        let text = view.text(element);
        if !text.is_empty() {
            writeln!(out, "{:<10} {}", format!("{}:", label), text)?;
        }
    }
    if view.has_class(Element::SubmitButton, "nodisplay") {
        writeln!(out, "no attempts left")?;
    }
    if !view.has_class(Element::PeerPanel, freetext::widget::HIDDEN_CLASS)
        && view.is_visible(Element::PeerList)
    {
        for item in view.items(Element::PeerList) {
            writeln!(out, "  - {}", item.text)?;
        }
    }
    writeln!(out, "---")?;
    Ok(())
}
