use async_trait::async_trait;
use easytier_panel::status::{PollState, ServiceSupervisor, StatusLabel, StatusPoller};
use easytier_panel::StatusLookupError;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers from a fixed script, then an empty object forever
struct Scripted {
    answers: Mutex<VecDeque<Result<Value, StatusLookupError>>>,
}

impl Scripted {
    fn new(answers: Vec<Result<Value, StatusLookupError>>) -> Arc<Self> {
        Arc::new(Scripted {
            answers: Mutex::new(answers.into()),
        })
    }
}

#[async_trait]
impl ServiceSupervisor for Scripted {
    async fn list(&self, _service: &str) -> Result<Value, StatusLookupError> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

fn running(flag: bool) -> Result<Value, StatusLookupError> {
    Ok(json!({ "easytier": { "instances": { "instance1": { "running": flag } } } }))
}

fn poller(supervisor: Arc<Scripted>) -> StatusPoller {
    StatusPoller::new(supervisor, "easytier", "instance1", Duration::from_secs(5))
}

#[tokio::test]
async fn empty_answer_then_running() {
    let poller = poller(Scripted::new(vec![Ok(json!({})), running(true)]));

    assert_eq!(poller.tick().await, StatusLabel::NotRunning);
    assert_eq!(poller.state(), PollState::Failed);

    assert_eq!(poller.tick().await, StatusLabel::Running);
    assert_eq!(poller.label(), StatusLabel::Running);
    assert_eq!(poller.state(), PollState::Idle);
}

#[tokio::test]
async fn transport_errors_read_as_not_running() {
    let poller = poller(Scripted::new(vec![
        Err(StatusLookupError::Transport(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "ubus socket",
        ))),
        Ok(json!({ "easytier": "garbage" })),
        running(false),
    ]));

    assert_eq!(poller.tick().await, StatusLabel::NotRunning);
    assert_eq!(poller.state(), PollState::Failed);
    assert_eq!(poller.tick().await, StatusLabel::NotRunning);
    assert_eq!(poller.state(), PollState::Failed);
    assert_eq!(poller.tick().await, StatusLabel::NotRunning);
    assert_eq!(poller.state(), PollState::Idle);
}

#[tokio::test(start_paused = true)]
async fn timer_keeps_going_after_a_failed_tick() {
    let mut poller = poller(Scripted::new(vec![
        Err(StatusLookupError::Exit { code: Some(4) }),
        running(true),
    ]));
    let mut slot = poller.subscribe();
    assert_eq!(*slot.borrow_and_update(), StatusLabel::Collecting);

    poller.start();
    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow_and_update(), StatusLabel::NotRunning);

    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow_and_update(), StatusLabel::Running);

    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_publishing() {
    let poller = {
        let mut p = poller(Scripted::new(vec![running(true)]));
        p.start();
        p
    };
    let mut slot = poller.subscribe();
    slot.changed().await.unwrap();
    assert_eq!(*slot.borrow(), StatusLabel::Running);
    drop(poller);

    // the sender lives in the aborted task's probe and the dropped handle
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(slot.changed().await.is_err());
}
