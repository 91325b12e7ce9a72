//! End-to-end turns through the interactive app against the scripted backend.

use lg_client::mock::fixtures;
use lg_client::{MockConfig, MockResponse};
use lg_core::config::Config;
use lg_core::reducer::{GREETING_ID, TRANSPORT_FAILURE_TEXT};
use lg_core::repl::{App, ChatBackend, Command, Flow, TurnOutcome};
use lg_core::session::Session;
use lg_core::style::Style;
use lg_protocol::{MessageKind, PreviewKind};

fn app(mock: MockConfig, previews: bool, dir: &tempfile::TempDir) -> App {
    let mut config = Config::default();
    config.chat.session_id = Some("test-session".to_string());
    config.chat.previews = previews;
    let session = Session::init(dir.path().join("session.json"));
    App::new(
        &config,
        ChatBackend::Mock(mock),
        None,
        session,
        Style::disabled(),
    )
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn travel_turn_builds_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(fixtures::travel_demo(), true, &dir);

    let mut out = Vec::new();
    app.start(&mut out).await.unwrap();
    assert!(text(out).contains("Hi! I'm Sam, your travel planner."));

    let mut out = Vec::new();
    let outcome = app.run_turn("Plan a week in Rome", &mut out).await.unwrap();
    assert_eq!(outcome, TurnOutcome::Completed);

    let state = app.state();
    assert!(!state.loading);
    assert_eq!(state.messages[0].id, GREETING_ID);
    let kinds: Vec<_> = state.messages.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MessageKind::Agent,
            MessageKind::User,
            MessageKind::Agent,
            MessageKind::Transfer,
            MessageKind::Agent,
            MessageKind::Transfer,
            MessageKind::Agent,
        ]
    );
    assert_eq!(state.messages[4].agent.as_deref(), Some("Jenny"));
    assert_eq!(state.messages[6].agent.as_deref(), Some("Marcus"));
    assert_eq!(state.current_agent, "Marcus");

    let printed = text(out);
    assert!(printed.contains("LG204 to Rome [1]"));
    assert!(printed.contains("Albergo del Senato [2]"));
    assert!(!printed.contains("preview://"));
}

#[tokio::test]
async fn opening_previews() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(fixtures::travel_demo(), true, &dir);
    app.run_turn("Plan a week in Rome", &mut Vec::<u8>::new()).await.unwrap();

    let mut out = Vec::new();
    app.handle(Command::Open(1), &mut out).await.unwrap();
    let flight = text(out);
    assert!(flight.contains("Flight Details"));
    assert!(flight.contains("JFK → FCO"));
    assert!(flight.contains("Jun 12th, 2025 at 18:40"));
    assert_eq!(app.panel().current().unwrap().kind, PreviewKind::Flight);

    let mut out = Vec::new();
    app.handle(Command::Open(2), &mut out).await.unwrap();
    assert!(text(out).contains("$310"));
    assert_eq!(
        app.panel().current().unwrap().kind,
        PreviewKind::Accommodation
    );

    let mut out = Vec::new();
    app.handle(Command::Open(9), &mut out).await.unwrap();
    assert!(text(out).contains("No preview [9]"));
    assert_eq!(
        app.panel().current().unwrap().kind,
        PreviewKind::Accommodation
    );

    app.handle(Command::Close, &mut Vec::<u8>::new()).await.unwrap();
    assert!(app.panel().current().is_none());
}

#[tokio::test]
async fn previews_are_labels_without_tribune() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(fixtures::travel_demo(), false, &dir);
    assert!(!app.previews_enabled());

    let mut out = Vec::new();
    app.run_turn("Plan a week in Rome", &mut out).await.unwrap();
    let printed = text(out);
    assert!(printed.contains("LG204 to Rome."));
    assert!(!printed.contains("[1]"));

    let mut out = Vec::new();
    app.handle(Command::Open(1), &mut out).await.unwrap();
    assert!(text(out).contains("Tribune cardholder benefit"));
    assert!(app.panel().current().is_none());
}

#[tokio::test]
async fn disconnect_reports_transport_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mock = MockConfig::new().with_responses(vec![
        MockResponse::Text {
            content: "Looking".to_string(),
        },
        MockResponse::Disconnect {
            reason: "connection reset".to_string(),
        },
    ]);
    let mut app = app(mock, false, &dir);

    let mut out = Vec::new();
    let outcome = app.run_turn("hello", &mut out).await.unwrap();
    assert_eq!(outcome, TurnOutcome::Failed);

    let state = app.state();
    assert!(!state.loading);
    let last = state.messages.last().unwrap();
    assert_eq!(last.content, TRANSPORT_FAILURE_TEXT);
    assert!(text(out).contains(TRANSPORT_FAILURE_TEXT));
}

#[tokio::test]
async fn backend_error_event_is_shown() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(fixtures::error_mid_stream("Checking", "Rate limited"), false, &dir);

    let mut out = Vec::new();
    app.run_turn("hello", &mut out).await.unwrap();
    assert!(text(out).contains("Error: Rate limited"));
    assert!(!app.state().loading);
}

#[tokio::test]
async fn estimate_and_quit() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(MockConfig::new(), false, &dir);

    let mut out = Vec::new();
    let flow = app
        .handle(
            Command::Estimate {
                card: lg_protocol::CardSlug::Tribune,
                answers: Some([
                    "200000".to_string(),
                    "1000000".to_string(),
                    "30".to_string(),
                    "800".to_string(),
                ]),
            },
            &mut out,
        )
        .await
        .unwrap();
    assert_eq!(flow, Flow::Continue);
    assert!(text(out).contains("Your approval odds for Tribune: Highly Qualified"));

    let mut out = Vec::new();
    app.handle(
        Command::Estimate {
            card: lg_protocol::CardSlug::Tribune,
            answers: Some([
                "0".to_string(),
                "1000000".to_string(),
                "30".to_string(),
                "900".to_string(),
            ]),
        },
        &mut out,
    )
    .await
    .unwrap();
    let errors = text(out);
    assert!(errors.contains("Please enter a valid salary greater than 0"));
    assert!(errors.contains("Please enter a FICO score between 300 and 850"));

    let mut out = Vec::new();
    let login = Command::Login {
        username: "jdoe".to_string(),
        password: "x".to_string(),
    };
    app.handle(login, &mut out).await.unwrap();
    assert!(text(out).contains("unavailable in offline mode"));

    let flow = app.handle(Command::Quit, &mut Vec::<u8>::new()).await.unwrap();
    assert_eq!(flow, Flow::Quit);
}
