use vkinfo_core::{
    DiagnosticProvider, Notice, PLACEHOLDER_TEXT, ProviderError, SearchSession, SessionEvent,
    SessionState, StaticProvider,
};

const REPORT: &str = "Vulkan Version: 1.3.0
Layers:
Instance Extensions:
\tVK_KHR_surface (0.0.25)
\tVK_KHR_android_surface (0.0.6)
Physical Device Count: 1
Device Name: Adreno (TM) 650
";

struct FailingProvider;

impl DiagnosticProvider for FailingProvider {
    fn describe(&self) -> String {
        "failing".to_string()
    }

    fn fetch(&mut self) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable("no vulkan loader".to_string()))
    }
}

fn open() -> SearchSession<StaticProvider> {
    let (session, notice) = SearchSession::open(StaticProvider::new(REPORT));
    assert!(matches!(notice, Some(Notice::Refreshed { .. })));
    session
}

#[test]
fn test_initial_state_is_idle_and_provider_called_once() {
    let session = open();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.buffer(), REPORT);
    assert_eq!(session.provider().fetches(), 1);
    assert!(session.decorated().is_plain());
}

#[test]
fn test_submit_with_matches_highlights() {
    let mut session = open();
    let notice = session.handle(SessionEvent::Submit("vk_khr".to_string()));
    assert_eq!(notice, Some(Notice::MatchesFound(2)));
    assert_eq!(notice.unwrap().to_string(), "Matches found 2");
    assert_eq!(session.state(), SessionState::Highlighted);
    assert_eq!(session.match_count(), 2);
    assert_eq!(session.decorated().highlights().len(), 2);
    assert_eq!(session.current_match().map(|(i, _)| i), Some(0));
}

#[test]
fn test_submit_without_matches_raises_notice() {
    let mut session = open();
    let notice = session.handle(SessionEvent::Submit("xyz".to_string()));
    let Some(notice) = notice else {
        panic!("expected a notice");
    };
    assert!(notice.is_alert());
    assert_eq!(notice.to_string(), "No Match found");
    assert_eq!(session.state(), SessionState::NoMatch);
    assert_eq!(session.match_count(), 0);
    assert!(session.decorated().is_plain());
}

#[test]
fn test_failed_submit_after_success_clears_previous_highlight() {
    let mut session = open();
    session.submit("device");
    assert_eq!(session.state(), SessionState::Highlighted);

    session.submit("xyz");
    assert_eq!(session.state(), SessionState::NoMatch);
    assert!(session.decorated().is_plain());
}

#[test]
fn test_query_change_clears_highlight() {
    let mut session = open();
    session.submit("device");

    let notice = session.handle(SessionEvent::QueryChanged("devic".to_string()));
    assert_eq!(notice, Some(Notice::Cleared));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.query(), "devic");
    assert!(session.decorated().is_plain());
    assert!(session.matches().is_empty());

    // Nothing left to clear.
    assert_eq!(session.handle(SessionEvent::QueryChanged("dev".to_string())), None);
}

#[test]
fn test_query_change_leaves_no_match_state() {
    let mut session = open();
    session.submit("xyz");
    assert_eq!(session.handle(SessionEvent::QueryChanged("xy".to_string())), None);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_close_returns_to_idle() {
    let mut session = open();
    session.submit("surface");
    assert_eq!(session.handle(SessionEvent::Close), Some(Notice::Cleared));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.handle(SessionEvent::Close), None);
}

#[test]
fn test_clear_twice() {
    let mut session = open();
    session.submit("surface");

    session.clear();
    assert_eq!(session.match_count(), 0);
    assert!(session.decorated().is_plain());
    assert_eq!(session.decorated().text(), REPORT);

    session.clear();
    assert_eq!(session.match_count(), 0);
    assert!(session.decorated().is_plain());
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_refresh_invalidates_matches() {
    let mut session = open();
    session.submit("adreno");
    assert_eq!(session.state(), SessionState::Highlighted);

    session
        .provider_mut()
        .set_text("Vulkan Version: 1.3.1\nDevice Name: Mali-G78\n");
    let notice = session.handle(SessionEvent::Refresh);
    assert!(matches!(notice, Some(Notice::Refreshed { .. })));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.matches().is_empty());
    assert!(session.decorated().is_plain());
    assert!(session.buffer().contains("Mali-G78"));
    assert_eq!(session.provider().fetches(), 2);
}

#[test]
fn test_provider_failure_falls_back_to_placeholder() {
    let (session, notice) = SearchSession::open(FailingProvider);
    let Some(Notice::ProviderFailed(message)) = &notice else {
        panic!("expected ProviderFailed, got {notice:?}");
    };
    assert!(message.contains("no vulkan loader"));
    assert_eq!(session.buffer(), PLACEHOLDER_TEXT);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_match_navigation_wraps() {
    let mut session = open();
    session.submit("vk_khr");

    assert_eq!(
        session.handle(SessionEvent::NextMatch),
        Some(Notice::Focus { index: 1, count: 2 })
    );
    assert_eq!(
        session.handle(SessionEvent::NextMatch),
        Some(Notice::Focus { index: 0, count: 2 })
    );
    assert_eq!(
        session.handle(SessionEvent::PreviousMatch),
        Some(Notice::Focus { index: 1, count: 2 })
    );

    let (_, span) = session.current_match().unwrap();
    let current: Vec<_> = session
        .decorated()
        .segments()
        .into_iter()
        .filter(|s| s.emphasis.current)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!((current[0].start, current[0].end), (span.start, span.end));
}

#[test]
fn test_navigation_is_noop_when_not_highlighted() {
    let mut session = open();
    assert_eq!(session.handle(SessionEvent::NextMatch), None);
    session.submit("xyz");
    assert_eq!(session.handle(SessionEvent::PreviousMatch), None);
}

#[test]
fn test_empty_query_submit_is_no_match() {
    let mut session = open();
    let notice = session.handle(SessionEvent::Submit(String::new()));
    assert!(matches!(notice, Some(Notice::NoMatch { .. })));
    assert_eq!(session.match_count(), 0);
}
