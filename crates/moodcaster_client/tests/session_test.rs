use async_trait::async_trait;
use chrono::NaiveDate;
use moodcaster_client::{
    ClientError, ComposeOutcome, GenerateTransport, HostCapability, HostError, HostSdk,
    HttpTransport, InMemoryDayRecords, Notifier, Orchestrator, PostOutcome, RetryPolicy, Session,
    Step, Task, TaskLedger, TransportResponse, UserNotice,
};
use moodcaster_core::{CastPrompt, Category, GenerationRequest, Mood, SamplingProfile};
use moodcaster_models::{ChatBackend, UpstreamError, UpstreamReply};
use moodcaster_server::{AppState, EndpointConfig, create_router};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<UserNotice>>,
}

impl RecordingNotifier {
    fn notices(&self) -> Vec<UserNotice> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: UserNotice) {
        self.notices.lock().push(notice);
    }
}

struct InHost {
    compose: ComposeOutcome,
}

#[async_trait]
impl HostSdk for InHost {
    async fn capabilities(&self) -> Result<Vec<HostCapability>, HostError> {
        Ok(vec![HostCapability::ComposeCast])
    }

    async fn is_in_host(&self) -> bool {
        true
    }

    async fn ready(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn compose_cast(&self, _text: &str) -> Result<ComposeOutcome, HostError> {
        Ok(self.compose)
    }

    async fn open_url(&self, _url: &str) -> Result<(), HostError> {
        Ok(())
    }

    async fn notify_success(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn add_mini_app(&self) -> Result<(), HostError> {
        Ok(())
    }
}

/// Host that supports no capabilities at all.
struct BareHost;

#[async_trait]
impl HostSdk for BareHost {
    async fn capabilities(&self) -> Result<Vec<HostCapability>, HostError> {
        Ok(Vec::new())
    }

    async fn is_in_host(&self) -> bool {
        false
    }

    async fn ready(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn compose_cast(&self, _text: &str) -> Result<ComposeOutcome, HostError> {
        Ok(ComposeOutcome::Cancelled)
    }

    async fn open_url(&self, _url: &str) -> Result<(), HostError> {
        Ok(())
    }

    async fn notify_success(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn add_mini_app(&self) -> Result<(), HostError> {
        Ok(())
    }
}

struct FixedBackend(&'static str);

#[async_trait]
impl ChatBackend for FixedBackend {
    async fn generate(
        &self,
        _prompt: &CastPrompt,
        _sampling: &SamplingProfile,
    ) -> Result<UpstreamReply, UpstreamError> {
        let body = serde_json::json!({"choices": [{"message": {"content": self.0}}]});
        UpstreamReply::decode(Some("application/json"), &body.to_string())
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

/// Never answers the first request, then replies with a fixed draft.
#[derive(Default)]
struct StallsOnce {
    calls: AtomicU32,
}

#[async_trait]
impl GenerateTransport for StallsOnce {
    async fn send(&self, _request: &GenerationRequest) -> Result<TransportResponse, ClientError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::future::pending::<()>().await;
        }
        Ok(TransportResponse {
            status: 200,
            reason: "OK".to_string(),
            content_type: Some("application/json".to_string()),
            body: r#"{"text":"Second try lands"}"#.to_string(),
        })
    }
}

async fn spawn_endpoint(backend: Option<Arc<dyn ChatBackend>>) -> String {
    let config = EndpointConfig::builder().build().unwrap();
    let app = create_router(AppState::new(config, backend));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn session_with<T: GenerateTransport>(
    transport: T,
    compose: ComposeOutcome,
    notifier: Arc<RecordingNotifier>,
) -> Session<T, InMemoryDayRecords> {
    Session::new(
        Orchestrator::new(transport, RetryPolicy::none()),
        Arc::new(InHost { compose }),
        TaskLedger::new(InMemoryDayRecords::new(), today()),
        notifier,
    )
}

#[tokio::test]
async fn test_end_to_end_draft_matches_upstream_text() {
    let endpoint =
        spawn_endpoint(Some(Arc::new(FixedBackend("Feeling centered this morning ☀️")))).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new(endpoint, Duration::from_secs(5)),
        ComposeOutcome::Posted,
        notifier.clone(),
    );

    session.start().await;
    assert!(session.in_host());
    assert_eq!(session.step(), Step::Mood);

    session.select_mood(Mood::Calm);
    session.select_category(Category::GoodMorning);
    assert!(session.can_generate());

    assert!(session.generate().await);
    assert_eq!(session.draft(), "Feeling centered this morning ☀️");
    assert_eq!(session.step(), Step::Preview);
    assert!(notifier.notices().is_empty());

    let outcome = session.post().await;
    assert_eq!(outcome, Some(PostOutcome::Composed));
    assert_eq!(notifier.notices(), vec![UserNotice::Posted]);

    let record = session.ledger().ensure_today().unwrap();
    assert!(record.is_done(Task::Checkin));
    assert!(record.is_done(Task::Generate));
    assert!(record.is_done(Task::Post));
    assert_eq!(record.posted_count, 1);
    assert_eq!(session.ledger().today_points().unwrap(), 35);
}

#[tokio::test]
async fn test_endpoint_error_becomes_notice_and_keeps_draft() {
    let endpoint = spawn_endpoint(None).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new(endpoint, Duration::from_secs(5)),
        ComposeOutcome::Posted,
        notifier.clone(),
    );

    session.select_mood(Mood::Focused);
    session.select_category(Category::Productivity);
    session.edit_draft("my own words");

    assert!(!session.generate().await);
    assert_eq!(session.draft(), "my own words");
    assert_eq!(
        notifier.notices(),
        vec![UserNotice::Rejected("Missing GROQ_API_KEY".to_string())]
    );
    assert!(!session.ledger().ensure_today().unwrap().is_done(Task::Generate));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_generic_failure() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new("http://127.0.0.1:1", Duration::from_secs(5)),
        ComposeOutcome::Posted,
        notifier.clone(),
    );

    session.select_mood(Mood::Curious);
    session.select_category(Category::FunFact);

    assert!(!session.generate().await);
    assert_eq!(notifier.notices(), vec![UserNotice::GenerationFailed]);
}

#[tokio::test]
async fn test_generate_refused_without_selection() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new("http://127.0.0.1:1", Duration::from_secs(5)),
        ComposeOutcome::Posted,
        notifier.clone(),
    );

    assert!(!session.can_generate());
    assert!(!session.generate().await);

    session.select_mood(Mood::Happy);
    assert!(!session.generate().await);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_selection_changes_clear_state() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new("http://127.0.0.1:1", Duration::from_secs(5)),
        ComposeOutcome::Posted,
        notifier,
    );

    session.select_category(Category::Meme);
    assert_eq!(session.category(), None);

    session.select_mood(Mood::Grateful);
    session.select_category(Category::Meme);
    session.edit_draft("draft");
    session.select_category(Category::Wellness);
    assert_eq!(session.draft(), "");
    assert_eq!(session.category(), Some(Category::Wellness));

    session.edit_draft("draft");
    session.select_mood(Mood::Motivated);
    assert_eq!(session.category(), None);
    assert_eq!(session.draft(), "");
    assert_eq!(session.step(), Step::Category);

    session.edit_draft("x".repeat(281));
    assert!(session.is_over_limit());
    session.reset_draft();
    assert_eq!(session.char_count(), 0);
}

#[tokio::test]
async fn test_post_with_empty_draft_raises_notice() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new("http://127.0.0.1:1", Duration::from_secs(5)),
        ComposeOutcome::Posted,
        notifier.clone(),
    );
    session.start().await;

    assert_eq!(session.post().await, None);
    assert_eq!(notifier.notices(), vec![UserNotice::EmptyCast]);
}

#[tokio::test]
async fn test_cancelled_post_is_not_counted() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(
        HttpTransport::new("http://127.0.0.1:1", Duration::from_secs(5)),
        ComposeOutcome::Cancelled,
        notifier.clone(),
    );
    session.start().await;
    session.edit_draft("gm");

    assert_eq!(session.post().await, Some(PostOutcome::Cancelled));
    let record = session.ledger().ensure_today().unwrap();
    assert_eq!(record.posted_count, 0);
    assert!(!record.is_done(Task::Post));
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_abandoned_generate_leaves_session_usable() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = session_with(StallsOnce::default(), ComposeOutcome::Posted, notifier.clone());
    session.select_mood(Mood::Focused);
    session.select_category(Category::Productivity);

    let abandoned = tokio::time::timeout(Duration::from_millis(10), session.generate()).await;
    assert!(abandoned.is_err());
    assert!(!session.is_loading());
    assert!(session.can_generate());

    assert!(session.generate().await);
    assert_eq!(session.draft(), "Second try lands");
    assert_eq!(session.step(), Step::Preview);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_unopened_composer_link_is_not_counted() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut session = Session::new(
        Orchestrator::new(StallsOnce::default(), RetryPolicy::none()),
        Arc::new(BareHost),
        TaskLedger::new(InMemoryDayRecords::new(), today()),
        notifier.clone(),
    );
    session.start().await;
    session.edit_draft("gm from the terminal");

    let outcome = session.post().await;

    assert!(matches!(outcome, Some(PostOutcome::ComposerLink { .. })));
    let record = session.ledger().ensure_today().unwrap();
    assert_eq!(record.posted_count, 0);
    assert!(!record.is_done(Task::Post));
    assert!(notifier.notices().is_empty());
}
