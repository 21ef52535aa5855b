//! Test doubles shared by the unit tests.

use crate::core::config::ClientConfig;
use crate::core::error::ApiError;
use crate::core::notify::{Notifier, ToastKind};
use crate::core::scheduler::{LocalTask, Spawner, VirtualScheduler};
use crate::core::store::AppStores;
use crate::features::columns::Confirm;
use crate::features::context::AppContext;
use crate::i18n::Localizer;
use crate::services::api::{ApiClient, ApiRequest, Method, RawResponse, Transport};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use subdeck_api_models::{Channel, Video};
use tokio::sync::oneshot;

enum Scripted {
    Ready(RawResponse),
    Fail(ApiError),
    Held(oneshot::Receiver<RawResponse>),
}

/// Transport answering from per-route scripts.
///
/// The last `Ready` response of a route is sticky; failures and held
/// responses are consumed once. Unscripted routes fail at the transport level.
#[derive(Default)]
pub(crate) struct FakeTransport {
    scripts: RefCell<HashMap<(Method, String), VecDeque<Scripted>>>,
    log: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn respond(&self, method: Method, path: &str, response: RawResponse) {
        self.push(method, path, Scripted::Ready(response));
    }

    pub(crate) fn fail(&self, method: Method, path: &str) {
        self.push(
            method,
            path,
            Scripted::Fail(ApiError::Transport("connection reset".into())),
        );
    }

    /// Park the next request on `path` until the returned sender fires.
    pub(crate) fn hold(&self, method: Method, path: &str) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Held(rx));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.log.borrow().clone()
    }

    pub(crate) fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.log
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .cloned()
            .collect()
    }

    fn push(&self, method: Method, path: &str, script: Scripted) {
        self.scripts
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(script);
    }

    fn next(&self, method: Method, path: &str) -> Option<Scripted> {
        let mut scripts = self.scripts.borrow_mut();
        let queue = scripts.get_mut(&(method, path.to_string()))?;
        match queue.front() {
            Some(Scripted::Ready(response)) if queue.len() == 1 => {
                Some(Scripted::Ready(response.clone()))
            }
            _ => queue.pop_front(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.log.borrow_mut().push(request.clone());
        match self.next(request.method, &request.path) {
            Some(Scripted::Ready(response)) => Ok(response),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Held(rx)) => rx
                .await
                .map_err(|_| ApiError::Transport("held response dropped".into())),
            None => Err(ApiError::Transport(format!(
                "no scripted response for {} {}",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}

/// Notifier that records every toast.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    toasts: RefCell<Vec<(String, ToastKind)>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.toasts.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    pub(crate) fn of_kind(&self, kind: ToastKind) -> Vec<String> {
        self.toasts
            .borrow()
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.of_kind(ToastKind::Error)
    }

    pub(crate) fn successes(&self) -> Vec<String> {
        self.of_kind(ToastKind::Success)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.toasts.borrow_mut().push((message.to_string(), kind));
    }
}

/// Confirmation gate with a fixed answer.
pub(crate) struct ScriptedConfirm {
    answer: bool,
    asked: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.answer
    }
}

pub(crate) fn envelope(data: Value) -> RawResponse {
    RawResponse {
        status: 200,
        body: json!({"success": true, "data": data}).to_string(),
    }
}

pub(crate) fn ok() -> RawResponse {
    RawResponse {
        status: 200,
        body: json!({"success": true}).to_string(),
    }
}

pub(crate) fn channel(id: i64, name: &str, position: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "color": "#ff0000",
        "order_position": position,
        "stats": {"unwatched_videos": 0}
    })
}

pub(crate) fn video(id: i64, watched: bool) -> Value {
    video_with(id, &format!("Video {id}"), id.unsigned_abs() * 100, watched)
}

pub(crate) fn video_with(id: i64, title: &str, views: u64, watched: bool) -> Value {
    json!({
        "id": id,
        "youtube_video_id": format!("yt{id}"),
        "title": title,
        "channel_name": "Uploader",
        "published_at": format!("2024-01-{:02}T10:00:00Z", (id % 28) + 1),
        "duration": 60 + id,
        "view_count": views,
        "is_watched": u8::from(watched)
    })
}

pub(crate) fn typed_channel(id: i64, name: &str, position: i64) -> Channel {
    serde_json::from_value(channel(id, name, position)).expect("channel fixture")
}

pub(crate) fn typed_video(id: i64, title: &str, views: u64, watched: bool) -> Video {
    serde_json::from_value(video_with(id, title, views, watched)).expect("video fixture")
}

/// Spawner that queues tasks until the test drains them.
#[derive(Default)]
pub(crate) struct QueuedSpawner {
    queue: RefCell<VecDeque<LocalTask>>,
}

impl QueuedSpawner {
    pub(crate) fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued tasks, including ones they spawn, to completion.
    pub(crate) async fn drain(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl Spawner for QueuedSpawner {
    fn spawn(&self, task: LocalTask) {
        self.queue.borrow_mut().push_back(task);
    }
}

/// Fully wired context over fakes.
pub(crate) struct Harness {
    pub(crate) transport: Rc<FakeTransport>,
    pub(crate) notifier: Rc<RecordingNotifier>,
    pub(crate) scheduler: VirtualScheduler,
    pub(crate) spawner: Rc<QueuedSpawner>,
    pub(crate) confirm: Rc<ScriptedConfirm>,
    pub(crate) ctx: AppContext,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_confirm(true)
    }

    pub(crate) fn with_confirm(answer: bool) -> Self {
        let transport = Rc::new(FakeTransport::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let scheduler = VirtualScheduler::new();
        let spawner = Rc::new(QueuedSpawner::default());
        let confirm = Rc::new(ScriptedConfirm::answering(answer));
        let stores = AppStores::default();
        let ctx = AppContext {
            config: ClientConfig::default(),
            api: ApiClient::new(transport.clone(), notifier.clone()),
            notifier: notifier.clone(),
            scheduler: Rc::new(scheduler.clone()),
            spawner: spawner.clone(),
            confirm: confirm.clone(),
            i18n: Rc::new(Localizer::new(stores.context())),
            stores,
        };
        Self {
            transport,
            notifier,
            scheduler,
            spawner,
            confirm,
            ctx,
        }
    }
}
