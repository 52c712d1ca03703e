//! # Mock Collections & Testing Guide
//!
//! `MockCollection<T>` hands out a real `CollectionClient<T>` whose requests are answered
//! from a queue of scripted expectations instead of a running collection. It makes failure
//! injection trivial: any single read or write in a multi-step workflow can be made to fail,
//! and `verify()` proves that no request outside the script was issued.
//!
//! ## When to use Mocks vs Real Collections
//!
//! | Feature | MockCollection | CollectionActor |
//! |---------|----------------|-----------------|
//! | **State** | None (scripted replies) | Real in-memory store |
//! | **Failure injection** | Any call, any error | Only what the data allows |
//! | **Proving "no write happened"** | `verify()` fails on extra calls | Inspect state afterwards |
//! | **Use case** | Step-ordering and partial-failure tests | End-to-end behaviour |
//!
//! ## Example
//!
//! ```rust
//! use doc_store::mock::MockCollection;
//! use doc_store::{Document, StoreError};
//!
//! #[derive(Clone, Debug, PartialEq)] struct Note { id: u32, text: String }
//! #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
//!
//! impl Document for Note {
//!     type Id = u32; type Create = String; type Update = String;
//!     type Action = (); type ActionResult = (); type SortKey = u32; type Error = NoteError;
//!     fn from_create_params(id: u32, text: String) -> Result<Self, NoteError> { Ok(Self { id, text }) }
//!     fn sort_key(&self) -> u32 { self.id }
//!     fn apply_update(&mut self, text: String) -> Result<(), NoteError> { self.text = text; Ok(()) }
//!     fn handle_action(&mut self, _: ()) -> Result<(), NoteError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockCollection::<Note>::new();
//!     mock.expect_get(1).return_ok(Some(Note { id: 1, text: "draft".into() }));
//!     mock.expect_update(1)
//!         .matching(|text: &String| text == "final")
//!         .return_err(StoreError::Unavailable("connection reset".into()));
//!
//!     let client = mock.client();
//!     assert!(client.get(1).await.unwrap().is_some());
//!     let result = client.update(1, "final".into()).await;
//!     assert!(matches!(result, Err(StoreError::Unavailable(_))));
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Low-level helpers
//!
//! [`create_mock_client`] returns a client plus the raw request receiver, for tests that
//! want to inspect a payload and answer by hand (see [`expect_get`], [`expect_action`]).

use crate::client::CollectionClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

type Matcher<P> = Box<dyn Fn(&P) -> bool + Send>;
type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// One scripted request/reply pair.
enum Expectation<T: Document> {
    Create {
        matcher: Option<Matcher<T::Create>>,
        response: Result<T, StoreError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, StoreError>,
    },
    List {
        response: Result<Vec<T>, StoreError>,
    },
    Update {
        id: T::Id,
        matcher: Option<Matcher<T::Update>>,
        response: Result<T, StoreError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), StoreError>,
    },
    Action {
        id: T::Id,
        matcher: Option<Matcher<T::Action>>,
        response: Result<T::ActionResult, StoreError>,
    },
}

impl<T: Document> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Create { .. } => "create".to_string(),
            Expectation::Get { id, .. } => format!("get {id}"),
            Expectation::List { .. } => "list".to_string(),
            Expectation::Update { id, .. } => format!("update {id}"),
            Expectation::Delete { id, .. } => format!("delete {id}"),
            Expectation::Action { id, .. } => format!("action {id}"),
        }
    }
}

fn describe_request<T: Document>(request: &CollectionRequest<T>) -> String {
    match request.target() {
        Some(id) => format!("{} {id}", request.kind()),
        None => request.kind().to_string(),
    }
}

fn matches<P>(matcher: &Option<Matcher<P>>, payload: &P) -> bool {
    matcher.as_ref().is_none_or(|m| m(payload))
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Answers one request from one expectation.
///
/// A mismatch is written to `unexpected` before the reply channel is dropped, so by the
/// time the caller observes `StoreError::Dropped` the problem is already recorded.
fn answer<T: Document>(
    request: CollectionRequest<T>,
    expectation: Expectation<T>,
    unexpected: &Mutex<Vec<String>>,
) {
    let mismatch = format!(
        "got {} while expecting {}",
        describe_request(&request),
        expectation.describe()
    );
    match (request, expectation) {
        (
            CollectionRequest::Create { params, respond_to },
            Expectation::Create { matcher, response },
        ) if matches(&matcher, &params) => {
            let _ = respond_to.send(response);
        }
        (
            CollectionRequest::Get { id, respond_to },
            Expectation::Get {
                id: expected,
                response,
            },
        ) if id == expected => {
            let _ = respond_to.send(response);
        }
        (CollectionRequest::List { respond_to, .. }, Expectation::List { response }) => {
            let _ = respond_to.send(response);
        }
        (
            CollectionRequest::Update {
                id,
                update,
                respond_to,
            },
            Expectation::Update {
                id: expected,
                matcher,
                response,
            },
        ) if id == expected && matches(&matcher, &update) => {
            let _ = respond_to.send(response);
        }
        (
            CollectionRequest::Delete { id, respond_to },
            Expectation::Delete {
                id: expected,
                response,
            },
        ) if id == expected => {
            let _ = respond_to.send(response);
        }
        (
            CollectionRequest::Action {
                id,
                action,
                respond_to,
            },
            Expectation::Action {
                id: expected,
                matcher,
                response,
            },
        ) if id == expected && matches(&matcher, &action) => {
            let _ = respond_to.send(response);
        }
        _ => lock(unexpected).push(mismatch),
    }
}

/// A scripted stand-in for a collection.
///
/// Expectations are consumed in order. A request that arrives with no expectation left,
/// or that does not match the next one (kind, id, or payload matcher), is recorded and
/// reported by [`MockCollection::verify`].
pub struct MockCollection<T: Document> {
    client: CollectionClient<T>,
    expectations: Queue<T>,
    unexpected: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Document> Default for MockCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> MockCollection<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let unexpected = Arc::new(Mutex::new(Vec::new()));

        let queue = expectations.clone();
        let log = unexpected.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = lock(&queue).pop_front();
                match next {
                    Some(expectation) => answer(request, expectation, &log),
                    None => {
                        lock(&log).push(format!("unexpected {}", describe_request(&request)));
                        drop(request);
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> CollectionClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> Expect<T, T::Create, T> {
        Expect::new(&self.expectations, |matcher, response| {
            Expectation::Create { matcher, response }
        })
    }

    pub fn expect_get(&mut self, id: T::Id) -> Expect<T, (), Option<T>> {
        Expect::new(&self.expectations, move |_, response| Expectation::Get {
            id,
            response,
        })
    }

    pub fn expect_list(&mut self) -> Expect<T, (), Vec<T>> {
        Expect::new(&self.expectations, |_, response| Expectation::List {
            response,
        })
    }

    pub fn expect_update(&mut self, id: T::Id) -> Expect<T, T::Update, T> {
        Expect::new(&self.expectations, move |matcher, response| {
            Expectation::Update {
                id,
                matcher,
                response,
            }
        })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> Expect<T, (), ()> {
        Expect::new(&self.expectations, move |_, response| Expectation::Delete {
            id,
            response,
        })
    }

    pub fn expect_action(&mut self, id: T::Id) -> Expect<T, T::Action, T::ActionResult> {
        Expect::new(&self.expectations, move |matcher, response| {
            Expectation::Action {
                id,
                matcher,
                response,
            }
        })
    }

    /// Panics unless every expectation was consumed and no unexpected request arrived.
    pub fn verify(&self) {
        let unexpected = lock(&self.unexpected);
        if !unexpected.is_empty() {
            panic!("Unexpected requests: {}", unexpected.join("; "));
        }
        let remaining = lock(&self.expectations);
        if !remaining.is_empty() {
            let pending: Vec<String> = remaining.iter().map(Expectation::describe).collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                remaining.len(),
                pending.join(", ")
            );
        }
    }
}

/// Builder for one expectation.
///
/// `P` is the request payload the optional matcher inspects; `R` is the reply type.
pub struct Expect<T: Document, P, R> {
    expectations: Queue<T>,
    matcher: Option<Matcher<P>>,
    build: Box<dyn FnOnce(Option<Matcher<P>>, Result<R, StoreError>) -> Expectation<T> + Send>,
    _reply: PhantomData<fn() -> R>,
}

impl<T: Document, P, R> Expect<T, P, R> {
    fn new(
        expectations: &Queue<T>,
        build: impl FnOnce(Option<Matcher<P>>, Result<R, StoreError>) -> Expectation<T>
            + Send
            + 'static,
    ) -> Self {
        Self {
            expectations: expectations.clone(),
            matcher: None,
            build: Box::new(build),
            _reply: PhantomData,
        }
    }

    /// Only accept a request whose payload satisfies `matcher`.
    pub fn matching(mut self, matcher: impl Fn(&P) -> bool + Send + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    /// Reply with a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Reply with an error.
    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.build)(self.matcher, response);
        lock(&self.expectations).push_back(expectation);
    }
}

// =============================================================================
// LOW-LEVEL HELPERS
// =============================================================================

/// Creates a client and the raw receiver its requests arrive on.
///
/// Useful when a test needs to look at a request payload before deciding how to answer.
/// Consider [`MockCollection`] for the fluent API.
pub fn create_mock_client<T: Document>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is a Get.
pub async fn expect_get<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, StoreError>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is an Action.
pub async fn expect_action<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, StoreError>>,
)> {
    match receiver.recv().await {
        Some(CollectionRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
