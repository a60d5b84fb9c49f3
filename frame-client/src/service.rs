use crate::collection::{ImageCollection, ImageListView};
use crate::models::FetchParameters;
use crate::response::{parse_images_response, FetchError, ImagePage};
use crate::signal::ChangeSignal;
use crate::transport::{HttpResponse, Transport, TransportError};
use reqwest::Url;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tokio::task::JoinHandle;

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port of the photo frame backend, optionally with a
    /// path prefix; `/images` is appended to it
    pub base_url: String,
    /// Initial request parameters
    pub parameters: FetchParameters,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            parameters: FetchParameters::default(),
        }
    }
}

/// Rejected base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseUrl {
    pub url: String,
    pub reason: String,
}

impl std::fmt::Display for InvalidBaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid backend URL '{}': {}", self.url, self.reason)
    }
}

impl std::error::Error for InvalidBaseUrl {}

/// Resolve `<base>/images` once, keeping any path prefix of the base
pub fn images_endpoint(base_url: &str) -> Result<Url, InvalidBaseUrl> {
    let invalid = |reason: String| InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .push("images");
    Ok(url)
}

/// Build the request URL for one page
pub fn request_url(endpoint: &Url, parameters: &FetchParameters) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("count", &parameters.count.to_string())
        .append_pair("ordering", &parameters.ordering);
    url
}

#[derive(Debug, Default)]
struct ClientState {
    parameters: FetchParameters,
    is_loading: bool,
    error: String,
    total_count: usize,
}

#[derive(Debug, Default)]
struct Signals {
    is_loading: ChangeSignal,
    error: ChangeSignal,
    ordering: ChangeSignal,
    count: ChangeSignal,
    total_count: ChangeSignal,
}

struct ClientInner<T> {
    endpoint: Url,
    transport: T,
    model: Rc<ImageCollection>,
    state: RefCell<ClientState>,
    signals: Signals,
    in_flight: RefCell<Option<JoinHandle<()>>>,
}

/// Photo frame backend client.
///
/// Owns the request parameters and the image list. `refresh()` returns
/// immediately; the request runs as a local task (`tokio::task::spawn_local`)
/// on the caller's `LocalSet`, and its outcome is applied on that same thread.
/// At most one request is in flight: a refresh while loading is dropped.
///
/// Clones are handles to the same client.
pub struct BackendClient<T: Transport + 'static> {
    inner: Rc<ClientInner<T>>,
}

impl<T: Transport + 'static> Clone for BackendClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Non-owning handle to a [`BackendClient`], for listeners registered on
/// the client itself
pub struct WeakBackendClient<T: Transport + 'static> {
    inner: Weak<ClientInner<T>>,
}

impl<T: Transport + 'static> Clone for WeakBackendClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: Transport + 'static> WeakBackendClient<T> {
    pub fn upgrade(&self) -> Option<BackendClient<T>> {
        self.inner.upgrade().map(|inner| BackendClient { inner })
    }
}

impl<T: Transport + 'static> BackendClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, InvalidBaseUrl> {
        let endpoint = images_endpoint(&config.base_url)?;
        log::info!("Photo frame backend endpoint: {}", endpoint);

        Ok(Self {
            inner: Rc::new(ClientInner {
                endpoint,
                transport,
                model: Rc::new(ImageCollection::new()),
                state: RefCell::new(ClientState {
                    parameters: config.parameters,
                    ..ClientState::default()
                }),
                signals: Signals::default(),
                in_flight: RefCell::new(None),
            }),
        })
    }

    pub fn downgrade(&self) -> WeakBackendClient<T> {
        WeakBackendClient {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Read-only view of the image list; the same list for the client's lifetime
    pub fn model(&self) -> Rc<dyn ImageListView> {
        self.inner.model.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    /// Last fetch failure, empty when the last fetch succeeded or is running
    pub fn error(&self) -> String {
        self.inner.state.borrow().error.clone()
    }

    pub fn ordering(&self) -> String {
        self.inner.state.borrow().parameters.ordering.clone()
    }

    pub fn count(&self) -> u32 {
        self.inner.state.borrow().parameters.count
    }

    /// Number of images the backend reports in total
    pub fn total_count(&self) -> usize {
        self.inner.state.borrow().total_count
    }

    pub fn on_is_loading_changed(&self, listener: impl Fn() + 'static) {
        self.inner.signals.is_loading.connect(listener);
    }

    pub fn on_error_changed(&self, listener: impl Fn() + 'static) {
        self.inner.signals.error.connect(listener);
    }

    pub fn on_ordering_changed(&self, listener: impl Fn() + 'static) {
        self.inner.signals.ordering.connect(listener);
    }

    pub fn on_count_changed(&self, listener: impl Fn() + 'static) {
        self.inner.signals.count.connect(listener);
    }

    pub fn on_total_count_changed(&self, listener: impl Fn() + 'static) {
        self.inner.signals.total_count.connect(listener);
    }

    /// Change the sort mode and refetch. The value is sent verbatim.
    ///
    /// # Panics
    ///
    /// Panics if a refetch is due and the caller is not inside a
    /// `tokio::task::LocalSet`.
    pub fn set_ordering(&self, ordering: &str) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.parameters.ordering == ordering {
                return;
            }
            state.parameters.ordering = ordering.to_string();
        }
        self.inner.signals.ordering.emit();
        self.refresh();
    }

    /// Change the page size and refetch. Zero is rejected.
    ///
    /// # Panics
    ///
    /// Panics if a refetch is due and the caller is not inside a
    /// `tokio::task::LocalSet`.
    pub fn set_count(&self, count: u32) {
        if count == 0 {
            log::warn!("Ignoring page size of 0");
            return;
        }
        {
            let mut state = self.inner.state.borrow_mut();
            if state.parameters.count == count {
                return;
            }
            state.parameters.count = count;
        }
        self.inner.signals.count.emit();
        self.refresh();
    }

    /// Start a fetch unless one is already running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`. The client stays
    /// idle in that case.
    pub fn refresh(&self) {
        self.fetch_images();
    }

    /// Wait until the request in flight, if any, has been applied
    pub async fn settled(&self) {
        loop {
            let handle = self.inner.in_flight.borrow_mut().take();
            let Some(handle) = handle else {
                break;
            };
            if let Err(e) = handle.await {
                log::error!("Image fetch task failed: {}", e);
            }
        }
    }

    fn fetch_images(&self) {
        let url = {
            let state = self.inner.state.borrow();
            if state.is_loading {
                log::debug!("Fetch already in flight, dropping refresh");
                return;
            }
            request_url(&self.inner.endpoint, &state.parameters)
        };

        log::debug!("Fetching images from {}", url);
        // The task cannot run before this function returns, so the state
        // below is in place before the response is applied.
        let inner = Rc::clone(&self.inner);
        let handle = tokio::task::spawn_local(async move {
            let response = inner.transport.get(&url).await;
            inner.finish(response);
        });
        *self.inner.in_flight.borrow_mut() = Some(handle);

        {
            let mut state = self.inner.state.borrow_mut();
            state.is_loading = true;
            state.error.clear();
        }
        self.inner.signals.is_loading.emit();
        self.inner.signals.error.emit();
    }
}

impl<T> ClientInner<T> {
    fn finish(&self, response: Result<HttpResponse, TransportError>) {
        let outcome = response
            .map_err(FetchError::from)
            .and_then(|response| parse_images_response(&response));

        match outcome {
            Ok(page) => self.apply_page(page),
            Err(err) => self.apply_failure(err),
        }
    }

    fn apply_page(&self, page: ImagePage) {
        let loaded = page.images.len();
        let total = page.total_count.unwrap_or(loaded);

        self.model.replace_all(page.images);

        let total_changed = {
            let mut state = self.state.borrow_mut();
            state.is_loading = false;
            let changed = state.total_count != total;
            state.total_count = total;
            changed
        };
        self.signals.is_loading.emit();
        if total_changed {
            self.signals.total_count.emit();
        }

        log::info!("Loaded {} images ({} available)", loaded, total);
    }

    fn apply_failure(&self, err: FetchError) {
        log::warn!("Image fetch failed: {}", err);
        {
            let mut state = self.state.borrow_mut();
            state.is_loading = false;
            state.error = err.to_string();
        }
        // Error first: an is_loading listener may start the next fetch,
        // which clears the message again
        self.signals.error.emit();
        self.signals.is_loading.emit();
    }
}
