//! # Frame Client
//!
//! The fetch-and-present pipeline of a network photo frame.
//!
//! This crate provides:
//! - [`BackendClient`]: asks the backend for one page of image metadata and
//!   publishes loading/error state with change notifications
//! - [`ImageCollection`]: the ordered image list, replaced atomically on every
//!   successful fetch and exposed read-only through [`ImageListView`]
//! - [`Transport`]: the HTTP GET seam, with a reqwest implementation
//!
//! ## Threading
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Requests run as local
//! tasks, so the client must be driven from inside a `tokio::task::LocalSet`.
//! Only metadata is fetched; image bytes are left to the renderer.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use frame_client::{BackendClient, ClientConfig, ReqwestTransport, TransportConfig};
//!
//! let transport = ReqwestTransport::new(&TransportConfig::default())?;
//! let client = BackendClient::new(ClientConfig::default(), transport)?;
//!
//! let model = client.model();
//! model.on_reset(Box::new(|| println!("page replaced")));
//!
//! client.refresh();
//! client.settled().await;
//! ```

pub mod collection;
pub mod models;
pub mod response;
pub mod service;
pub mod signal;
pub mod transport;

pub use collection::{ImageCollection, ImageListView, OutOfRange};
pub use models::{FetchParameters, ImageRecord, Timestamp, KNOWN_ORDERINGS};
pub use response::{parse_images_response, FetchError, ImagePage};
pub use service::{BackendClient, ClientConfig, InvalidBaseUrl, WeakBackendClient};
pub use signal::ChangeSignal;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportConfig, TransportError};
