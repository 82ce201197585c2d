//! Realtime: Push updates arriving out of band.
//!
//! The channel carries two event types, `add` and `edit`, each with a post
//! payload. [`RealtimeIngestion`] applies each one as exactly one stream
//! prepend or replace while the channel is connected.
//!
//! There is no gap detection: if the transport reconnects on its own,
//! anything published in between is not replayed.

mod event;
mod ingestion;
mod transport;

pub use event::{RawEvent, RealtimeEvent, ADD_EVENT, EDIT_EVENT};
pub use ingestion::{ConnectionState, RealtimeIngestion};
pub use transport::{QueuePublisher, QueueTransport, RealtimeTransport, TransportPoll};
