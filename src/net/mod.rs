//! Network resources usable as boundaries.
//!
//! # Data Flow
//! ```text
//! ListenerResource (listener.rs):
//!     init → bind TcpListener → spawn accept loop (bounded by semaphore)
//!     close → stop accept loop → drop listener
//!
//! UpstreamResource (upstream.rs):
//!     init → connect with timeout (fails while the upstream is down)
//!     close → shut the stream down
//! ```
//!
//! # Design Decisions
//! - Resources only implement the hooks; status lives in the boundary wrapper
//! - The upstream resource is meant to be wrapped in an auto-recovering boundary

pub mod listener;
pub mod upstream;

pub use listener::{Listener, ListenerResource};
pub use upstream::UpstreamResource;
