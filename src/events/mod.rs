//! # Events Module
//!
//! Event-driven progress reporting for intake requests.
//!
//! ## Design
//! The core library emits events through channels, allowing any observer
//! (audit trail, admin dashboard bridge, metrics) to subscribe without
//! coupling to the workflow.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Batch(BatchEvent::FileDuplicate { index, reason }) => {
//!                 println!("file {} rejected: {}", index, reason)
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
