//! Subscription lifecycle: listener, teardown guard and output stream.

mod listener;
mod stream;
mod subscription;

pub(crate) use listener::StateListener;
pub use stream::StateStream;
pub use subscription::{Subscription, try_to_unregister};
