pub mod notification_dispatcher;
pub mod queue;

pub use notification_dispatcher::{ChannelOutcome, DispatchReport, NotificationDispatcher};
pub use queue::{NotificationJob, NotificationQueue};
