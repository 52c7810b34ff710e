pub mod event;
pub mod mark;
pub mod subscription;

pub use event::{Event, Location};
pub use mark::{MarkKind, MarksCount};
pub use subscription::SubscriptionsCount;
