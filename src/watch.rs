//! Watch runtime: change sources, collaborator hooks, and the serialized daemon.

mod events;
mod hooks;
mod runtime;
mod source;

pub use events::{change_channel, convert_event};
pub use hooks::{ContentLoader, NoopHooks, RootCollection};
pub use runtime::{EventListener, NavigatorDaemon};
pub use source::{ChangeSource, NotifyChangeSource};
