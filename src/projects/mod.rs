pub mod broker;
pub mod channel;
pub mod project;

pub use broker::ProjectsBroker;
pub use channel::Channel;
pub use project::{Project, ProjectStatus};
