mod queue_status;
mod remote_config;

pub use queue_status::QueueStatus;
pub use remote_config::RemoteConfig;
