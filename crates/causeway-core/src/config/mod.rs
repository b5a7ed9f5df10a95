//! Configuration for the Causeway subscriber.

pub mod causeway_config;
pub mod stats_config;
pub mod subscriber_config;
pub mod wait_config;

pub use causeway_config::CausewayConfig;
pub use stats_config::StatsConfig;
pub use subscriber_config::SubscriberConfig;
pub use wait_config::WaitConfig;
