pub mod alert_engine;
pub mod notifier;

pub use alert_engine::AlertEngine;
pub use notifier::NotificationChannel;
