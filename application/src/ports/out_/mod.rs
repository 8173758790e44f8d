mod notifier;

pub use notifier::RelayNotifier;
