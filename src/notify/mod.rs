//! Report delivery
//!
//! The sampler hands finished reports to a [`Notifier`]. Slack incoming
//! webhooks are the production channel; without a webhook the report goes
//! to the log.

mod notifiers;

pub use notifiers::{LogNotifier, Notifier, SlackNotifier, SLACK_ACK};

#[cfg(test)]
mod tests;
