//! Newsletter subscription handlers.

mod confirm_subscription;
mod subscribe;

pub use confirm_subscription::{
    ConfirmSubscriptionHandler, SubscriptionTokenCommand, UnsubscribeHandler,
};
pub use subscribe::{SubscribeCommand, SubscribeHandler, SubscribeResult};
