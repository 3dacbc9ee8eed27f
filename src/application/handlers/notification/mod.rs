//! Notification handlers.
//!
//! ## Commands
//! - Receiving provider notifications (verify, dispatch, deliver)

mod receive_notification;

pub use receive_notification::{
    ReceiveNotificationCommand, ReceiveNotificationHandler, ReceiveNotificationResult,
};
