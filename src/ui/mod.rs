//! Screen pieces shared by the recorder and the calculator.

pub mod error;
pub mod toast;

pub use error::{report_fatal, ErrorScreen};
pub use toast::Toast;
