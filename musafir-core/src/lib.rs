pub mod error;
pub mod identity;

pub use error::{BookingError, NotifyError, StoreError};
pub use identity::{AuthenticatedUser, Role};

pub type CoreResult<T> = Result<T, BookingError>;
