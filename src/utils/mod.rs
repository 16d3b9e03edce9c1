pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock};
pub mod url_validation;
pub use url_validation::{UrlValidationError, validate_service_url};
