//! Student Form Client
//!
//! Talks to a running Student Store over HTTP and carries the registration
//! form's client-side behavior: required-field checks, `dobWords`, photo
//! encoding and the registration-number default.

pub mod api;
pub mod dob;
pub mod error;
pub mod form;
pub mod photo;

pub use api::StudentClient;
pub use dob::date_to_words;
pub use error::{ClientError, ClientResult};
pub use form::{FieldKind, FormField, REGISTRATION_FORM, new_registration, set_dob, validate_form};
pub use photo::encode_photo;
