pub mod login_request;
pub mod profile_request;
pub mod register_request;

pub use login_request::LoginRequest;
pub use profile_request::UpdateProfileRequest;
pub use register_request::RegisterRequest;
