pub mod platform_traits;
pub mod session_traits;
