//! Page components of the application.

pub mod home;

pub use home::HomePage;
