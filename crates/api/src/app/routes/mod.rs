pub mod clients;
pub mod companies;
pub mod mechanics;
pub mod system;
pub mod users;
