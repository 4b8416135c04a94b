// User flow: input collection, the Landing → Input → Processing → Result
// state machine, and per-browser sessions around it.

pub mod controller;
pub mod handlers;
pub mod input;
pub mod session;
pub mod store;

pub use store::SessionStore;
