//! Page components

pub mod chat;
pub mod login;
