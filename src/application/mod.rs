//! Application services: blog, booking, landing content and page assembly.

pub mod booking;
pub mod content;
pub mod error;
pub mod landing;
pub mod render;
pub mod site;
