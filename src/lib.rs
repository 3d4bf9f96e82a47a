//! Client for the Spypoint trail-camera cloud service.
//!
//! [`parse`] turns the service's loosely-shaped camera records into
//! [`Camera`] values; [`SpypointApi`] handles login and listing.

pub mod config;
pub mod errors;
pub mod net;
pub mod notification;
pub mod parse;
pub mod token;
pub mod types;

pub use config::Config;
pub use errors::{Error, ParseError, Result};
pub use net::SpypointApi;
pub use notification::Notification;
pub use parse::{parse_camera, parse_camera_with_offset, parse_cameras, parse_subscription};
pub use types::{Camera, Coordinates, Subscription};
