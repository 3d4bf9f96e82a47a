use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub model: String,
    pub modem_firmware: String,
    pub camera_firmware: String,
    pub last_update_time: DateTime<FixedOffset>,
    pub signal: Option<u8>,
    /// Always Celsius.
    pub temperature: Option<i64>,
    /// Best remaining cell, in percent.
    pub battery: Option<i64>,
    pub battery_type: Option<String>,
    /// Percentage of storage used.
    pub memory: Option<f64>,
    pub notifications: Option<Vec<String>>,
    pub owner: Option<String>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    pub photo_count: Option<i64>,
    pub photo_limit: Option<i64>,
    pub hd_photo_count: Option<i64>,
    pub hd_photo_limit: Option<i64>,
}

// Wire types for the login call
#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}
