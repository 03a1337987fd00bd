/// GPS and G-sensor samples
use serde::{Deserialize, Serialize};

/// GPS fix at a point in the recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Speed in km/h, when the recorder logs it
    pub speed_kmh: Option<f64>,

    /// Heading in degrees from north, when the recorder logs it
    pub heading: Option<f64>,
}

/// Three-axis acceleration in g
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelerationSample {
    /// Vector magnitude
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}
