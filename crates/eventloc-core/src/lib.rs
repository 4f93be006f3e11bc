pub mod app_config;
pub mod config;
pub mod events;
pub mod location;
pub mod manual;
pub mod normalize;
pub mod validation;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use events::{EventInput, NewEvent};
pub use location::{AddressComponent, CanonicalLocation, PlaceCandidate, PlaceDetails};
pub use manual::{
    build_manual_location, check_coordinates, parse_coordinate, ManualAddress, ManualLocationInput,
};
pub use normalize::{canonical_from_details, parse_address_components, ParsedAddress};
pub use validation::{FieldError, ValidationErrors};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
