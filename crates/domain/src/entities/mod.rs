//! Domain entities - stored records for media assets, characters and configurations

mod character;
mod configuration;
mod media_asset;

pub use character::CharacterRecord;
pub use configuration::ConfigurationRecord;
pub use media_asset::MediaAssetRecord;
