pub mod asset_ref;
pub use asset_ref::AssetRef;
