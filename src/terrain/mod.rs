mod config;
mod raster;
mod builder;

pub use self::config::{HeightBand, HeightBands, NormalMode, TerrainConfig};
pub use self::raster::HeightRaster;
pub use self::builder::{TerrainBuilder, TerrainMesh};
