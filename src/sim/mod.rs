mod context;
mod simulation;

pub use self::context::{SimulationContext, TerrainHandle, MIN_HALF_EXTENT};
pub use self::simulation::{Renderer, SimulationLoop, TickReport};
