use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::assets::AssetSlot;
use crate::error::SimError;
use crate::math::{Aabb, Point3, Vector3};
use crate::scene::MeshGeometry;
use crate::shapes::ShapeDesc;
use crate::terrain::{HeightBands, HeightRaster, NormalMode, TerrainConfig};
use crate::Result;

/// Height-colored triangle grid built from a raster
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    /// Samples per row
    pub width: usize,

    /// Number of rows
    pub depth: usize,

    /// World height of a sample of 1.0
    pub vertical_scale: f32,

    /// Positions, smooth normals, colors and triangles
    pub geometry: MeshGeometry,

    /// One normal per triangle, only filled in flat mode
    pub face_normals: Vec<Vector3>,

    /// Whether the renderer should shade faces flat
    pub flat_shading: bool,
}

impl TerrainMesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    /// Bounds of the terrain
    pub fn bounds(&self) -> Option<Aabb> {
        self.geometry.bounds()
    }

    /// Static triangle-mesh collision shape of the terrain
    pub fn collision_shape(&self) -> ShapeDesc {
        ShapeDesc::TriMesh {
            vertices: Arc::new(self.geometry.positions.clone()),
            indices: Arc::new(self.geometry.indices.clone()),
        }
    }
}

type TerrainListener = Box<dyn FnMut(&TerrainMesh)>;

/// Turns height rasters into terrain meshes and reports them to listeners
pub struct TerrainBuilder {
    config: TerrainConfig,
    listeners: Vec<TerrainListener>,
}

impl TerrainBuilder {
    /// Creates a builder with the given configuration
    pub fn new(config: TerrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            listeners: Vec::new(),
        })
    }

    /// Returns the configuration
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Builds a smooth-shaded terrain mesh
    ///
    /// Vertices are centered on the origin in x and z. Fails with
    /// [`SimError::InsufficientResolution`] when the raster is narrower than 2 samples
    /// in either direction.
    pub fn build(raster: &HeightRaster, vertical_scale: f32, bands: &HeightBands) -> Result<TerrainMesh> {
        Self::generate(
            raster,
            &TerrainConfig {
                vertical_scale,
                bands: bands.clone(),
                normal_mode: NormalMode::Smooth,
            },
        )
    }

    /// Builds a terrain mesh with every setting taken from `config`
    pub fn generate(raster: &HeightRaster, config: &TerrainConfig) -> Result<TerrainMesh> {
        let (w, d) = (raster.width(), raster.height());
        if w < 2 || d < 2 {
            return Err(SimError::InsufficientResolution { width: w, height: d });
        }
        config.validate()?;

        let half_w = w as f32 / 2.0;
        let half_d = d as f32 / 2.0;

        let mut geometry = MeshGeometry::default();
        geometry.positions.reserve(w * d);
        geometry.colors.reserve(w * d);
        for (i, h) in raster.samples().iter().enumerate() {
            let (x, z) = (i % w, i / w);
            geometry.positions.push(Point3::new(
                x as f32 - half_w,
                h * config.vertical_scale,
                z as f32 - half_d,
            ));
            geometry.colors.push(config.bands.classify(*h));
        }

        geometry.indices.reserve((w - 1) * (d - 1) * 2);
        for row in 0..d - 1 {
            for col in 0..w - 1 {
                let i = (row * w + col) as u32;
                let below = i + w as u32;
                geometry.indices.push([i, below, i + 1]);
                geometry.indices.push([i + 1, below, below + 1]);
            }
        }

        // Unnormalized face normals weight each face by its area
        let mut normals = vec![Vector3::zeros(); geometry.positions.len()];
        let mut face_normals = Vec::new();
        for [a, b, c] in &geometry.indices {
            let (a, b, c) = (*a as usize, *b as usize, *c as usize);
            let pa = geometry.positions[a];
            let n = (geometry.positions[b] - pa).cross(&(geometry.positions[c] - pa));
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
            if config.normal_mode == NormalMode::Flat {
                face_normals.push(n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::y));
            }
        }
        geometry.normals = normals
            .into_iter()
            .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::y))
            .collect();

        debug!(
            "terrain {}x{}: {} vertices, {} triangles",
            w,
            d,
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        Ok(TerrainMesh {
            width: w,
            depth: d,
            vertical_scale: config.vertical_scale,
            geometry,
            face_normals,
            flat_shading: config.normal_mode == NormalMode::Flat,
        })
    }

    /// Registers a callback run with every terrain this builder loads
    pub fn on_terrain_ready(&mut self, callback: impl FnMut(&TerrainMesh) + 'static) {
        self.listeners.push(Box::new(callback));
    }

    /// Builds a terrain from a raster and hands it to every listener
    pub fn load(&mut self, raster: &HeightRaster) -> Result<Arc<TerrainMesh>> {
        let terrain = Arc::new(Self::generate(raster, &self.config)?);
        info!(
            "terrain ready: {}x{}, notifying {} listeners",
            terrain.width,
            terrain.depth,
            self.listeners.len()
        );
        for listener in &mut self.listeners {
            listener(&terrain);
        }
        Ok(terrain)
    }

    /// Loads the raster of a slot once its decoder has delivered it
    ///
    /// Returns `Ok(None)` while the raster is still loading.
    pub fn load_slot(&mut self, slot: &mut AssetSlot<HeightRaster>) -> Result<Option<Arc<TerrainMesh>>> {
        match slot.take_ready()? {
            Some(raster) => self.load(&raster).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for TerrainBuilder {
    fn default() -> Self {
        Self {
            config: TerrainConfig::default(),
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for TerrainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrainBuilder")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
