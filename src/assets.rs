use log::{debug, error};

use crate::error::SimError;
use crate::math::Aabb;
use crate::scene::MeshGeometry;
use crate::Result;

/// Notification from an asset loader
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent<T> {
    /// Bytes or items loaded so far
    Progress {
        /// Amount loaded
        loaded: u64,
        /// Total amount, if known
        total: Option<u64>,
    },

    /// The asset finished loading
    Loaded(T),

    /// The asset could not be loaded
    Failed(String),
}

/// State of a single asset load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing heard from the loader yet
    Pending,

    /// Partially loaded
    Loading {
        /// Amount loaded
        loaded: u64,
        /// Total amount, if known
        total: Option<u64>,
    },

    /// Loaded and not yet taken
    Ready(T),

    /// Taken by the consumer
    Consumed,

    /// Abandoned after a failure
    Failed(String),
}

impl<T> LoadState<T> {
    /// Returns whether the load has reached a final state
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Consumed | Self::Failed(_))
    }

    /// Returns the load fraction when the total is known
    pub fn progress(&self) -> Option<f32> {
        match self {
            Self::Loading { loaded, total: Some(total) } if *total > 0 => {
                Some((*loaded as f32 / *total as f32).min(1.0))
            }
            Self::Ready(_) | Self::Consumed => Some(1.0),
            _ => None,
        }
    }
}

/// A named asset being loaded by a collaborator
///
/// Loaders report through [`LoadEvent`]s which the slot folds into a [`LoadState`].
#[derive(Debug)]
pub struct AssetSlot<T> {
    name: String,
    state: LoadState<T>,
}

impl<T> AssetSlot<T> {
    /// Creates a pending slot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: LoadState::Pending,
        }
    }

    /// Returns the asset name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current state
    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Folds a loader notification into the state
    ///
    /// Events arriving after the load finished are ignored. Failures are logged
    /// and the load is abandoned.
    pub fn apply(&mut self, event: LoadEvent<T>) {
        if self.state.is_finished() {
            debug!("ignoring event for finished asset '{}'", self.name);
            return;
        }

        self.state = match event {
            LoadEvent::Progress { loaded, total } => LoadState::Loading { loaded, total },
            LoadEvent::Loaded(value) => {
                debug!("asset '{}' loaded", self.name);
                LoadState::Ready(value)
            }
            LoadEvent::Failed(reason) => {
                error!("failed to load asset '{}': {}", self.name, reason);
                LoadState::Failed(reason)
            }
        };
    }

    /// Takes the loaded value, leaving the slot consumed
    ///
    /// Returns `Ok(None)` while loading is still in progress.
    pub fn take_ready(&mut self) -> Result<Option<T>> {
        match std::mem::replace(&mut self.state, LoadState::Consumed) {
            LoadState::Ready(value) => Ok(Some(value)),
            LoadState::Failed(reason) => {
                self.state = LoadState::Failed(reason.clone());
                Err(SimError::AssetLoad(format!("{}: {}", self.name, reason)))
            }
            other => {
                self.state = other;
                Ok(None)
            }
        }
    }
}

/// A resolved mesh as delivered by a mesh loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMesh {
    /// Name of the source asset
    pub name: String,

    /// The decoded geometry
    pub geometry: MeshGeometry,
}

impl LoadedMesh {
    /// Wraps decoded geometry
    pub fn new(name: impl Into<String>, geometry: MeshGeometry) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }

    /// Bounds of the geometry, `None` when it has no vertices
    pub fn bounds(&self) -> Option<Aabb> {
        self.geometry.bounds()
    }
}
