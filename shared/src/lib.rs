pub mod bounds;
pub mod catalog;
pub mod colors;
pub mod config;
pub mod error;
pub mod gate;
pub mod geography;
pub mod persistence;
pub mod playback;
pub mod projection;
pub mod store;
pub mod viewer;
pub mod visit;

pub use bounds::{YearBounds, compute_bounds};
pub use catalog::{PlaceCatalog, PlaceOption};
pub use colors::{Palette, Rgb};
pub use config::ViewerConfig;
pub use error::{FetchError, PersistenceError, VisitError};
pub use persistence::{MemoryPersistence, VisitPersistence};
pub use playback::{PlaybackState, Scheduler, TickHandle};
pub use projection::{Fill, PlaceFill, Projection, project};
pub use viewer::{MapFrame, Viewer, VisitRow};
pub use visit::{PlaceId, VisitRecord};
