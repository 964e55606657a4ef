//! # Persistence Viewer
//!
//! Interactive persistent homology of small point clouds: grow a ball of
//! radius r around every point and watch the Vietoris-Rips persistence
//! diagrams change with r.
//!
//! ## Pipeline
//!
//! Each render runs one pass over the session state:
//!
//! 1. **Point cloud**: a built-in dataset, an uploaded numeric table or a
//!    coordinate matrix, validated to 2D or 3D
//!
//! 2. **Growth projection**: one disc (2D) or sphere (3D) of radius r per
//!    point
//!
//! 3. **Persistence**: Vietoris-Rips filtration truncated at ε = 2r, reduced
//!    over Z/2Z, giving diagrams for H₀, H₁ and H₂
//!
//! 4. **View**: the dimensions the user selected, mapped into plot
//!    coordinates, with Betti numbers and entropy summaries
//!
//! ## Key Relation
//!
//! Two balls of radius r intersect exactly when their centers lie within
//! 2r, so the complex VR_{2r}(X) is the nerve-like shadow of the picture
//! on screen:
//!
//!   ‖xᵢ - xⱼ‖ ≤ 2r  ⟺  B(xᵢ, r) ∩ B(xⱼ, r) ≠ ∅
//!
//! ## Autoplay
//!
//! With autoplay on, the radius advances by a fixed step on a fixed cadence
//! and wraps back to its minimum past the maximum.
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Bauer, "Ripser: efficient computation of Vietoris-Rips persistence
//!   barcodes" (2021)

pub mod config;
pub mod error;

pub mod cloud;
pub mod filtration;
pub mod topology;
pub mod engine;
pub mod projection;
pub mod view;

pub mod session;
pub mod animation;

pub use config::{AnimationConfig, RadiusConfig, ViewerConfig};
pub use error::{CloudError, ComputationError, ConfigError};

// Re-exports from cloud
pub use cloud::{Dataset, PointCloud, Source};

// Re-exports from filtration
pub use filtration::{FiltrationParameter, RadiusBounds};

// Re-exports from topology
pub use topology::{
    BettiNumbers,
    DiagramSet,
    HomologyDiagram,
    PersistencePair,
    VietorisRips,
};

// Re-exports from engine
pub use engine::{
    DiagramCache,
    PersistenceBackend,
    PersistenceEngine,
    StandardReduction,
};

// Re-exports from projection and view
pub use projection::{GeometricPrimitive, PrimitiveKind};
pub use view::{DimensionSelection, DisplayPoint, DisplayRange, PlotMode};

// Re-exports from session and animation
pub use session::{DiagramJob, Frame, Input, Notice, Session};
pub use animation::{AnimationDriver, Clock, ManualClock, PlaybackState, TokioClock};
