//! sk-model: reaction-network data model for surfkin.
//!
//! This crate holds everything the kinetics solver consumes but does not
//! compute: species definitions, elementary reactions, the ordered reaction
//! network (whose name orders are the address scheme for every vector and
//! matrix in the system), the free-energy state, and the two collaborator
//! seams (archive sink, gas-energy corrector).

pub mod archive;
pub mod context;
pub mod corrector;
pub mod energies;
pub mod error;
pub mod network;
pub mod reaction;
pub mod species;

pub use archive::{ArchiveSink, MemoryArchive, NullArchive};
pub use context::ModelContext;
pub use corrector::{GasCorrector, NoCorrection, TabulatedCorrection};
pub use energies::FreeEnergies;
pub use error::{ModelError, ModelResult};
pub use network::{NetworkBuilder, ReactionNetwork, TermClass, SITE_MARKER};
pub use reaction::{ElementaryReaction, Term};
pub use species::{SpeciesDef, SpeciesKind};
