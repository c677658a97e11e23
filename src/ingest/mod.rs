pub mod loader;
pub mod observation;

pub use loader::{load_file, load_files, parse_maps, LoadedMaps};
pub use observation::{parse_observations, ParsedScores, RawObservation, RawTeam};
