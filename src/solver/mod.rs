pub mod match_finder;
pub mod path_finder;
pub mod segment_search;
pub mod trace;

pub use match_finder::{find_all_matches, find_all_matches_traced, has_any_match, matchable_faces};
pub use path_finder::{find_simplest_path, find_simplest_path_traced, PlayOccupancy};
pub use segment_search::{
    Occupancy, Reach, SearchLimits, SearchMode, SegmentSearch, TargetSet, DEFAULT_MAX_PATHS,
};
pub use trace::{LogTrace, NoopTrace, RecordingTrace, SearchEvent, SearchTrace};
