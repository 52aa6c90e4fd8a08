mod duplicates;
pub mod group_key;


pub use duplicates::{
    DuplicateDetector, DuplicateGroup, DuplicateReport, DEFAULT_N_SAMPLES, DEFAULT_N_TO_SHOW,
    DEFAULT_RANDOM_STATE,
};
pub use group_key::{GroupKey, KeySlots, KeyValue};
