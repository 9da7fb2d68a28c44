pub mod curriculum;
pub mod model;
pub mod store;

pub use curriculum::{Curriculum, SubjectConcepts};
pub use model::{
    BandAlias, BandEntry, CriterionBlock, CriterionLetter, DescriptorTable, LevelRange,
    SubjectDescriptors,
};
pub use store::{normalize_grade_label, subject_key_variants, BlockRef, DescriptorStore};
