pub mod roman;
pub mod sub_criteria;

pub use roman::{roman_rank, sort_numerals, RomanNumeral};
pub use sub_criteria::{extract_sub_criteria, format_sub_criteria, get_all_sub_criteria, SubCriteria};
