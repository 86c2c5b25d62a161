//! Build-time resolution of the dependency map into bundler and concatenation inputs.

mod filter;
mod lists;

pub use filter::{filter, flatten};
pub use lists::{
    DATA_BINDING_MODULE, VIEW_LIBRARY_MODULE, build_concat_list, build_library_exclusion_list,
};
