pub mod context;
pub mod ops_info;
pub mod ops_install;
pub mod ops_list;
pub mod ops_remove;
pub mod ops_search;
pub mod ops_tree;
pub mod ops_update;
