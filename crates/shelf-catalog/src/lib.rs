//! Library catalogs: the published remote index and the local record of
//! installed libraries, plus the fetchers that move artifacts and index
//! documents onto disk.

pub mod catalog;
pub mod extract;
pub mod fetch;
pub mod local;
pub mod remote;
