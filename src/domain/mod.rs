mod access;
mod category;
mod entry;
mod money;
mod period;
mod summary;
mod transaction;

pub use access::*;
pub use category::*;
pub use entry::*;
pub use money::*;
pub use period::*;
pub use summary::*;
pub use transaction::*;
