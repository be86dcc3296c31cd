// Kernel - infrastructure adapters and dependency injection

pub mod deps;
pub mod media;
pub mod mongo;
pub mod test_dependencies;
pub mod traits;

pub use deps::*;
pub use media::*;
pub use mongo::*;
pub use traits::*;
