pub mod hit;
pub mod replicon;
pub mod window;

// re-export for cleaner imports
pub use self::hit::{AttcHit, Hit, IntegraseHit, SiteKey, Strand};
pub use self::replicon::{Replicon, RepliconContext, RepliconSet, Topology};
pub use self::window::Window;
