// ABOUTME: Composable capability traits for the external collaborators.
// ABOUTME: Defines IdentityOps, ObjectStoreOps, LockTableOps, RegistryOps, ImageOps, ClusterOps.

mod cluster;
mod identity;
mod image;
mod lock_table;
mod object_store;
mod registry;
mod shared_types;

pub use cluster::ClusterOps;
pub use identity::IdentityOps;
pub use image::ImageOps;
pub use lock_table::LockTableOps;
pub use object_store::ObjectStoreOps;
pub use registry::RegistryOps;
pub use shared_types::*;
