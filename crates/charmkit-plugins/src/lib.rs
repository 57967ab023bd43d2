//! Reusable behaviour shared by families of OpenStack charms.
//!
//! * [`ceph`] validates the BlueStore compression options every Ceph client
//!   charm exposes and reports bad values through a status check.
//! * [`cinder`] publishes a storage backend's identity and its
//!   `cinder.conf` fragment to the principal Cinder charm.

pub mod ceph;
pub mod cinder;

pub use ceph::{CephClientPlugin, CompressionError, get_bluestore_compression};
pub use cinder::{CinderBackend, CinderError, CinderStoragePlugin};
