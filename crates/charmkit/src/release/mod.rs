//! Release-specific charm variants.
//!
//! A charm that behaves differently across releases registers one variant
//! (usually a factory) per release it was written for. At runtime the
//! registry picks the newest variant that is not newer than the deployed
//! release. Release order is the position in a caller-supplied chronological
//! sequence such as [`OPENSTACK_RELEASES`] or [`CEPH_RELEASES`].

mod origin;
mod tables;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

pub use origin::openstack_codename_for_source;
pub use tables::{
    CEPH_RELEASES, OPENSTACK_RELEASES, UBUNTU_OPENSTACK_RELEASES, UCA_CODENAME_MAP,
    ceph_release_for, openstack_release_for_series,
};

use crate::host::ConfigStore;

const RELEASE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::release");

/// Errors raised while registering or selecting release variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseError {
    /// Nothing has been registered.
    #[error("no charm variants registered")]
    NoVariants,

    /// A variant was registered twice for the same release.
    #[error("a charm variant is already registered for release {release}")]
    DuplicateRelease {
        /// Release registered twice.
        release: String,
    },

    /// A registered release is missing from the ordering sequence.
    #[error("registered release {release} does not appear in the release sequence")]
    NotInSequence {
        /// Offending registered release.
        release: String,
    },

    /// The requested release is not in the ordering sequence.
    #[error("release {release} is not a known release")]
    UnknownRelease {
        /// Requested release.
        release: String,
    },

    /// The requested release predates every registered variant.
    #[error("release {release} is not supported by this charm; earliest support is {earliest}")]
    Unsupported {
        /// Requested release.
        release: String,
        /// Earliest registered release.
        earliest: String,
    },

    /// The package source does not name a recognisable release.
    #[error("cannot derive an OpenStack release from source '{source_line}'")]
    UnknownSource {
        /// Offending source line.
        source_line: String,
    },

    /// The Ubuntu series has no default OpenStack release.
    #[error("no OpenStack release is packaged by default for series {series}")]
    UnknownSeries {
        /// Offending series.
        series: String,
    },

    /// The OpenStack release has no matching Ceph release.
    #[error("OpenStack release {release} has no matching Ceph release")]
    NoCephRelease {
        /// OpenStack release without a Ceph counterpart.
        release: String,
    },
}

/// Variant chosen by [`ReleaseRegistry::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a, T> {
    /// Release the chosen variant was registered for.
    pub release: &'a str,
    /// The chosen variant.
    pub variant: &'a T,
}

/// Release-keyed collection of charm variants.
///
/// # Example
///
/// ```
/// use charmkit::release::{OPENSTACK_RELEASES, ReleaseRegistry};
///
/// let mut registry = ReleaseRegistry::new();
/// registry.register("queens", "legacy").expect("first registration");
/// registry.register("ussuri", "modern").expect("second registration");
///
/// let chosen = registry
///     .select(Some("victoria"), OPENSTACK_RELEASES)
///     .expect("a variant applies");
/// assert_eq!(chosen.release, "ussuri");
/// assert_eq!(*chosen.variant, "modern");
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseRegistry<T> {
    variants: BTreeMap<String, T>,
}

impl<T> Default for ReleaseRegistry<T> {
    fn default() -> Self {
        Self {
            variants: BTreeMap::new(),
        }
    }
}

impl<T> ReleaseRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the variant written for `release`.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::DuplicateRelease`] when the release already
    /// has a variant.
    pub fn register(&mut self, release: impl Into<String>, variant: T) -> Result<(), ReleaseError> {
        let name = release.into();
        if self.variants.contains_key(&name) {
            return Err(ReleaseError::DuplicateRelease { release: name });
        }
        self.variants.insert(name, variant);
        Ok(())
    }

    /// Returns `true` when no variants are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Picks the variant for `release`.
    ///
    /// Without a release the newest variant wins. Otherwise the newest
    /// variant registered for `release` or an earlier release is chosen.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::NoVariants`] for an empty registry,
    /// [`ReleaseError::NotInSequence`] when a registered release cannot be
    /// ordered, [`ReleaseError::UnknownRelease`] when `release` is not in
    /// `all_releases` and [`ReleaseError::Unsupported`] when it predates
    /// every variant.
    pub fn select<'a>(
        &'a self,
        release: Option<&str>,
        all_releases: &[&str],
    ) -> Result<Selection<'a, T>, ReleaseError> {
        let known = self.ordered(all_releases)?;
        let (Some(&(_, earliest, _)), Some(&(_, latest_name, latest))) =
            (known.first(), known.last())
        else {
            return Err(ReleaseError::NoVariants);
        };

        let Some(requested) = release else {
            return Ok(Selection {
                release: latest_name,
                variant: latest,
            });
        };

        let position = all_releases
            .iter()
            .position(|candidate| *candidate == requested)
            .ok_or_else(|| ReleaseError::UnknownRelease {
                release: requested.to_owned(),
            })?;

        known
            .iter()
            .rev()
            .find(|(index, _, _)| *index <= position)
            .map(|&(_, name, variant)| Selection {
                release: name,
                variant,
            })
            .ok_or_else(|| ReleaseError::Unsupported {
                release: requested.to_owned(),
                earliest: earliest.to_owned(),
            })
    }

    /// Picks the Ceph-release variant matching the charm's configured
    /// package origin.
    ///
    /// The origin is the `source` option, then `openstack-origin`, falling
    /// back to `distro`. It is mapped to an OpenStack release (using
    /// `series` for distro origins) and then to the Ceph release shipped
    /// with it, which is selected against [`CEPH_RELEASES`].
    ///
    /// # Errors
    ///
    /// Returns the origin mapping errors of
    /// [`openstack_codename_for_source`], [`ReleaseError::NoCephRelease`],
    /// or any error from [`ReleaseRegistry::select`].
    pub fn select_for_origin<'a>(
        &'a self,
        config: &dyn ConfigStore,
        series: &str,
    ) -> Result<Selection<'a, T>, ReleaseError> {
        let origin = configured_origin(config);
        let openstack = openstack_codename_for_source(&origin, series)?;
        let ceph = ceph_release_for(openstack).ok_or_else(|| ReleaseError::NoCephRelease {
            release: openstack.to_owned(),
        })?;
        debug!(
            target: RELEASE_TARGET,
            event = "release_resolved",
            origin = %origin,
            openstack,
            ceph,
            "resolved release from package origin"
        );
        self.select(Some(ceph), CEPH_RELEASES)
    }

    fn ordered<'a>(
        &'a self,
        all_releases: &[&str],
    ) -> Result<Vec<(usize, &'a str, &'a T)>, ReleaseError> {
        let mut known = self
            .variants
            .iter()
            .map(|(name, variant)| {
                all_releases
                    .iter()
                    .position(|candidate| *candidate == name.as_str())
                    .map(|index| (index, name.as_str(), variant))
                    .ok_or_else(|| ReleaseError::NotInSequence {
                        release: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        known.sort_by_key(|(index, _, _)| *index);
        Ok(known)
    }
}

fn configured_origin(config: &dyn ConfigStore) -> String {
    ["source", "openstack-origin"]
        .into_iter()
        .find_map(|key| config.get(key))
        .map(|value| value.to_string())
        .filter(|origin| !origin.is_empty())
        .unwrap_or_else(|| String::from("distro"))
}
