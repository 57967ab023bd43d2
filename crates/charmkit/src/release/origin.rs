//! Mapping package origins to OpenStack releases.

use super::ReleaseError;
use super::tables::{OPENSTACK_RELEASES, openstack_release_for_series};

const DISTRO_ORIGINS: &[&str] = &["distro", "distro-proposed", "proposed"];

/// Derives the OpenStack release a package origin installs.
///
/// * `distro` style origins use the default release of `series`;
/// * `cloud:<series>-<release>[/<pocket>]` names the release directly;
/// * `deb`, `ppa` and `snap` lines are searched for a release codename.
///
/// ```
/// use charmkit::release::openstack_codename_for_source;
///
/// assert_eq!(
///     openstack_codename_for_source("cloud:bionic-ussuri/proposed", "bionic"),
///     Ok("ussuri")
/// );
/// assert_eq!(openstack_codename_for_source("distro", "focal"), Ok("ussuri"));
/// ```
///
/// # Errors
///
/// Returns [`ReleaseError::UnknownSeries`] when a distro origin is used on a
/// series without a default release, and [`ReleaseError::UnknownSource`]
/// when no release can be derived from the origin.
pub fn openstack_codename_for_source<'a>(
    source: &'a str,
    series: &str,
) -> Result<&'a str, ReleaseError> {
    if DISTRO_ORIGINS.contains(&source) {
        return openstack_release_for_series(series).ok_or_else(|| ReleaseError::UnknownSeries {
            series: series.to_owned(),
        });
    }

    if let Some(archive) = source.strip_prefix("cloud:") {
        return archive
            .split('/')
            .next()
            .and_then(|pocket| pocket.split_once('-'))
            .map(|(_, release)| release)
            .filter(|release| !release.is_empty())
            .ok_or_else(|| unknown(source));
    }

    if ["deb", "ppa", "snap"]
        .iter()
        .any(|prefix| source.starts_with(prefix))
    {
        return OPENSTACK_RELEASES
            .iter()
            .copied()
            .find(|release| source.contains(release))
            .ok_or_else(|| unknown(source));
    }

    Err(unknown(source))
}

fn unknown(source: &str) -> ReleaseError {
    ReleaseError::UnknownSource {
        source_line: source.to_owned(),
    }
}
