//! Static release name tables.

/// OpenStack release codenames in chronological order.
pub const OPENSTACK_RELEASES: &[&str] = &[
    "diablo",
    "essex",
    "folsom",
    "grizzly",
    "havana",
    "icehouse",
    "juno",
    "kilo",
    "liberty",
    "mitaka",
    "newton",
    "ocata",
    "pike",
    "queens",
    "rocky",
    "stein",
    "train",
    "ussuri",
    "victoria",
    "wallaby",
    "xena",
    "yoga",
    "zed",
    "antelope",
    "bobcat",
    "caracal",
    "dalmatian",
    "epoxy",
];

/// Ceph release codenames in chronological order.
pub const CEPH_RELEASES: &[&str] = &[
    "firefly", "hammer", "jewel", "luminous", "mimic", "nautilus", "octopus", "pacific", "quincy",
    "reef", "squid",
];

/// Ceph release shipped alongside each OpenStack release in the Ubuntu
/// Cloud Archive.
pub const UCA_CODENAME_MAP: &[(&str, &str)] = &[
    ("icehouse", "firefly"),
    ("juno", "firefly"),
    ("kilo", "hammer"),
    ("liberty", "hammer"),
    ("mitaka", "jewel"),
    ("newton", "jewel"),
    ("ocata", "jewel"),
    ("pike", "luminous"),
    ("queens", "luminous"),
    ("rocky", "mimic"),
    ("stein", "mimic"),
    ("train", "nautilus"),
    ("ussuri", "octopus"),
    ("victoria", "octopus"),
    ("wallaby", "pacific"),
    ("xena", "pacific"),
    ("yoga", "quincy"),
    ("zed", "quincy"),
    ("antelope", "quincy"),
    ("bobcat", "reef"),
    ("caracal", "squid"),
    ("dalmatian", "squid"),
    ("epoxy", "squid"),
];

/// OpenStack release packaged by default in each Ubuntu series.
pub const UBUNTU_OPENSTACK_RELEASES: &[(&str, &str)] = &[
    ("oneiric", "diablo"),
    ("precise", "essex"),
    ("quantal", "folsom"),
    ("raring", "grizzly"),
    ("saucy", "havana"),
    ("trusty", "icehouse"),
    ("utopic", "juno"),
    ("vivid", "kilo"),
    ("wily", "liberty"),
    ("xenial", "mitaka"),
    ("yakkety", "newton"),
    ("zesty", "ocata"),
    ("artful", "pike"),
    ("bionic", "queens"),
    ("cosmic", "rocky"),
    ("disco", "stein"),
    ("eoan", "train"),
    ("focal", "ussuri"),
    ("groovy", "victoria"),
    ("hirsute", "wallaby"),
    ("impish", "xena"),
    ("jammy", "yoga"),
    ("kinetic", "zed"),
    ("lunar", "antelope"),
    ("mantic", "bobcat"),
    ("noble", "caracal"),
    ("oracular", "dalmatian"),
    ("plucky", "epoxy"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

/// Ceph release matching an OpenStack release.
#[must_use]
pub fn ceph_release_for(openstack_release: &str) -> Option<&'static str> {
    lookup(UCA_CODENAME_MAP, openstack_release)
}

/// Default OpenStack release of an Ubuntu series.
#[must_use]
pub fn openstack_release_for_series(series: &str) -> Option<&'static str> {
    lookup(UBUNTU_OPENSTACK_RELEASES, series)
}
