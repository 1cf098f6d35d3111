//! Vehicle-keyed documentation exemptions.
//!
//! Some message families only ever fire on a subset of vehicle types, so the
//! other vehicles must not be required to document them. Static policy, not
//! derived from scanning.

use crate::vehicle::Vehicle;
use std::collections::BTreeSet;

/// Messages the given vehicle is not expected to document.
pub fn whitelist(vehicle: Vehicle) -> BTreeSet<String> {
    let mut ret = BTreeSet::new();

    // Autotune runs on Plane and Copter only.
    if vehicle != Vehicle::Plane && vehicle != Vehicle::Copter {
        extend(&mut ret, &["ATUN"]);
    }

    // Plane-only families: TECS, soaring, quadplane, forward throttle.
    if vehicle != Vehicle::Plane {
        extend(
            &mut ret,
            &[
                "TECS", "TEC2", "TEC3", "TEC4", "SOAR", "SORC", "QBRK", "FWDT", "VAR",
            ],
        );
    }

    // Copter-only families: heli autorotation, autotune heading, gimbal, surface tracking.
    if vehicle != Vehicle::Copter {
        extend(
            &mut ret,
            &[
                "ARHS", "AROT", "ARSC", "ATDH", "ATNH", "ATSH", "GMB1", "GMB2", "SURF",
            ],
        );
    }

    ret
}

fn extend(set: &mut BTreeSet<String>, names: &[&str]) {
    set.extend(names.iter().map(|s| s.to_string()));
}
