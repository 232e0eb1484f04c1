//! Built-in Stanton data set: one star, four planets and their landing zones.

use glam::{DQuat, DVec3};

use crate::catalogue::{
    BodyKind, BodyRecord, Catalogue, CatalogueBuilder, CatalogueError, LocationRecord,
    SystemRecord, ThemeColor,
};

const STAR: &str = "Stanton";

/// Records of the Stanton system, ready to be extended before building.
pub fn stanton_records() -> CatalogueBuilder {
    let star = BodyRecord {
        name: STAR.to_string(),
        kind: BodyKind::Star,
        parent_body: None,
        parent_star: None,
        coordinates: DVec3::new(136_049.870, 1_294_427.400, 2_923_345.368),
        orientation: DQuat::from_xyzw(0.0, 0.000_000_01, 0.000_000_02, 1.0),
        radius: 696_000.0,
        rotation_rate: 0.0,
        rotation_correction: 0.0,
        orbit_angle: 0.0,
        orbit_radius: 0.0,
        theme_color: None,
        theme_image: None,
        ring: None,
    };

    Catalogue::builder()
        .system(SystemRecord {
            name: STAR.to_string(),
            coordinates: DVec3::ZERO,
            affiliation: "UEE".to_string(),
        })
        .body(star)
        .body(planet(
            "ArcCorp",
            DVec3::new(18_587_664.740, -22_151_916.920, 0.0),
            800.0,
            [3.109_999_9, 230.733_68, 310.0, 28_917_272.576],
            ThemeColor::new(172, 102, 90),
        ))
        .body(planet(
            "Crusader",
            DVec3::new(-18_962_176.0, -2_664_960.0, 0.0),
            7450.010,
            [5.099_999_9, 300.333_77, 188.0, 19_148_527.616],
            ThemeColor::new(231, 152, 147),
        ))
        .body(planet(
            "microTech",
            DVec3::new(22_462_016.306, 37_185_625.646, 0.0),
            1000.0,
            [4.119_999_9, 217.116_88, 58.866, 43_443_216.384],
            ThemeColor::new(167, 184, 193),
        ))
        .body(planet(
            "Hurston",
            DVec3::new(12_850_457.093, 0.0, 0.0),
            1000.0,
            [2.48, 19.107_77, 0.0, 12_850_457.600],
            ThemeColor::new(138, 101, 71),
        ))
        .location(landing_zone(
            "Area18",
            "ArcCorp",
            DVec3::new(-747.409, -116.734, -262.094),
            "https://starcitizen.tools/images/thumb/c/c3/Arccorp-area18-skyline-io-north-tower.jpg/1280px-Arccorp-area18-skyline-io-north-tower.jpg",
        ))
        .location(landing_zone(
            "Lorville",
            "Hurston",
            DVec3::new(-328.989, -752.435, 572.120),
            "https://starcitizen.tools/images/4/42/Hurston.jpg",
        ))
        .location(landing_zone(
            "New Babbage",
            "microTech",
            DVec3::new(520.723, 419.364, 743.655),
            "https://starcitizen.tools/images/thumb/9/9c/Microtech-new-babbage-cityscape-01.jpg/1280px-Microtech-new-babbage-cityscape-01.jpg",
        ))
        .location(landing_zone(
            "Orison",
            "Crusader",
            DVec3::new(5295.517, -863.194, 5282.237),
            "https://starcitizen.tools/images/thumb/c/cf/Crusader-orison-voyager-bar-lookout-daytime-3.14.jpg/1280px-Crusader-orison-voyager-bar-lookout-daytime-3.14.jpg",
        ))
}

/// The Stanton catalogue.
///
/// # Errors
///
/// Only fails if the built-in records stop validating.
pub fn stanton() -> Result<Catalogue, CatalogueError> {
    stanton_records().build()
}

/// `spin` is `[rotation_rate, rotation_correction, orbit_angle, orbit_radius]`.
fn planet(
    name: &str,
    coordinates: DVec3,
    radius: f64,
    spin: [f64; 4],
    theme_color: ThemeColor,
) -> BodyRecord {
    let [rotation_rate, rotation_correction, orbit_angle, orbit_radius] = spin;
    BodyRecord {
        name: name.to_string(),
        kind: BodyKind::Planet,
        parent_body: Some(STAR.to_string()),
        parent_star: Some(STAR.to_string()),
        coordinates,
        orientation: DQuat::IDENTITY,
        radius,
        rotation_rate,
        rotation_correction,
        orbit_angle,
        orbit_radius,
        theme_color: Some(theme_color),
        theme_image: None,
        ring: None,
    }
}

fn landing_zone(name: &str, body: &str, offset: DVec3, image: &str) -> LocationRecord {
    LocationRecord {
        name: name.to_string(),
        kind: "Landing Zone".to_string(),
        parent_body: body.to_string(),
        parent_star: Some(STAR.to_string()),
        coordinates: offset,
        theme_image: Some(image.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stanton_builds() {
        let catalogue = stanton().unwrap();
        assert_eq!(catalogue.len_bodies(), 5);
        assert_eq!(catalogue.len_locations(), 4);
        let stanton = catalogue.system_id("Stanton").unwrap();
        let crusader = catalogue.body_id("Crusader").unwrap();
        assert_eq!(catalogue.system_of(crusader), Some(stanton));
        assert_eq!(catalogue.bodies_in_system("Stanton").count(), 5);
    }

    #[test]
    fn test_every_landing_zone_sits_near_its_surface() {
        let catalogue = stanton().unwrap();
        for (_, location) in catalogue.locations() {
            let body = catalogue.body(location.parent_body);
            let ratio = location.offset.length() / body.radius;
            assert!((0.9..1.1).contains(&ratio), "{}: {ratio}", location.name);
        }
    }

    #[test]
    fn test_planets_rotate_and_star_does_not() {
        let catalogue = stanton().unwrap();
        for (_, body) in catalogue.bodies() {
            assert_eq!(body.is_rotating(), body.kind == BodyKind::Planet, "{}", body.name);
        }
        let arccorp = catalogue.body(catalogue.body_id("ArcCorp").unwrap());
        assert!((arccorp.cycles_per_day() - 24.0 / 3.1099999).abs() < 1e-9);
    }
}
