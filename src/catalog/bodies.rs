use crate::catalog::types::{BodyEntry, BodyKind, SpeedTier};
use crate::orbit::OrbitalElements;

// Elements: J2000 mean elements (Standish, JPL approximate positions table).
// Fallback positions: heliocentric ecliptic J2000, 2024-01-01 00:00 TDB, rounded.
pub(super) static BODIES: [BodyEntry; 10] = [
    BodyEntry {
        id: "sun",
        name: "Sun",
        kind: BodyKind::Star,
        horizons_command: "10",
        radius_km: 695_700.0,
        tier: SpeedTier::Slow,
        elements: None,
        fallback_ecliptic_au: [0.0, 0.0, 0.0],
    },
    BodyEntry {
        id: "mercury",
        name: "Mercury",
        kind: BodyKind::Planet,
        horizons_command: "199",
        radius_km: 2_439.7,
        tier: SpeedTier::Fast,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 0.387_099_27,
            eccentricity: 0.205_635_93,
            inclination_deg: 7.004_979_02,
            ascending_node_deg: 48.330_765_93,
            perihelion_longitude_deg: 77.457_796_28,
        }),
        fallback_ecliptic_au: [-0.3872, -0.1657, 0.0218],
    },
    BodyEntry {
        id: "venus",
        name: "Venus",
        kind: BodyKind::Planet,
        horizons_command: "299",
        radius_km: 6_051.8,
        tier: SpeedTier::Fast,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 0.723_335_66,
            eccentricity: 0.006_776_72,
            inclination_deg: 3.394_676_05,
            ascending_node_deg: 76.679_842_55,
            perihelion_longitude_deg: 131.602_467_18,
        }),
        fallback_ecliptic_au: [-0.2839, 0.6663, 0.0255],
    },
    BodyEntry {
        id: "earth",
        name: "Earth",
        kind: BodyKind::Planet,
        horizons_command: "399",
        radius_km: 6_371.0,
        tier: SpeedTier::Fast,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 1.000_002_61,
            eccentricity: 0.016_711_23,
            inclination_deg: 0.0,
            ascending_node_deg: 0.0,
            perihelion_longitude_deg: 102.937_681_93,
        }),
        fallback_ecliptic_au: [-0.1685, 0.9688, 0.0000],
    },
    BodyEntry {
        id: "mars",
        name: "Mars",
        kind: BodyKind::Planet,
        horizons_command: "499",
        radius_km: 3_389.5,
        tier: SpeedTier::Fast,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 1.523_710_34,
            eccentricity: 0.093_394_10,
            inclination_deg: 1.849_691_42,
            ascending_node_deg: 49.559_538_91,
            perihelion_longitude_deg: -23.943_629_59,
        }),
        fallback_ecliptic_au: [0.3427, -1.3811, -0.0374],
    },
    BodyEntry {
        id: "jupiter",
        name: "Jupiter",
        kind: BodyKind::Planet,
        horizons_command: "599",
        radius_km: 69_911.0,
        tier: SpeedTier::Default,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 5.202_887_00,
            eccentricity: 0.048_386_24,
            inclination_deg: 1.304_396_95,
            ascending_node_deg: 100.473_909_09,
            perihelion_longitude_deg: 14.728_479_83,
        }),
        fallback_ecliptic_au: [3.4862, 3.5396, -0.0927],
    },
    BodyEntry {
        id: "saturn",
        name: "Saturn",
        kind: BodyKind::Planet,
        horizons_command: "699",
        radius_km: 58_232.0,
        tier: SpeedTier::Default,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 9.536_675_94,
            eccentricity: 0.053_861_79,
            inclination_deg: 2.485_991_87,
            ascending_node_deg: 113.662_424_48,
            perihelion_longitude_deg: 92.598_878_31,
        }),
        fallback_ecliptic_au: [8.9447, -3.9493, -0.2881],
    },
    BodyEntry {
        id: "uranus",
        name: "Uranus",
        kind: BodyKind::Planet,
        horizons_command: "799",
        radius_km: 25_362.0,
        tier: SpeedTier::Slow,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 19.189_164_64,
            eccentricity: 0.047_257_44,
            inclination_deg: 0.772_637_83,
            ascending_node_deg: 74.016_925_03,
            perihelion_longitude_deg: 170.954_276_30,
        }),
        fallback_ecliptic_au: [12.4520, 15.0846, -0.1054],
    },
    BodyEntry {
        id: "neptune",
        name: "Neptune",
        kind: BodyKind::Planet,
        horizons_command: "899",
        radius_km: 24_622.0,
        tier: SpeedTier::Slow,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 30.069_922_76,
            eccentricity: 0.008_590_48,
            inclination_deg: 1.770_043_47,
            ascending_node_deg: 131.784_225_74,
            perihelion_longitude_deg: 44.964_762_27,
        }),
        fallback_ecliptic_au: [29.8693, -1.6937, -0.6528],
    },
    BodyEntry {
        id: "pluto",
        name: "Pluto",
        kind: BodyKind::DwarfPlanet,
        horizons_command: "999",
        radius_km: 1_188.3,
        tier: SpeedTier::Slow,
        elements: Some(OrbitalElements {
            semi_major_axis_au: 39.482_116_75,
            eccentricity: 0.248_827_30,
            inclination_deg: 17.140_012_06,
            ascending_node_deg: 110.303_936_84,
            perihelion_longitude_deg: 224.068_916_29,
        }),
        fallback_ecliptic_au: [17.1960, -30.2100, -1.7980],
    },
];
