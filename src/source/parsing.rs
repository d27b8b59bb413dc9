use lazy_static::lazy_static;
use regex::Regex;

use crate::math::Vector3;
use crate::scale::{au_per_day_to_km_per_s, au_to_km};
use crate::source::SourceError;

pub const START_OF_EPHEMERIS: &str = "$$SOE";
pub const END_OF_EPHEMERIS: &str = "$$EOE";

lazy_static! {
    // `\b` keeps "VX" from matching the position label "X".
    static ref POS_X: Regex = Regex::new(r"\bX\s*=\s*(\S+)").unwrap();
    static ref POS_Y: Regex = Regex::new(r"\bY\s*=\s*(\S+)").unwrap();
    static ref POS_Z: Regex = Regex::new(r"\bZ\s*=\s*(\S+)").unwrap();
    static ref VEL_X: Regex = Regex::new(r"\bVX\s*=\s*(\S+)").unwrap();
    static ref VEL_Y: Regex = Regex::new(r"\bVY\s*=\s*(\S+)").unwrap();
    static ref VEL_Z: Regex = Regex::new(r"\bVZ\s*=\s*(\S+)").unwrap();
}

/// State vector extracted from a vector table, already in scene frame and
/// physical units.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub position_km: Vector3,
    pub velocity_km_s: Option<Vector3>,
}

/// Parse the first row of a Horizons `VECTORS` table (AU, AU/day, ecliptic).
pub fn parse_vectors(text: &str) -> Result<StateVector, SourceError> {
    let block = ephemeris_block(text)?;

    let position_au = block
        .lines()
        .find_map(|line| labeled_triple(line, [&*POS_X, &*POS_Y, &*POS_Z]))
        .ok_or_else(|| SourceError::Malformed("no X/Y/Z position line".into()))??;

    let velocity_au_d = block
        .lines()
        .find_map(|line| labeled_triple(line, [&*VEL_X, &*VEL_Y, &*VEL_Z]))
        .transpose()?;

    Ok(StateVector {
        position_km: ecliptic_au_to_scene_km(position_au),
        velocity_km_s: velocity_au_d.map(|v| to_scene_frame(v).scaled(au_per_day_to_km_per_s(1.0))),
    })
}

/// Text between the start and end markers.
fn ephemeris_block(text: &str) -> Result<&str, SourceError> {
    let start = text
        .find(START_OF_EPHEMERIS)
        .ok_or_else(|| SourceError::Malformed(format!("missing {}", START_OF_EPHEMERIS)))?
        + START_OF_EPHEMERIS.len();
    let end = text[start..]
        .find(END_OF_EPHEMERIS)
        .ok_or_else(|| SourceError::Malformed(format!("missing {}", END_OF_EPHEMERIS)))?;
    Ok(&text[start..start + end])
}

/// `None` when the line does not carry all three labels; an error when it does
/// but a value is not a number.
fn labeled_triple(line: &str, labels: [&Regex; 3]) -> Option<Result<Vector3, SourceError>> {
    let captures: Vec<&str> = labels
        .iter()
        .map(|re| re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str()))
        .collect::<Option<_>>()?;

    let values = captures
        .iter()
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SourceError::Malformed(format!("unparsable value '{}'", raw)))
        })
        .collect::<Result<Vec<f64>, _>>();

    Some(values.map(|v| Vector3::new(v[0], v[1], v[2])))
}

/// Heliocentric ecliptic position in AU to scene frame kilometers.
pub fn ecliptic_au_to_scene_km(v: Vector3) -> Vector3 {
    to_scene_frame(v).scaled(au_to_km(1.0))
}

/// Ecliptic (x, y, z) to scene (x, up, depth): source z becomes up, source y
/// becomes depth.
fn to_scene_frame(v: Vector3) -> Vector3 {
    Vector3::new(v.x, v.z, v.y)
}
