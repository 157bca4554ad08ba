//! Shared argument types for the binaries.

use clap::ValueEnum;
use evg_core::{EdgeModelKind, HeuristicMode, Point3};

/// Parse `x,y,z` into a point.
pub fn parse_point(s: &str) -> Result<Point3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }
    let mut coords = [0.0f64; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid coordinate '{part}' in '{s}'"))?;
    }
    let point = Point3::new(coords[0], coords[1], coords[2]);
    if !point.is_finite() {
        return Err(format!("coordinates must be finite: '{s}'"));
    }
    Ok(point)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    Direct,
    LowerBound,
    Simplified,
    Zero,
}

impl From<HeuristicArg> for HeuristicMode {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Direct => HeuristicMode::Direct,
            HeuristicArg::LowerBound => HeuristicMode::LowerBound,
            HeuristicArg::Simplified => HeuristicMode::Simplified,
            HeuristicArg::Zero => HeuristicMode::Zero,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeModelArg {
    Physical,
    Simplified,
}

impl From<EdgeModelArg> for EdgeModelKind {
    fn from(arg: EdgeModelArg) -> Self {
        match arg {
            EdgeModelArg::Physical => EdgeModelKind::Physical,
            EdgeModelArg::Simplified => EdgeModelKind::Simplified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("0,15,2").unwrap(), Point3::new(0.0, 15.0, 2.0));
        assert_eq!(parse_point(" 1.5, -2 , 3e1 ").unwrap(), Point3::new(1.5, -2.0, 30.0));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,2,z").is_err());
        assert!(parse_point("1,2,inf").is_err());
    }

    #[test]
    fn value_enums_use_kebab_case() {
        assert_eq!(
            HeuristicArg::from_str("lower-bound", false).unwrap(),
            HeuristicArg::LowerBound
        );
        assert_eq!(
            HeuristicMode::from(HeuristicArg::LowerBound),
            HeuristicMode::LowerBound
        );
        assert_eq!(
            EdgeModelKind::from(EdgeModelArg::Simplified),
            EdgeModelKind::Simplified
        );
    }
}
