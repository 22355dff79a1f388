//! `safezone distance` - great-circle distance between two coordinates.

use clap::Args;
use safezone::geo::{distance_km, format_distance, Coordinate};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct DistanceArgs {
    /// Latitude of the first point
    #[arg(allow_negative_numbers = true)]
    pub lat1: f64,
    /// Longitude of the first point
    #[arg(allow_negative_numbers = true)]
    pub lon1: f64,
    /// Latitude of the second point
    #[arg(allow_negative_numbers = true)]
    pub lat2: f64,
    /// Longitude of the second point
    #[arg(allow_negative_numbers = true)]
    pub lon2: f64,
}

pub fn run(args: DistanceArgs) -> Result<(), CliError> {
    let km = measure(&args)?;
    println!("{:.3} km ({})", km, format_distance(km));
    Ok(())
}

fn measure(args: &DistanceArgs) -> Result<f64, CliError> {
    let a = Coordinate {
        latitude: args.lat1,
        longitude: args.lon1,
    };
    let b = Coordinate {
        latitude: args.lat2,
        longitude: args.lon2,
    };
    Ok(distance_km(a, b)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure() {
        let args = DistanceArgs {
            lat1: 6.9271,
            lon1: 79.8612,
            lat2: 6.9344,
            lon2: 79.8428,
        };
        let km = measure(&args).unwrap();
        assert!((km - 2.2).abs() < 0.2);
    }

    #[test]
    fn test_measure_invalid() {
        let args = DistanceArgs {
            lat1: -91.0,
            lon1: 0.0,
            lat2: 0.0,
            lon2: 0.0,
        };
        assert!(matches!(measure(&args), Err(CliError::InvalidCoordinate(_))));
    }
}
