/// Survey to scene axis matrix (row-major: [x_new, y_new, z_new]).
/// Survey records are (easting, northing, elevation); the scene is Y-up,
/// so elevation becomes the vertical axis and northing the remaining horizontal one.
pub const COORDINATE_TRANSFORM: [[f64; 3]; 3] = [
    [1.0, 0.0, 0.0], // X = easting
    [0.0, 0.0, 1.0], // Y = elevation
    [0.0, 1.0, 0.0], // Z = northing
];

/// Apply the survey to scene axis matrix.
pub fn transform_coordinates(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let input = [x, y, z];
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += COORDINATE_TRANSFORM[i][j] * input[j];
        }
    }

    (output[0], output[1], output[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_becomes_vertical() {
        assert_eq!(transform_coordinates(1.0, 2.0, 3.0), (1.0, 3.0, 2.0));
    }
}
