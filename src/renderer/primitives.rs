// renderer/primitives.rs
//
// Line-strip shapes used by the debug drawer. All of them are unit sized and
// get placed with a transform at draw time.

use super::vertex::PrimitiveVertex;
use std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub vertices: Vec<PrimitiveVertex>,
    pub indices: Vec<u16>,
}

impl Primitive {
    fn from_positions(positions: &[[f32; 3]], indices: &[u16]) -> Self {
        Self {
            vertices: positions.iter().copied().map(PrimitiveVertex::at).collect(),
            indices: indices.to_vec(),
        }
    }
}

/// Corners at +-1, traced as one strip along every edge.
pub fn cube() -> Primitive {
    Primitive::from_positions(
        &[
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
        ],
        &[0, 2, 3, 1, 5, 7, 6, 4, 0, 2, 6, 4, 5, 7, 3, 1, 0],
    )
}

/// Square base on y = 0 with the apex at y = 1.
pub fn pyramid() -> Primitive {
    Primitive::from_positions(
        &[
            [-1.0, 0.0, 1.0],
            [-1.0, 0.0, -1.0],
            [1.0, 0.0, -1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 0.0],
        ],
        &[0, 1, 2, 3, 2, 3, 0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4],
    )
}

const SPHERE_BANDS: u16 = 12;
const SPHERE_RADIUS: f32 = 0.5;

/// UV sphere with 12 latitude and 12 longitude bands.
pub fn sphere() -> Primitive {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for latitude in 0..=SPHERE_BANDS {
        let theta = f32::from(latitude) * PI / f32::from(SPHERE_BANDS);
        let (sin_theta, cos_theta) = theta.sin_cos();

        for longitude in 0..=SPHERE_BANDS {
            let phi = f32::from(longitude) * 2.0 * PI / f32::from(SPHERE_BANDS);
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            vertices.push(PrimitiveVertex {
                position: normal.map(|n| n * SPHERE_RADIUS),
                normal,
                ..PrimitiveVertex::default()
            });
        }
    }

    for latitude in 0..SPHERE_BANDS {
        for longitude in 0..SPHERE_BANDS {
            let first = latitude * (SPHERE_BANDS + 1) + longitude;
            let second = first + SPHERE_BANDS + 1;
            indices.extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    Primitive { vertices, indices }
}

pub fn quad() -> Primitive {
    Primitive::from_positions(
        &[
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ],
        &[0, 1, 2, 2, 3, 0],
    )
}

/// Unit segment along +X.
pub fn line() -> Primitive {
    Primitive::from_positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], &[0, 1])
}

/// 2x2 cell grid in the XY plane centered on the origin.
pub fn grid() -> Primitive {
    Primitive::from_positions(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [-1.0, -1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
        ],
        &[0, 1, 2, 3, 0, 3, 4, 5, 0, 5, 6, 7, 0, 7, 8, 1],
    )
}

const CIRCLE_SEGMENTS: u16 = 20;
const CIRCLE_RADIUS: f32 = 0.5;

/// Center vertex plus a closed ring of 20 points in the XY plane.
pub fn circle() -> Primitive {
    let step = 2.0 * PI / f32::from(CIRCLE_SEGMENTS);
    let mut vertices = vec![PrimitiveVertex::at([0.0; 3])];
    vertices.extend((0..CIRCLE_SEGMENTS).map(|i| {
        let (sin, cos) = (f32::from(i) * step).sin_cos();
        // start at (-r, 0) and rotate counter-clockwise
        PrimitiveVertex::at([-CIRCLE_RADIUS * cos, -CIRCLE_RADIUS * sin, 0.0])
    }));

    let mut indices: Vec<u16> = (1..=CIRCLE_SEGMENTS).collect();
    indices.push(1);

    Primitive { vertices, indices }
}
