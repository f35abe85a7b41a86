//! Cubie grid data and geometry.
//!
//! This module defines the static 3x3x3 layout: the mapping from a linear
//! cubie index to grid coordinates, the face-color table describing the
//! solved assembly, and the mesh data for one cubie.

use bytemuck::Zeroable;
use nalgebra::Vector4;

/// Number of cubies in the 3x3x3 assembly.
pub(crate) const CUBIE_COUNT: usize = 27;

/// Colors a cubie face can carry.
///
/// Six visible macro-face colors plus `Interior` for faces that point into
/// the assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FaceColor {
    Cyan,
    Yellow,
    Blue,
    Green,
    Red,
    Orange,
    Interior,
}

impl From<FaceColor> for Vector4<f32> {
    /// RGBA value used when building vertex data.
    fn from(color: FaceColor) -> Self {
        match color {
            FaceColor::Cyan => Vector4::new(0.0, 1.0, 1.0, 1.0),
            FaceColor::Yellow => Vector4::new(1.0, 0.835, 0.0, 1.0),
            FaceColor::Blue => Vector4::new(0.0, 0.274, 0.678, 1.0),
            FaceColor::Green => Vector4::new(0.0, 0.608, 0.282, 1.0),
            FaceColor::Red => Vector4::new(0.717, 0.070, 0.203, 1.0),
            FaceColor::Orange => Vector4::new(1.0, 0.345, 0.0, 1.0),
            FaceColor::Interior => Vector4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Axis-aligned face of a cubie. The discriminant doubles as the index into
/// `Cubie::faces` and the face's quad within the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Face {
    Right = 0,
    Left = 1,
    Top = 2,
    Bottom = 3,
    Front = 4,
    Back = 5,
}

impl Face {
    pub(crate) const ALL: [Face; 6] = [
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
    ];
}

/// Logical grid position of a cubie, each axis in {-1, 0, 1}.
///
/// +X is right, +Y is up, +Z is toward the viewer (front).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridCoords {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) z: i32,
}

/// Maps a linear cubie index to its grid coordinates.
///
/// Index 0 is the front-top-left corner, 13 the hidden center, 26 the
/// back-bottom-right corner. Indices outside [0, 26] violate the caller
/// contract and panic.
pub(crate) fn grid_coords(index: usize) -> GridCoords {
    assert!(index < CUBIE_COUNT, "cubie index out of range: {index}");
    GridCoords {
        x: (index % 3) as i32 - 1,
        y: 1 - ((index % 9) / 3) as i32,
        z: 1 - (index / 9) as i32,
    }
}

/// Face colors for every cubie, ordered [+X, -X, +Y, -Y, +Z, -Z].
///
/// One row per index; together the rows give each macro face a single color
/// (top orange, front cyan, left green, bottom red, back yellow, right blue)
/// and every inward-pointing face the interior color.
pub(crate) const FACE_COLORS: [[FaceColor; 6]; CUBIE_COUNT] = {
    use FaceColor::{Blue, Cyan, Green, Interior, Orange, Red, Yellow};
    [
        // Front slab, z = 1
        [Interior, Green, Orange, Interior, Cyan, Interior],
        [Interior, Interior, Orange, Interior, Cyan, Interior],
        [Blue, Interior, Orange, Interior, Cyan, Interior],
        [Interior, Green, Interior, Interior, Cyan, Interior],
        [Interior, Interior, Interior, Interior, Cyan, Interior],
        [Blue, Interior, Interior, Interior, Cyan, Interior],
        [Interior, Green, Interior, Red, Cyan, Interior],
        [Interior, Interior, Interior, Red, Cyan, Interior],
        [Blue, Interior, Interior, Red, Cyan, Interior],
        // Middle slab, z = 0
        [Interior, Green, Orange, Interior, Interior, Interior],
        [Interior, Interior, Orange, Interior, Interior, Interior],
        [Blue, Interior, Orange, Interior, Interior, Interior],
        [Interior, Green, Interior, Interior, Interior, Interior],
        [Interior, Interior, Interior, Interior, Interior, Interior],
        [Blue, Interior, Interior, Interior, Interior, Interior],
        [Interior, Green, Interior, Red, Interior, Interior],
        [Interior, Interior, Interior, Red, Interior, Interior],
        [Blue, Interior, Interior, Red, Interior, Interior],
        // Back slab, z = -1
        [Interior, Green, Orange, Interior, Interior, Yellow],
        [Interior, Interior, Orange, Interior, Interior, Yellow],
        [Blue, Interior, Orange, Interior, Interior, Yellow],
        [Interior, Green, Interior, Interior, Interior, Yellow],
        [Interior, Interior, Interior, Interior, Interior, Yellow],
        [Blue, Interior, Interior, Interior, Interior, Yellow],
        [Interior, Green, Interior, Red, Interior, Yellow],
        [Interior, Interior, Interior, Red, Interior, Yellow],
        [Blue, Interior, Interior, Red, Interior, Yellow],
    ]
};

/// One sub-cube of the assembly.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cubie {
    pub(crate) index: usize,
    pub(crate) grid: GridCoords,
    pub(crate) faces: [FaceColor; 6],
}

impl Cubie {
    pub(crate) fn face(&self, face: Face) -> FaceColor {
        self.faces[face as usize]
    }
}

/// Builds the solved assembly: 27 cubies with grid positions and face
/// colors taken from the static table.
pub(crate) fn build_assembly() -> [Cubie; CUBIE_COUNT] {
    std::array::from_fn(|index| Cubie {
        index,
        grid: grid_coords(index),
        faces: FACE_COLORS[index],
    })
}

/// Vertex format shared with the shader: position plus face color.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) position: [f32; 3],
    pub(crate) color: [f32; 4],
}

/// Four corners per face (counter-clockwise seen from outside), ordered to
/// match `Face::ALL`. Half-extent 0.5 so neighbors at spacing 1.01 leave a
/// visible gap.
#[rustfmt::skip]
const FACE_QUADS: [[[f32; 3]; 4]; 6] = [
    // Right, +X
    [[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]],
    // Left, -X
    [[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]],
    // Top, +Y
    [[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]],
    // Bottom, -Y
    [[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]],
    // Front, +Z
    [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]],
    // Back, -Z
    [[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]],
];

/// Two triangles per face, 12 triangles total.
#[rustfmt::skip]
pub(crate) const CUBIE_INDICES: [u16; 36] = [
    0, 1, 2, 2, 3, 0,       // right
    4, 5, 6, 6, 7, 4,       // left
    8, 9, 10, 10, 11, 8,    // top
    12, 13, 14, 14, 15, 12, // bottom
    16, 17, 18, 18, 19, 16, // front
    20, 21, 22, 22, 23, 20, // back
];

/// Builds the 24 vertices for one cubie, coloring each face quad from the
/// cubie's face table.
pub(crate) fn cubie_vertices(cubie: &Cubie) -> [Vertex; 24] {
    let mut vertices = [Vertex::zeroed(); 24];
    for face in Face::ALL {
        let rgba: Vector4<f32> = cubie.face(face).into();
        let color: [f32; 4] = rgba.into();
        for (corner, position) in FACE_QUADS[face as usize].iter().enumerate() {
            vertices[face as usize * 4 + corner] = Vertex {
                position: *position,
                color,
            };
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_and_center_mappings() {
        assert_eq!(grid_coords(0), GridCoords { x: -1, y: 1, z: 1 });
        assert_eq!(grid_coords(13), GridCoords { x: 0, y: 0, z: 0 });
        assert_eq!(grid_coords(26), GridCoords { x: 1, y: -1, z: -1 });
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        grid_coords(27);
    }

    #[test]
    fn assembly_indices_match_positions() {
        for (i, cubie) in build_assembly().iter().enumerate() {
            assert_eq!(cubie.index, i);
            assert_eq!(cubie.grid, grid_coords(i));
        }
    }

    #[test]
    fn center_cubie_is_all_interior() {
        let assembly = build_assembly();
        assert!(
            assembly[13]
                .faces
                .iter()
                .all(|&c| c == FaceColor::Interior)
        );
    }

    #[test]
    fn assembly_has_54_visible_stickers() {
        let assembly = build_assembly();
        let visible: usize = assembly
            .iter()
            .map(|cubie| {
                cubie
                    .faces
                    .iter()
                    .filter(|&&c| c != FaceColor::Interior)
                    .count()
            })
            .sum();
        assert_eq!(visible, 54);
    }

    #[test]
    fn each_macro_face_has_nine_stickers_of_its_color() {
        let assembly = build_assembly();
        let count = |face: Face, color: FaceColor| {
            assembly
                .iter()
                .filter(|cubie| cubie.face(face) == color)
                .count()
        };
        assert_eq!(count(Face::Top, FaceColor::Orange), 9);
        assert_eq!(count(Face::Front, FaceColor::Cyan), 9);
        assert_eq!(count(Face::Left, FaceColor::Green), 9);
        assert_eq!(count(Face::Bottom, FaceColor::Red), 9);
        assert_eq!(count(Face::Back, FaceColor::Yellow), 9);
        assert_eq!(count(Face::Right, FaceColor::Blue), 9);
    }

    #[test]
    fn interior_faces_match_grid_boundaries() {
        // A face is colored exactly when the cubie sits on that axis
        // boundary; everything else must be interior.
        for cubie in build_assembly() {
            let g = cubie.grid;
            assert_eq!(cubie.face(Face::Right) != FaceColor::Interior, g.x == 1);
            assert_eq!(cubie.face(Face::Left) != FaceColor::Interior, g.x == -1);
            assert_eq!(cubie.face(Face::Top) != FaceColor::Interior, g.y == 1);
            assert_eq!(cubie.face(Face::Bottom) != FaceColor::Interior, g.y == -1);
            assert_eq!(cubie.face(Face::Front) != FaceColor::Interior, g.z == 1);
            assert_eq!(cubie.face(Face::Back) != FaceColor::Interior, g.z == -1);
        }
    }

    #[test]
    fn cubie_mesh_uses_one_color_per_face() {
        let assembly = build_assembly();
        let vertices = cubie_vertices(&assembly[0]);
        for (face_idx, face) in Face::ALL.iter().enumerate() {
            let rgba: Vector4<f32> = assembly[0].face(*face).into();
            let expected: [f32; 4] = rgba.into();
            for corner in 0..4 {
                assert_eq!(vertices[face_idx * 4 + corner].color, expected);
            }
        }
        assert!(CUBIE_INDICES.iter().all(|&i| (i as usize) < vertices.len()));
    }
}
