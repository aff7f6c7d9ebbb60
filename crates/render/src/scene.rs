//! The fixed scene: ground plane, carton base, carton top and the
//! auxiliary box. Vertex data is position + color, six floats per vertex.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// CPU-side description of one static triangle-list mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: &'static str,
    pub vertices: Vec<Vertex>,
    pub translation: Vec3,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }
}

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];
const PURPLE: [f32; 3] = [1.0, 0.0, 1.0];
const GREY: [f32; 3] = [0.5, 0.5, 0.5];

/// Every object sits on a plane five units above the tables' origin.
const SCENE_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 0.0);

fn tris(color: [f32; 3], points: &[[f32; 3]]) -> impl Iterator<Item = Vertex> + '_ {
    points.iter().map(move |&position| Vertex { position, color })
}

fn mesh(name: &'static str, vertices: Vec<Vertex>) -> MeshData {
    MeshData {
        name,
        vertices,
        translation: SCENE_OFFSET,
    }
}

pub fn ground_plane() -> MeshData {
    #[rustfmt::skip]
    let points = [
        [-5.0, -5.0, -5.0], [ 5.0, -5.0, -5.0], [ 5.0, -5.0,  5.0],
        [ 5.0, -5.0,  5.0], [-5.0, -5.0,  5.0], [-5.0, -5.0, -5.0],
    ];
    mesh("ground", tris(RED, &points).collect())
}

pub fn carton_base() -> MeshData {
    #[rustfmt::skip]
    let points = [
        // top
        [-2.0, -2.0, -2.0], [ 0.0, -2.0, -2.0], [-2.0, -2.0,  0.0],
        [-2.0, -2.0,  0.0], [ 0.0, -2.0, -2.0], [ 0.0, -2.0,  0.0],
        // bottom
        [-2.0, -5.0, -2.0], [ 0.0, -5.0, -2.0], [-2.0, -5.0,  0.0],
        [-2.0, -5.0,  0.0], [ 0.0, -5.0, -2.0], [ 0.0, -5.0,  0.0],
        // front
        [-2.0, -2.0,  0.0], [-2.0, -5.0,  0.0], [ 0.0, -5.0,  0.0],
        [ 0.0, -5.0,  0.0], [-2.0, -2.0,  0.0], [ 0.0, -2.0,  0.0],
        // back
        [-2.0, -2.0, -2.0], [-2.0, -5.0, -2.0], [ 0.0, -2.0, -2.0],
        [ 0.0, -5.0, -2.0], [ 0.0, -2.0, -2.0], [-2.0, -5.0, -2.0],
        // left
        [-2.0, -2.0, -2.0], [-2.0, -2.0,  0.0], [-2.0, -5.0,  0.0],
        [-2.0, -2.0, -2.0], [-2.0, -5.0, -2.0], [-2.0, -5.0,  0.0],
        // right
        [ 0.0, -2.0,  0.0], [ 0.0, -5.0, -2.0], [ 0.0, -5.0,  0.0],
        [ 0.0, -2.0,  0.0], [ 0.0, -2.0, -2.0], [ 0.0, -5.0, -2.0],
    ];
    mesh("carton base", tris(GREEN, &points).collect())
}

/// Two pyramids joined by a ridge, forming the gable top of the carton.
pub fn carton_top() -> MeshData {
    const LEFT_APEX: [f32; 3] = [-1.5, -0.5, -1.0];
    const RIGHT_APEX: [f32; 3] = [-0.5, -0.5, -1.0];

    let mut vertices = Vec::with_capacity(42);
    #[rustfmt::skip]
    let faces: [([f32; 3], &[[f32; 3]]); 12] = [
        // left pyramid
        (BLUE, &[
            [-2.0, -2.0, -2.0], [-1.0, -2.0,  0.0], [-2.0, -2.0,  0.0],
            [-2.0, -2.0, -2.0], [-1.0, -2.0,  0.0], [-1.0, -2.0, -2.0],
        ]),
        (RED,    &[[-2.0, -2.0, -2.0], [-2.0, -2.0,  0.0], LEFT_APEX]),
        (CYAN,   &[[-2.0, -2.0, -2.0], [-1.0, -2.0, -2.0], LEFT_APEX]),
        (BLUE,   &[[-1.0, -2.0, -2.0], [-1.0, -2.0,  0.0], LEFT_APEX]),
        (PURPLE, &[[-2.0, -2.0,  0.0], [-1.0, -2.0,  0.0], LEFT_APEX]),
        // right pyramid
        (CYAN, &[
            [-1.0, -2.0, -2.0], [-1.0, -2.0,  0.0], [ 0.0, -2.0,  0.0],
            [-1.0, -2.0, -2.0], [ 0.0, -2.0,  0.0], [ 0.0, -2.0, -2.0],
        ]),
        (CYAN,   &[[-1.0, -2.0,  0.0], [-1.0, -2.0, -2.0], RIGHT_APEX]),
        (CYAN,   &[[-1.0, -2.0, -2.0], [ 0.0, -2.0, -2.0], RIGHT_APEX]),
        (RED,    &[[ 0.0, -2.0, -2.0], [ 0.0, -2.0,  0.0], RIGHT_APEX]),
        (PURPLE, &[[ 0.0, -2.0,  0.0], [-1.0, -2.0,  0.0], RIGHT_APEX]),
        // ridge between the apexes
        (PURPLE, &[[-1.0, -2.0,  0.0], LEFT_APEX, RIGHT_APEX]),
        (CYAN,   &[[-1.0, -2.0, -2.0], LEFT_APEX, RIGHT_APEX]),
    ];
    for (color, points) in faces {
        vertices.extend(tris(color, points));
    }
    mesh("carton top", vertices)
}

/// A flat box rotated 45 degrees about Y, resting beside the carton.
pub fn side_box() -> MeshData {
    #[rustfmt::skip]
    let points = [
        // bottom
        [1.0, -5.0,  0.0], [2.5, -5.0, -1.5], [3.0, -5.0,  2.0],
        [3.0, -5.0,  2.0], [4.5, -5.0,  0.5], [2.5, -5.0, -1.5],
        // top
        [1.0, -4.0,  0.0], [2.5, -4.0, -1.5], [3.0, -4.0,  2.0],
        [3.0, -4.0,  2.0], [4.5, -4.0,  0.5], [2.5, -4.0, -1.5],
        // front
        [1.0, -5.0,  0.0], [1.0, -4.0,  0.0], [3.0, -5.0,  2.0],
        [3.0, -5.0,  2.0], [1.0, -4.0,  0.0], [3.0, -4.0,  2.0],
        // right
        [3.0, -5.0,  2.0], [3.0, -4.0,  2.0], [4.5, -5.0,  0.5],
        [4.5, -5.0,  0.5], [3.0, -4.0,  2.0], [4.5, -4.0,  0.5],
        // left
        [1.0, -5.0,  0.0], [1.0, -4.0,  0.0], [2.5, -5.0, -1.5],
        [2.5, -5.0, -1.5], [1.0, -4.0,  0.0], [2.5, -4.0, -1.5],
        // back
        [2.5, -5.0, -1.5], [2.5, -4.0, -1.5], [4.5, -5.0,  0.5],
        [4.5, -5.0,  0.5], [2.5, -4.0, -1.5], [4.5, -4.0,  0.5],
    ];
    mesh("side box", tris(GREY, &points).collect())
}

/// All four meshes in draw order.
pub fn carton_scene() -> Vec<MeshData> {
    vec![ground_plane(), carton_base(), carton_top(), side_box()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_counts() {
        let counts: Vec<u32> = carton_scene().iter().map(MeshData::vertex_count).collect();
        assert_eq!(counts, vec![6, 36, 42, 36]);
    }

    #[test]
    fn all_meshes_are_whole_triangles() {
        for m in carton_scene() {
            assert_eq!(m.vertices.len() % 3, 0, "{}", m.name);
        }
    }

    #[test]
    fn vertex_layout_is_six_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 6 * 4);
        let v = ground_plane().vertices;
        let raw: &[f32] = bytemuck::cast_slice(&v);
        assert_eq!(&raw[..6], &[-5.0, -5.0, -5.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn model_is_translation_only() {
        for m in carton_scene() {
            let model = m.model_matrix();
            assert_eq!(model, Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
            assert_eq!(model.transform_vector3(Vec3::X), Vec3::X);
        }
    }

    #[test]
    fn ground_sits_at_world_zero() {
        let g = ground_plane();
        for v in &g.vertices {
            let world = g.model_matrix().transform_point3(Vec3::from(v.position));
            assert_eq!(world.y, 0.0);
        }
    }

    #[test]
    fn carton_top_rests_on_base() {
        let top = carton_top();
        let lowest = top
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min);
        assert_eq!(lowest, -2.0);
    }
}
