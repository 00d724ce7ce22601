//! CPU-side layer mesh buffers.
//!
//! A [`LayerMesh`] holds one vertex and one UV entry per resolved layer point,
//! in point order, plus an index buffer over the selected triangles. The two
//! revision counters let a renderer re-upload only what changed: posing bumps
//! `vertex_revision`, while `topology_revision` only moves when the index and
//! UV buffers are rebuilt.

/// Vertex, UV and index buffers of one rendered layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMesh {
    vertices: Vec<[f32; 2]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    vertex_revision: u64,
    topology_revision: u64,
}

impl LayerMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the UV and index buffers.
    pub fn set_topology(&mut self, uvs: Vec<[f32; 2]>, indices: Vec<u32>) {
        self.uvs = uvs;
        self.indices = indices;
        self.topology_revision += 1;
    }

    /// Replace the vertex buffer.
    pub fn set_vertices(&mut self, vertices: Vec<[f32; 2]>) {
        self.vertices = vertices;
        self.vertex_revision += 1;
    }

    /// Update the vertices at `indices` in place.
    pub fn update_vertices<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (usize, [f32; 2])>,
    {
        for (index, position) in updates {
            self.vertices[index] = position;
        }
        self.vertex_revision += 1;
    }

    pub fn vertices(&self) -> &[[f32; 2]] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of drawn triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_revision(&self) -> u64 {
        self.vertex_revision
    }

    pub fn topology_revision(&self) -> u64 {
        self.topology_revision
    }

    /// Vertex buffer as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// UV buffer as raw bytes for upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Index buffer as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
