use bytemuck::{Pod, Zeroable};

/// Shader input slot an attribute is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attrib {
    Position,
    Normal,
    Tangent,
    Bitangent,
    Color0,
    TexCoord0,
    TexCoord7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttribType {
    Uint8,
    Float,
}

impl AttribType {
    pub const fn size(self) -> u16 {
        match self {
            AttribType::Uint8 => 1,
            AttribType::Float => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub attrib: Attrib,
    pub count: u8,
    pub ty: AttribType,
    pub offset: u16,
}

/// Describes how the bytes of a vertex buffer map onto shader inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u16,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute directly after the previous one.
    pub fn add(mut self, attrib: Attrib, count: u8, ty: AttribType) -> Self {
        self.attributes.push(VertexAttribute {
            attrib,
            count,
            ty,
            offset: self.stride,
        });
        self.stride += u16::from(count) * ty.size();
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn stride(&self) -> u16 {
        self.stride
    }

    pub fn has(&self, attrib: Attrib) -> bool {
        self.attributes.iter().any(|a| a.attrib == attrib)
    }
}

/// A vertex type that can be uploaded into a `VertexArray`.
pub trait VertexFormat: Pod {
    fn layout() -> VertexLayout;
}

/// Vertex used by meshes and batches.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub tex_coord: [f32; 2],
    /// Free-form per-vertex data; `x` carries a texture index.
    pub data: [f32; 4],
}

impl VertexFormat for Vertex {
    fn layout() -> VertexLayout {
        VertexLayout::new()
            .add(Attrib::Position, 3, AttribType::Float)
            .add(Attrib::Normal, 3, AttribType::Float)
            .add(Attrib::Tangent, 3, AttribType::Float)
            .add(Attrib::Bitangent, 3, AttribType::Float)
            .add(Attrib::TexCoord0, 2, AttribType::Float)
            .add(Attrib::TexCoord7, 4, AttribType::Float)
    }
}

#[inline]
pub fn v(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        tex_coord,
        ..Vertex::default()
    }
}

/// Vertex used by the debug shapes: position, packed ABGR color, normal.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct PrimitiveVertex {
    pub position: [f32; 3],
    pub color: u32,
    pub normal: [f32; 3],
}

impl Default for PrimitiveVertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: 0x0f,
            normal: [0.0; 3],
        }
    }
}

impl PrimitiveVertex {
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl VertexFormat for PrimitiveVertex {
    fn layout() -> VertexLayout {
        VertexLayout::new()
            .add(Attrib::Position, 3, AttribType::Float)
            .add(Attrib::Color0, 4, AttribType::Uint8)
            .add(Attrib::Normal, 3, AttribType::Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn vertex_stride_matches_struct_size() {
        assert_eq!(
            usize::from(Vertex::layout().stride()),
            mem::size_of::<Vertex>()
        );
    }

    #[test]
    fn primitive_vertex_stride_matches_struct_size() {
        assert_eq!(
            usize::from(PrimitiveVertex::layout().stride()),
            mem::size_of::<PrimitiveVertex>()
        );
    }

    #[test]
    fn attribute_offsets_are_packed() {
        let layout = Vertex::layout();
        let offsets: Vec<u16> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36, 48, 56]);
        assert!(layout.has(Attrib::TexCoord7));
        assert!(!layout.has(Attrib::Color0));
    }
}
