use anyhow::{anyhow, Result};
use glow::HasContext;
use std::mem::size_of;
use std::rc::Rc;

/// Interleaved float attributes. Attribute `i` is bound to location `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    components: Vec<i32>,
}

impl VertexLayout {
    pub fn new(components: &[i32]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.components.iter().sum::<i32>() as usize
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> i32 {
        (self.floats_per_vertex() * size_of::<f32>()) as i32
    }

    /// `(location, components, byte offset)` for every attribute.
    pub fn attributes(&self) -> Vec<(u32, i32, i32)> {
        let mut offset = 0;
        self.components
            .iter()
            .enumerate()
            .map(|(location, &components)| {
                let attr = (location as u32, components, offset);
                offset += components * size_of::<f32>() as i32;
                attr
            })
            .collect()
    }

    pub fn vertex_count(&self, floats: usize) -> usize {
        match self.floats_per_vertex() {
            0 => 0,
            n => floats / n,
        }
    }
}

/// A vertex array with its vertex buffer and optional index buffer.
/// All three objects are deleted on drop, including after a partial setup.
pub struct Mesh {
    gl: Rc<glow::Context>,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ebo: Option<glow::Buffer>,
    vertex_count: i32,
    index_count: i32,
}

impl Mesh {
    pub fn new(
        gl: &Rc<glow::Context>,
        vertices: &[f32],
        layout: &VertexLayout,
        indices: Option<&[u32]>,
    ) -> Result<Self> {
        let mut mesh = Mesh {
            gl: Rc::clone(gl),
            vao: None,
            vbo: None,
            ebo: None,
            vertex_count: layout.vertex_count(vertices.len()) as i32,
            index_count: indices.map_or(0, |i| i.len() as i32),
        };

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(|e| anyhow!("Failed to create vertex array: {}", e))?;
            mesh.vao = Some(vao);
            gl.bind_vertex_array(Some(vao));

            let vbo = gl
                .create_buffer()
                .map_err(|e| anyhow!("Failed to create buffer: {}", e))?;
            mesh.vbo = Some(vbo);
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            if let Some(indices) = indices {
                let ebo = gl
                    .create_buffer()
                    .map_err(|e| anyhow!("Failed to create index buffer: {}", e))?;
                mesh.ebo = Some(ebo);
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(indices),
                    glow::STATIC_DRAW,
                );
            }

            for (location, components, offset) in layout.attributes() {
                gl.vertex_attrib_pointer_f32(
                    location,
                    components,
                    glow::FLOAT,
                    false,
                    layout.stride(),
                    offset,
                );
                gl.enable_vertex_attrib_array(location);
            }

            gl.bind_vertex_array(None);
        }

        Ok(mesh)
    }

    /// Issues one draw call for the whole mesh as triangles.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(self.vao);
            if self.ebo.is_some() {
                self.gl
                    .draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
            } else {
                self.gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);
            }
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            if let Some(vao) = self.vao.take() {
                self.gl.delete_vertex_array(vao);
            }
            if let Some(vbo) = self.vbo.take() {
                self.gl.delete_buffer(vbo);
            }
            if let Some(ebo) = self.ebo.take() {
                self.gl.delete_buffer(ebo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_colour_texcoord_layout() {
        let layout = VertexLayout::new(&[3, 3, 2]);
        assert_eq!(layout.stride(), 32);
        assert_eq!(layout.attributes(), vec![(0, 3, 0), (1, 3, 12), (2, 2, 24)]);
        assert_eq!(layout.vertex_count(32), 4);
    }

    #[test]
    fn position_only_layout() {
        let layout = VertexLayout::new(&[3]);
        assert_eq!(layout.stride(), 12);
        assert_eq!(layout.vertex_count(18), 6);
    }

    #[test]
    fn empty_layout_has_no_vertices() {
        assert_eq!(VertexLayout::new(&[]).vertex_count(9), 0);
    }
}
