pub mod anim;
pub mod gl;
pub mod math;
pub mod mesh;
pub mod shader;
pub mod texture;
