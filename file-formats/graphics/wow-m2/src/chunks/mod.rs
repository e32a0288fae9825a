pub mod attachment;
pub mod bone;
pub mod camera;
pub mod color_animation;
pub mod event;
pub mod material;
pub mod particle_emitter;
pub mod sequence;
pub mod texture;
pub mod texture_animation;
pub mod transparency_animation;
pub mod vertex;

// Re-export common types
pub use attachment::{M2Attachment, M2AttachmentHeader, M2AttachmentId};
pub use bone::{M2Bone, M2BoneFlags, M2BoneHeader};
pub use camera::{M2Camera, M2CameraHeader, M2CameraType};
pub use color_animation::{M2Color, M2ColorHeader};
pub use event::{M2Event, M2EventHeader};
pub use material::{M2BlendMode, M2Material, M2RenderFlags};
pub use particle_emitter::{
    M2ParticleEmitter, M2ParticleEmitterHeader, M2ParticleEmitterType, M2ParticleFlags,
};
pub use sequence::{M2Sequence, M2SequenceFlags};
pub use texture::{M2Texture, M2TextureFlags, M2TextureHeader, M2TextureType};
pub use texture_animation::{M2TextureAnimation, M2TextureAnimationHeader};
pub use transparency_animation::M2TransparencyAnimation;
pub use vertex::M2Vertex;
