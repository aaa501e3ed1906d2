//! Named shader uniforms and their GPU packing.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use thiserror::Error;

use crate::color::Color;
use crate::params::WaveParams;

/// Uniform names shared with `shaders/water.wgsl`
pub mod names {
    pub const TIME: &str = "uTime";
    pub const BIG_WAVES_ELEVATION: &str = "uBigWavesElevation";
    pub const BIG_WAVES_FREQUENCY: &str = "uBigWavesFrequency";
    pub const BIG_WAVES_SPEED: &str = "uBigWavesSpeed";
    pub const SMALL_WAVES_ELEVATION: &str = "uSmallWavesElevation";
    pub const SMALL_WAVES_FREQUENCY: &str = "uSmallWavesFrequency";
    pub const SMALL_WAVES_SPEED: &str = "uSmallWavesSpeed";
    pub const SMALL_ITERATIONS: &str = "uSmallIterations";
    pub const SURFACE_COLOR: &str = "uSurfaceColor";
    pub const DEPTH_COLOR: &str = "uDepthColor";
    pub const COLOR_OFFSET: &str = "uColorOffset";
    pub const COLOR_MULTIPLIER: &str = "uColorMultiplier";
}

/// Semantic type of a uniform slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec2,
    Color,
    Int,
}

/// Value held by a uniform slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Color(Color),
    Int(i32),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Float(_) => UniformKind::Float,
            Self::Vec2(_) => UniformKind::Vec2,
            Self::Color(_) => UniformKind::Color,
            Self::Int(_) => UniformKind::Int,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UniformError {
    #[error("no uniform named {0}")]
    Unknown(String),

    #[error("uniform {name} holds a {expected:?}, not a {found:?}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

/// One named input to the shader
#[derive(Debug, Clone)]
pub struct UniformSlot {
    pub name: &'static str,
    value: UniformValue,
}

impl UniformSlot {
    pub fn value(&self) -> UniformValue {
        self.value
    }
}

/// Ordered set of uniform slots.
///
/// A slot's kind is fixed when it is inserted; writes of another kind are
/// rejected so the GPU layout can never drift from the shader.
#[derive(Debug, Clone, Default)]
pub struct UniformSet {
    slots: Vec<UniformSlot>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full water-shader contract with starting values
    pub fn water(waves: &WaveParams, surface_color: Color, depth_color: Color) -> Self {
        let mut set = Self::new();
        set.insert(names::TIME, UniformValue::Float(0.0));

        set.insert(
            names::BIG_WAVES_ELEVATION,
            UniformValue::Float(waves.big_waves_elevation),
        );
        set.insert(
            names::BIG_WAVES_FREQUENCY,
            UniformValue::Vec2(Vec2::from_array(waves.big_waves_frequency)),
        );
        set.insert(names::BIG_WAVES_SPEED, UniformValue::Float(waves.big_waves_speed));

        set.insert(
            names::SMALL_WAVES_ELEVATION,
            UniformValue::Float(waves.small_waves_elevation),
        );
        set.insert(
            names::SMALL_WAVES_FREQUENCY,
            UniformValue::Float(waves.small_waves_frequency),
        );
        set.insert(
            names::SMALL_WAVES_SPEED,
            UniformValue::Float(waves.small_waves_speed),
        );
        set.insert(names::SMALL_ITERATIONS, UniformValue::Int(waves.small_iterations));

        set.insert(names::SURFACE_COLOR, UniformValue::Color(surface_color));
        set.insert(names::DEPTH_COLOR, UniformValue::Color(depth_color));
        set.insert(names::COLOR_OFFSET, UniformValue::Float(waves.color_offset));
        set.insert(
            names::COLOR_MULTIPLIER,
            UniformValue::Float(waves.color_multiplier),
        );
        set
    }

    /// Add a slot, or replace the value of an existing slot of any kind
    pub fn insert(&mut self, name: &'static str, value: UniformValue) {
        match self.slots.iter_mut().find(|s| s.name == name) {
            Some(slot) => slot.value = value,
            None => self.slots.push(UniformSlot { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrite a slot's value in place, keeping its kind
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| UniformError::Unknown(name.to_string()))?;

        let (expected, found) = (slot.value.kind(), value.kind());
        if expected != found {
            return Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected,
                found,
            });
        }

        slot.value = value;
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<UniformValue, UniformError> {
        self.get(name)
            .ok_or_else(|| UniformError::Unknown(name.to_string()))
    }

    fn mismatch(name: &str, requested: UniformKind, held: &UniformValue) -> UniformError {
        UniformError::KindMismatch {
            name: name.to_string(),
            expected: held.kind(),
            found: requested,
        }
    }

    pub fn float(&self, name: &str) -> Result<f32, UniformError> {
        match self.lookup(name)? {
            UniformValue::Float(v) => Ok(v),
            other => Err(Self::mismatch(name, UniformKind::Float, &other)),
        }
    }

    pub fn vec2(&self, name: &str) -> Result<Vec2, UniformError> {
        match self.lookup(name)? {
            UniformValue::Vec2(v) => Ok(v),
            other => Err(Self::mismatch(name, UniformKind::Vec2, &other)),
        }
    }

    pub fn color(&self, name: &str) -> Result<Color, UniformError> {
        match self.lookup(name)? {
            UniformValue::Color(v) => Ok(v),
            other => Err(Self::mismatch(name, UniformKind::Color, &other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i32, UniformError> {
        match self.lookup(name)? {
            UniformValue::Int(v) => Ok(v),
            other => Err(Self::mismatch(name, UniformKind::Int, &other)),
        }
    }

    /// Write the elapsed time the render loop measured
    pub fn set_time(&mut self, elapsed_s: f32) -> Result<(), UniformError> {
        self.set(names::TIME, UniformValue::Float(elapsed_s))
    }
}

/// Uniform buffer for the water shader (transforms + wave parameters).
///
/// Field order and padding follow the WGSL struct in `shaders/water.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub big_waves_frequency: [f32; 2],
    pub time: f32,
    pub big_waves_elevation: f32,
    pub big_waves_speed: f32,
    pub small_waves_elevation: f32,
    pub small_waves_frequency: f32,
    pub small_waves_speed: f32,
    pub surface_color: [f32; 3],
    pub small_iterations: i32,
    pub depth_color: [f32; 3],
    pub color_offset: f32,
    pub color_multiplier: f32,
    pub _padding: [f32; 3], // Round struct size up to 16 bytes
}

impl WaterUniforms {
    /// Pack the uniform set together with this frame's transforms
    pub fn pack(
        set: &UniformSet,
        model: Mat4,
        view: Mat4,
        projection: Mat4,
    ) -> Result<Self, UniformError> {
        Ok(Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            big_waves_frequency: set.vec2(names::BIG_WAVES_FREQUENCY)?.to_array(),
            time: set.float(names::TIME)?,
            big_waves_elevation: set.float(names::BIG_WAVES_ELEVATION)?,
            big_waves_speed: set.float(names::BIG_WAVES_SPEED)?,
            small_waves_elevation: set.float(names::SMALL_WAVES_ELEVATION)?,
            small_waves_frequency: set.float(names::SMALL_WAVES_FREQUENCY)?,
            small_waves_speed: set.float(names::SMALL_WAVES_SPEED)?,
            surface_color: set.color(names::SURFACE_COLOR)?.to_array(),
            small_iterations: set.int(names::SMALL_ITERATIONS)?,
            depth_color: set.color(names::DEPTH_COLOR)?.to_array(),
            color_offset: set.float(names::COLOR_OFFSET)?,
            color_multiplier: set.float(names::COLOR_MULTIPLIER)?,
            _padding: [0.0; 3],
        })
    }
}
