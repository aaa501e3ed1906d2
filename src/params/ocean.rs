//! Water surface defaults: wave shape and color mix.

/// Starting values for the wave uniforms
#[derive(Debug, Clone)]
pub struct WaveParams {
    /// Height of the large swell (world units)
    pub big_waves_elevation: f32,

    /// Spatial frequency of the large swell along X and Z (cycles per unit)
    pub big_waves_frequency: [f32; 2],

    /// Time scale of the large swell (radians per second)
    pub big_waves_speed: f32,

    /// Height of the small chop (world units)
    pub small_waves_elevation: f32,

    /// Spatial frequency of the small chop
    pub small_waves_frequency: f32,

    /// Time scale of the small chop
    pub small_waves_speed: f32,

    /// Number of noise octaves summed into the chop.
    /// Starts above the control's upper bound (4); controls only
    /// condition values the user enters.
    pub small_iterations: i32,

    /// Elevation offset applied before the depth/surface color mix
    pub color_offset: f32,

    /// Contrast of the depth/surface color mix
    pub color_multiplier: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            big_waves_elevation: 0.2,
            big_waves_frequency: [4.0, 1.25],
            big_waves_speed: 0.75,

            small_waves_elevation: 0.03,
            small_waves_frequency: 3.0,
            small_waves_speed: 0.4,
            small_iterations: 5,

            color_offset: 0.08,
            color_multiplier: 5.0,
        }
    }
}

/// Hex colors the debug panel starts from
#[derive(Debug, Clone)]
pub struct ColorDefaults {
    /// Color of the troughs
    pub depth_color: String,

    /// Color of the crests
    pub surface_color: String,
}

impl Default for ColorDefaults {
    fn default() -> Self {
        Self {
            depth_color: "#186691".to_string(),
            surface_color: "#9bd8ff".to_string(),
        }
    }
}
