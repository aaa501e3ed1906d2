//! Debug panel: declarative controls bound to the water uniforms.
//!
//! Each numeric control is a `(getter, setter, bounds)` descriptor over the
//! uniform set. Color controls edit the hex strings in [`DebugColors`] and
//! push the converted color into their uniform, never the reverse.

use log::{debug, warn};
use thiserror::Error;

use crate::color::{Color, ColorParseError};
use crate::params::ColorDefaults;
use crate::uniforms::{names, UniformError, UniformSet, UniformValue};

pub const BIG_WAVES: &str = "Big waves";
pub const SMALL_WAVES: &str = "Small waves";
pub const COLORS: &str = "Colors";

/// Folder order as shown in the panel
pub const FOLDERS: [&str; 3] = [BIG_WAVES, SMALL_WAVES, COLORS];

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Uniform(#[from] UniformError),

    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Hex colors the color pickers edit
#[derive(Debug, Clone, PartialEq)]
pub struct DebugColors {
    pub depth_color: String,
    pub surface_color: String,
}

impl From<&ColorDefaults> for DebugColors {
    fn from(defaults: &ColorDefaults) -> Self {
        Self {
            depth_color: defaults.depth_color.clone(),
            surface_color: defaults.surface_color.clone(),
        }
    }
}

type Getter = fn(&UniformSet) -> Result<f64, UniformError>;
type Setter = fn(&mut UniformSet, f64) -> Result<(), UniformError>;

/// Slider bound to one numeric uniform (or vector component)
#[derive(Clone)]
pub struct NumericControl {
    pub folder: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    get: Getter,
    set: Setter,
}

impl std::fmt::Debug for NumericControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericControl")
            .field("folder", &self.folder)
            .field("label", &self.label)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .finish()
    }
}

impl NumericControl {
    /// Snap to the step grid anchored at `min`, then clamp to the bounds
    pub fn condition(&self, input: f64) -> f64 {
        let offset = self.min;
        let snapped = ((input - offset) / self.step).round() * self.step + offset;
        round_significant(snapped).clamp(self.min, self.max)
    }

    pub fn value(&self, uniforms: &UniformSet) -> Result<f64, UniformError> {
        (self.get)(uniforms)
    }

    /// Condition `input` and write it into the bound slot; returns the stored value
    pub fn apply(&self, uniforms: &mut UniformSet, input: f64) -> Result<f64, UniformError> {
        let value = self.condition(input);
        (self.set)(uniforms, value)?;
        debug!("{} / {} = {}", self.folder, self.label, value);
        Ok(value)
    }
}

/// Drop float noise such as 0.30000000000000004 by keeping 15 significant digits
fn round_significant(value: f64) -> f64 {
    format!("{value:.14e}").parse().unwrap_or(value)
}

fn float_control(
    folder: &'static str,
    label: &'static str,
    max: f64,
    get: Getter,
    set: Setter,
) -> NumericControl {
    NumericControl {
        folder,
        label,
        min: 0.0,
        max,
        step: 0.001,
        get,
        set,
    }
}

/// Every numeric control, in panel order
pub fn numeric_controls() -> Vec<NumericControl> {
    vec![
        float_control(
            BIG_WAVES,
            "Elevation",
            1.0,
            |u| u.float(names::BIG_WAVES_ELEVATION).map(f64::from),
            |u, v| u.set(names::BIG_WAVES_ELEVATION, UniformValue::Float(v as f32)),
        ),
        float_control(
            BIG_WAVES,
            "Frequency X",
            10.0,
            |u| u.vec2(names::BIG_WAVES_FREQUENCY).map(|f| f.x as f64),
            |u, v| {
                let mut frequency = u.vec2(names::BIG_WAVES_FREQUENCY)?;
                frequency.x = v as f32;
                u.set(names::BIG_WAVES_FREQUENCY, UniformValue::Vec2(frequency))
            },
        ),
        float_control(
            BIG_WAVES,
            "Frequency Y",
            10.0,
            |u| u.vec2(names::BIG_WAVES_FREQUENCY).map(|f| f.y as f64),
            |u, v| {
                let mut frequency = u.vec2(names::BIG_WAVES_FREQUENCY)?;
                frequency.y = v as f32;
                u.set(names::BIG_WAVES_FREQUENCY, UniformValue::Vec2(frequency))
            },
        ),
        float_control(
            BIG_WAVES,
            "Speed",
            4.0,
            |u| u.float(names::BIG_WAVES_SPEED).map(f64::from),
            |u, v| u.set(names::BIG_WAVES_SPEED, UniformValue::Float(v as f32)),
        ),
        float_control(
            SMALL_WAVES,
            "Elevation",
            1.0,
            |u| u.float(names::SMALL_WAVES_ELEVATION).map(f64::from),
            |u, v| u.set(names::SMALL_WAVES_ELEVATION, UniformValue::Float(v as f32)),
        ),
        float_control(
            SMALL_WAVES,
            "Frequency",
            30.0,
            |u| u.float(names::SMALL_WAVES_FREQUENCY).map(f64::from),
            |u, v| u.set(names::SMALL_WAVES_FREQUENCY, UniformValue::Float(v as f32)),
        ),
        float_control(
            SMALL_WAVES,
            "Speed",
            4.0,
            |u| u.float(names::SMALL_WAVES_SPEED).map(f64::from),
            |u, v| u.set(names::SMALL_WAVES_SPEED, UniformValue::Float(v as f32)),
        ),
        NumericControl {
            folder: SMALL_WAVES,
            label: "Iterations",
            min: 0.0,
            max: 4.0,
            step: 1.0,
            get: |u| u.int(names::SMALL_ITERATIONS).map(f64::from),
            set: |u, v| u.set(names::SMALL_ITERATIONS, UniformValue::Int(v.round() as i32)),
        },
        float_control(
            COLORS,
            "Offset",
            1.0,
            |u| u.float(names::COLOR_OFFSET).map(f64::from),
            |u, v| u.set(names::COLOR_OFFSET, UniformValue::Float(v as f32)),
        ),
        float_control(
            COLORS,
            "Multiplier",
            10.0,
            |u| u.float(names::COLOR_MULTIPLIER).map(f64::from),
            |u, v| u.set(names::COLOR_MULTIPLIER, UniformValue::Float(v as f32)),
        ),
    ]
}

/// Which hex string a color picker edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Surface,
    Depth,
}

/// Color picker bound to a hex field, mirrored into a color uniform
#[derive(Debug, Clone)]
pub struct ColorControl {
    pub folder: &'static str,
    pub label: &'static str,
    pub field: ColorField,
    pub uniform: &'static str,
}

impl ColorControl {
    pub fn hex<'a>(&self, colors: &'a DebugColors) -> &'a str {
        match self.field {
            ColorField::Surface => &colors.surface_color,
            ColorField::Depth => &colors.depth_color,
        }
    }

    /// Store a new hex value and push the converted color into the uniform.
    ///
    /// Unparseable input leaves both the record and the uniform untouched.
    pub fn apply(
        &self,
        colors: &mut DebugColors,
        uniforms: &mut UniformSet,
        hex: &str,
    ) -> Result<Color, PanelError> {
        let color = Color::from_hex(hex)?;
        uniforms.set(self.uniform, UniformValue::Color(color))?;

        let field = match self.field {
            ColorField::Surface => &mut colors.surface_color,
            ColorField::Depth => &mut colors.depth_color,
        };
        *field = hex.to_string();

        debug!("{} / {} = {}", self.folder, self.label, hex);
        Ok(color)
    }
}

/// Both color pickers, in panel order
pub fn color_controls() -> Vec<ColorControl> {
    vec![
        ColorControl {
            folder: COLORS,
            label: "Surface",
            field: ColorField::Surface,
            uniform: names::SURFACE_COLOR,
        },
        ColorControl {
            folder: COLORS,
            label: "Depth",
            field: ColorField::Depth,
            uniform: names::DEPTH_COLOR,
        },
    ]
}

/// egui front end over the control descriptors
pub struct DebugPanel {
    numeric: Vec<NumericControl>,
    colors: Vec<ColorControl>,
    width: f32,
    open: bool,
}

impl DebugPanel {
    pub fn new(width: f32, open: bool) -> Self {
        Self {
            numeric: numeric_controls(),
            colors: color_controls(),
            width,
            open,
        }
    }

    pub fn numeric(&self) -> &[NumericControl] {
        &self.numeric
    }

    pub fn colors(&self) -> &[ColorControl] {
        &self.colors
    }

    /// Lay out the panel for this frame, writing any edits through the controls
    pub fn show(&self, ctx: &egui::Context, uniforms: &mut UniformSet, colors: &mut DebugColors) {
        egui::Window::new("Debug")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .default_width(self.width)
            .default_open(self.open)
            .resizable(false)
            .show(ctx, |ui| {
                for folder in FOLDERS {
                    egui::CollapsingHeader::new(folder)
                        .default_open(true)
                        .show(ui, |ui| self.show_folder(ui, folder, uniforms, colors));
                }
            });
    }

    fn show_folder(
        &self,
        ui: &mut egui::Ui,
        folder: &str,
        uniforms: &mut UniformSet,
        colors: &mut DebugColors,
    ) {
        for control in self.colors.iter().filter(|c| c.folder == folder) {
            let current = control.hex(colors).to_string();
            let mut rgb = Color::from_hex(&current)
                .map(Color::to_srgb_u8)
                .unwrap_or_default();

            let changed = ui
                .horizontal(|ui| {
                    let response = ui.color_edit_button_srgb(&mut rgb);
                    ui.label(control.label);
                    response.changed()
                })
                .inner;

            if changed {
                let hex = format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]);
                if let Err(e) = control.apply(colors, uniforms, &hex) {
                    warn!("{} / {}: {}", control.folder, control.label, e);
                }
            }
        }

        for control in self.numeric.iter().filter(|c| c.folder == folder) {
            let mut value = match control.value(uniforms) {
                Ok(v) => v,
                Err(e) => {
                    warn!("{} / {}: {}", control.folder, control.label, e);
                    continue;
                }
            };

            // Bounds are enforced by `apply`; drawing alone must not rewrite the value
            let slider = egui::Slider::new(&mut value, control.min..=control.max)
                .clamping(egui::SliderClamping::Never)
                .step_by(control.step)
                .text(control.label);
            if ui.add(slider).changed() {
                if let Err(e) = control.apply(uniforms, value) {
                    warn!("{} / {}: {}", control.folder, control.label, e);
                }
            }
        }
    }
}
