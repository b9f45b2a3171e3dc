//! Declarative image recipes.
//!
//! A recipe names a generator and its parameters so scene files can refer to
//! procedural textures by value:
//!
//! ```json
//! { "width": 256, "height": 256, "kind": "fbm", "scale": 4, "octaves": 5, "wrap": true }
//! ```
//!
//! Omitted parameters take the generator's documented defaults.

use serde::{Deserialize, Serialize};

use crate::error::TexelError;
use crate::image::Image3f;
use crate::raster::{
    LightsParams, NoiseImageParams, PatternParams, RampParams, UvGridParams, bump_to_normal_map,
    make_bumpdimple_image, make_checker_image, make_fbm_image, make_gammaramp_image,
    make_grid_image, make_lights_image, make_noise_image, make_ramp_image, make_ridge_image,
    make_sunsky_image, make_turbulence_image, make_uvgrid_image, make_uvramp_image,
};
use crate::sky::SkyParams;

/// Output size plus the generator that fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecipe {
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub generator: Generator,
}

/// Every image generator, tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Generator {
    Grid(PatternParams),
    Checker(PatternParams),
    /// Uses only `tile` from the pattern parameters.
    Bumpdimple(PatternParams),
    Ramp(RampParams),
    Gammaramp,
    Uvramp,
    Uvgrid(UvGridParams),
    Noise(NoiseImageParams),
    Fbm(NoiseImageParams),
    Ridge(NoiseImageParams),
    Turbulence(NoiseImageParams),
    Sunsky(SkyParams),
    Lights(LightsParams),
    /// Normal map derived from another generator's output, same size.
    NormalMap(NormalMapParams),
}

/// Parameters of [`Generator::NormalMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalMapParams {
    /// Height field source.
    pub source: Box<Generator>,
    /// Slope multiplier. Default: 1.
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl ImageRecipe {
    pub fn new(width: u32, height: u32, generator: Generator) -> Self {
        Self { width, height, generator }
    }

    /// Parse a recipe from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Run the generator.
    pub fn render(&self) -> Result<Image3f, TexelError> {
        tracing::debug!("render recipe {}x{} {}", self.width, self.height, self.generator.name());
        self.generator.render(self.width, self.height)
    }
}

impl Generator {
    /// The `kind` tag of this generator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid(_) => "grid",
            Self::Checker(_) => "checker",
            Self::Bumpdimple(_) => "bumpdimple",
            Self::Ramp(_) => "ramp",
            Self::Gammaramp => "gammaramp",
            Self::Uvramp => "uvramp",
            Self::Uvgrid(_) => "uvgrid",
            Self::Noise(_) => "noise",
            Self::Fbm(_) => "fbm",
            Self::Ridge(_) => "ridge",
            Self::Turbulence(_) => "turbulence",
            Self::Sunsky(_) => "sunsky",
            Self::Lights(_) => "lights",
            Self::NormalMap(_) => "normal_map",
        }
    }

    /// Render at `width × height`.
    pub fn render(&self, width: u32, height: u32) -> Result<Image3f, TexelError> {
        match self {
            Self::Grid(p) => make_grid_image(width, height, p),
            Self::Checker(p) => make_checker_image(width, height, p),
            Self::Bumpdimple(p) => make_bumpdimple_image(width, height, p.tile),
            Self::Ramp(p) => make_ramp_image(width, height, p),
            Self::Gammaramp => make_gammaramp_image(width, height),
            Self::Uvramp => make_uvramp_image(width, height),
            Self::Uvgrid(p) => make_uvgrid_image(width, height, p),
            Self::Noise(p) => make_noise_image(width, height, p),
            Self::Fbm(p) => make_fbm_image(width, height, p),
            Self::Ridge(p) => make_ridge_image(width, height, p),
            Self::Turbulence(p) => make_turbulence_image(width, height, p),
            Self::Sunsky(p) => make_sunsky_image(width, height, p),
            Self::Lights(p) => make_lights_image(width, height, p),
            Self::NormalMap(p) => {
                let bump = p.source.render(width, height)?;
                bump_to_normal_map(&bump, p.scale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_recipe_uses_defaults() {
        let recipe = ImageRecipe::from_json(r#"{"width": 16, "height": 16, "kind": "checker"}"#)
            .unwrap();
        assert_eq!(recipe.generator, Generator::Checker(PatternParams::DEFAULT));
        let img = recipe.render().unwrap();
        assert_eq!(img.at(0, 0), [0.5; 3]);
        assert_eq!(img.at(8, 0), [0.8; 3]);
    }

    #[test]
    fn test_partial_params_fill_in() {
        let json = r#"{"width": 8, "height": 8, "kind": "grid", "tile": 4}"#;
        let recipe = ImageRecipe::from_json(json).unwrap();
        let Generator::Grid(params) = &recipe.generator else {
            panic!("expected grid, got {:?}", recipe.generator);
        };
        assert_eq!(params.tile, 4);
        assert_eq!(params.color1, [0.8; 3]);
    }

    #[test]
    fn test_fractal_recipe_flattens_octaves() {
        let json = r#"{
            "width": 32, "height": 32,
            "kind": "fbm", "scale": 4, "octaves": 3, "wrap": true
        }"#;
        let recipe = ImageRecipe::from_json(json).unwrap();
        let Generator::Fbm(params) = &recipe.generator else {
            panic!("expected fbm");
        };
        assert_eq!(params.fractal.octaves, 3);
        assert!(params.wrap);
        assert!(recipe.render().is_ok());
    }

    #[test]
    fn test_unit_variants_parse() {
        let recipe = ImageRecipe::from_json(r#"{"width": 4, "height": 4, "kind": "uvramp"}"#)
            .unwrap();
        assert_eq!(recipe.generator, Generator::Uvramp);
    }

    #[test]
    fn test_normal_map_of_bumpdimple() {
        let json = r#"{
            "width": 16, "height": 16, "kind": "normal_map",
            "source": {"kind": "bumpdimple", "tile": 8}
        }"#;
        let recipe = ImageRecipe::from_json(json).unwrap();
        let img = recipe.render().unwrap();
        // Flat border region between bumps faces straight up.
        assert_eq!(img.at(0, 0), [0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"width": 4, "height": 4, "kind": "plasma"}"#;
        assert!(ImageRecipe::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_values_fail_at_render() {
        let json = r#"{"width": 8, "height": 8, "kind": "sunsky", "turbidity": 42}"#;
        let recipe = ImageRecipe::from_json(json).unwrap();
        assert!(matches!(recipe.render(), Err(TexelError::OutOfRange { name: "turbidity", .. })));
    }

    #[test]
    fn test_json_roundtrip() {
        let recipe = ImageRecipe::new(
            8,
            4,
            Generator::NormalMap(NormalMapParams {
                source: Box::new(Generator::Ridge(NoiseImageParams::DEFAULT)),
                scale: 2.0,
            }),
        );
        let back = ImageRecipe::from_json(&recipe.to_json().unwrap()).unwrap();
        assert_eq!(back, recipe);
    }
}
