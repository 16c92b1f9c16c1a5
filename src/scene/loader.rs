//! Scene file loading.
//!
//! The loader consumes the bracketed-section text format and produces a
//! [`SceneAssets`] container. Load failures are fatal configuration errors:
//! the core does not recover from an unreadable file or an unrecognized
//! section, it hands the error to the caller.
//!
//! Section tags and property keys are matched case-insensitively, matching
//! the format's original case-insensitive reader.

use std::path::Path;
use std::sync::Arc;

use cgmath::{Vector3, Vector4};
use thiserror::Error;

use crate::particles::ParticleDescriptor;

use super::animation::{Animation, AnimationKey, KeyFrame};
use super::light::LightSource;
use super::model::{Model, ModelKind};
use super::SceneAssets;

/// Errors produced while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The file could not be opened or read.
    #[error("error loading scene file: {0}")]
    Io(#[from] std::io::Error),
    /// A section tag is not one of the recognized section names.
    #[error("unrecognized scene section [{0}]")]
    UnknownSection(String),
    /// A property key is not valid for its section.
    #[error("unrecognized property '{key}' in section [{section}]")]
    UnknownProperty {
        /// The section tag.
        section: String,
        /// The offending key.
        key: String,
    },
    /// A body line is not of the form `key = value...` or a value failed to
    /// parse as a number.
    #[error("malformed line in section [{section}]: {line}")]
    Malformed {
        /// The section tag.
        section: String,
        /// The offending line.
        line: String,
    },
    /// An animation references a key name with no matching `[animationkey]`.
    #[error("animation '{animation}' references unknown key '{key}'")]
    UnknownAnimationKey {
        /// The animation name.
        animation: String,
        /// The unresolved key name.
        key: String,
    },
}

/// Loads and parses a scene file.
///
/// # Arguments
/// * `path` - Path to the scene description file
///
/// # Returns
/// The parsed [`SceneAssets`], or the fatal [`SceneError`] that stopped the
/// load.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneAssets, SceneError> {
    let text = std::fs::read_to_string(path)?;
    parse_scene(&text)
}

/// Parses scene text that has already been read into memory.
pub fn parse_scene(text: &str) -> Result<SceneAssets, SceneError> {
    let mut assets = SceneAssets::default();

    for section in split_sections(text) {
        let tag = section.tag.to_ascii_lowercase();
        match tag.as_str() {
            "cube" => assets
                .models
                .push(parse_model(ModelKind::Cube, &section)?),
            "sphere" => assets
                .models
                .push(parse_model(ModelKind::Sphere, &section)?),
            "animationkey" => assets.animation_keys.push(parse_animation_key(&section)?),
            "animation" => assets.animations.push(parse_animation(&section)?),
            "particledescriptor" => assets
                .descriptors
                .push(Arc::new(parse_descriptor(&section)?)),
            "light" => assets.lights.push(parse_light(&section)?),
            _ if tag.starts_with('#') => {} // comment section
            _ => return Err(SceneError::UnknownSection(section.tag.clone())),
        }
    }

    // Every animation key reference must resolve before the scene is usable.
    for animation in &assets.animations {
        for frame in &animation.keys {
            if assets.find_animation_key(&frame.key).is_none() {
                return Err(SceneError::UnknownAnimationKey {
                    animation: animation.name.clone(),
                    key: frame.key.clone(),
                });
            }
        }
    }

    Ok(assets)
}

/// One raw section: a tag and its body lines.
struct RawSection {
    tag: String,
    lines: Vec<String>,
}

fn split_sections(text: &str) -> Vec<RawSection> {
    let mut sections: Vec<RawSection> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push(RawSection {
                tag: inner.trim().to_string(),
                lines: Vec::new(),
            });
        } else if let Some(section) = sections.last_mut() {
            section.lines.push(line.to_string());
        }
        // Body text before any section header is ignored.
    }

    sections
}

/// Splits a `key = value...` body line into a lowercase key and its value
/// tokens.
fn split_property<'a>(
    section: &RawSection,
    line: &'a str,
) -> Result<(String, Vec<&'a str>), SceneError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 || tokens[1] != "=" {
        return Err(malformed(section, line));
    }
    Ok((tokens[0].to_ascii_lowercase(), tokens[2..].to_vec()))
}

fn malformed(section: &RawSection, line: &str) -> SceneError {
    SceneError::Malformed {
        section: section.tag.clone(),
        line: line.to_string(),
    }
}

fn unquote(token: &str) -> String {
    token.trim_matches('"').to_string()
}

fn parse_f32(section: &RawSection, line: &str, token: &str) -> Result<f32, SceneError> {
    token.parse::<f32>().map_err(|_| malformed(section, line))
}

fn parse_vec3(
    section: &RawSection,
    line: &str,
    tokens: &[&str],
) -> Result<Vector3<f32>, SceneError> {
    if tokens.len() != 3 {
        return Err(malformed(section, line));
    }
    Ok(Vector3::new(
        parse_f32(section, line, tokens[0])?,
        parse_f32(section, line, tokens[1])?,
        parse_f32(section, line, tokens[2])?,
    ))
}

fn parse_vec4(
    section: &RawSection,
    line: &str,
    tokens: &[&str],
) -> Result<Vector4<f32>, SceneError> {
    if tokens.len() != 4 {
        return Err(malformed(section, line));
    }
    Ok(Vector4::new(
        parse_f32(section, line, tokens[0])?,
        parse_f32(section, line, tokens[1])?,
        parse_f32(section, line, tokens[2])?,
        parse_f32(section, line, tokens[3])?,
    ))
}

fn parse_model(kind: ModelKind, section: &RawSection) -> Result<Model, SceneError> {
    let mut model = Model::new(kind);
    for line in &section.lines {
        if line.starts_with('#') {
            continue;
        }
        let (key, values) = split_property(section, line)?;
        match key.as_str() {
            "name" => model.name = unquote(values[0]),
            "position" => model.position = parse_vec3(section, line, &values)?,
            "scaling" => model.scaling = parse_vec3(section, line, &values)?,
            "rotation" => {
                if values.len() != 4 {
                    return Err(malformed(section, line));
                }
                model.rotation_axis = parse_vec3(section, line, &values[..3])?;
                model.rotation_angle_deg = parse_f32(section, line, values[3])?;
            }
            "animation" => model.animation = Some(unquote(values[0])),
            _ => {
                return Err(SceneError::UnknownProperty {
                    section: section.tag.clone(),
                    key,
                })
            }
        }
    }
    Ok(model)
}

fn parse_animation_key(section: &RawSection) -> Result<AnimationKey, SceneError> {
    let mut key = AnimationKey::named("");
    for line in &section.lines {
        if line.starts_with('#') {
            continue;
        }
        let (prop, values) = split_property(section, line)?;
        match prop.as_str() {
            "name" => key.name = unquote(values[0]),
            "position" => key.position = parse_vec3(section, line, &values)?,
            "scaling" => key.scaling = parse_vec3(section, line, &values)?,
            "rotation" => {
                if values.len() != 4 {
                    return Err(malformed(section, line));
                }
                key.rotation_axis = parse_vec3(section, line, &values[..3])?;
                key.rotation_angle_deg = parse_f32(section, line, values[3])?;
            }
            _ => {
                return Err(SceneError::UnknownProperty {
                    section: section.tag.clone(),
                    key: prop,
                })
            }
        }
    }
    Ok(key)
}

fn parse_animation(section: &RawSection) -> Result<Animation, SceneError> {
    let mut animation = Animation::named("");
    for line in &section.lines {
        if line.starts_with('#') {
            continue;
        }
        let (prop, values) = split_property(section, line)?;
        match prop.as_str() {
            "name" => animation.name = unquote(values[0]),
            "key" => {
                if values.len() != 2 {
                    return Err(malformed(section, line));
                }
                animation.keys.push(KeyFrame {
                    key: unquote(values[0]),
                    time: parse_f32(section, line, values[1])?,
                });
            }
            _ => {
                return Err(SceneError::UnknownProperty {
                    section: section.tag.clone(),
                    key: prop,
                })
            }
        }
    }
    Ok(animation)
}

fn parse_light(section: &RawSection) -> Result<LightSource, SceneError> {
    let mut light = LightSource::new();
    for line in &section.lines {
        if line.starts_with('#') {
            continue;
        }
        let (prop, values) = split_property(section, line)?;
        match prop.as_str() {
            "name" => light.name = unquote(values[0]),
            "position" => light.position = parse_vec4(section, line, &values)?,
            "color" => light.color = parse_vec3(section, line, &values)?,
            _ => {
                return Err(SceneError::UnknownProperty {
                    section: section.tag.clone(),
                    key: prop,
                })
            }
        }
    }
    Ok(light)
}

fn parse_descriptor(section: &RawSection) -> Result<ParticleDescriptor, SceneError> {
    let mut d = ParticleDescriptor::default();
    for line in &section.lines {
        if line.starts_with('#') {
            continue;
        }
        let (prop, values) = split_property(section, line)?;
        match prop.as_str() {
            "name" => d.name = unquote(values[0]),
            "emissionrate" => d.emission_rate = parse_f32(section, line, values[0])?,
            "initialcolor" => d.initial_color = parse_vec4(section, line, &values)?,
            "midcolor" => d.mid_color = parse_vec4(section, line, &values)?,
            "endcolor" => d.end_color = parse_vec4(section, line, &values)?,
            "fadeintime" => d.fade_in_time = parse_f32(section, line, values[0])?,
            "fadeouttime" => d.fade_out_time = parse_f32(section, line, values[0])?,
            "totallifetime" => d.total_lifetime = parse_f32(section, line, values[0])?,
            "totallifetimerandomness" => {
                d.total_lifetime_randomness = parse_f32(section, line, values[0])?
            }
            "initialsize" => d.initial_size = parse_f32(section, line, values[0])?,
            "initialsizerandomness" => {
                d.initial_size_randomness = parse_f32(section, line, values[0])?
            }
            "sizegrowthvelocity" => {
                d.size_growth_velocity = parse_f32(section, line, values[0])?
            }
            "velocity" => d.velocity = parse_vec3(section, line, &values)?,
            "velocityanglerandomness" => {
                d.velocity_angle_randomness = parse_f32(section, line, values[0])?
            }
            "acceleration" => d.acceleration = parse_vec3(section, line, &values)?,
            "initialrotationangle" => {
                d.initial_rotation_angle = parse_f32(section, line, values[0])?
            }
            "initialrotationanglerandomness" => {
                d.initial_rotation_angle_randomness = parse_f32(section, line, values[0])?
            }
            _ => {
                return Err(SceneError::UnknownProperty {
                    section: section.tag.clone(),
                    key: prop,
                })
            }
        }
    }
    Ok(d)
}
